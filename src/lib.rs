pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod quarter;
pub mod sheet;
pub mod states;
pub mod stats;
