//! CLI entry point for the university-town housing analysis.
//!
//! Provides subcommands for each step of the pipeline (town list, recession
//! quarters, quarterly housing table) and for the full t-test.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use housing_recession::analyzers::analyzer::{Sources, analyze, load_gdp, load_housing, load_towns};
use housing_recession::config::{
    DEFAULT_GDP_PATH, DEFAULT_HOUSING_PATH, DEFAULT_TOWNS_PATH, GDP_FIRST_QUARTER,
    GDP_HEADER_ROWS, GDP_WINDOW_OFFSET, GdpLayout, HOUSING_END_COLUMN, HOUSING_FIRST_COLUMN,
    HousingLayout,
};
use housing_recession::error::AnalysisError;
use housing_recession::fetch::BasicClient;
use housing_recession::output::{append_record, write_json, write_summary};
use housing_recession::quarter::Quarter;
use housing_recession::stats::RunReport;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "housing_recession")]
#[command(about = "Compare housing price declines of university towns during a recession", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GdpArgs {
    /// GDP workbook (xls/xlsx/ods) or CSV export, path or URL
    #[arg(long, default_value = DEFAULT_GDP_PATH)]
    gdp: String,

    /// Metadata rows above the first quarterly record
    #[arg(long, default_value_t = GDP_HEADER_ROWS)]
    gdp_header_rows: usize,

    /// Quarterly records to skip before the analysis window
    #[arg(long, default_value_t = GDP_WINDOW_OFFSET)]
    gdp_window_offset: usize,

    /// Expected first quarter of the window ("none" to disable the check)
    #[arg(long, default_value = GDP_FIRST_QUARTER)]
    gdp_first_quarter: String,
}

impl GdpArgs {
    fn layout(&self) -> Result<GdpLayout> {
        let first_quarter = if self.gdp_first_quarter.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(self.gdp_first_quarter.parse::<Quarter>()?)
        };
        Ok(GdpLayout {
            header_rows: self.gdp_header_rows,
            window_offset: self.gdp_window_offset,
            first_quarter,
            ..GdpLayout::default()
        })
    }
}

#[derive(Args)]
struct HousingArgs {
    /// Monthly home-value CSV, path or URL
    #[arg(long, default_value = DEFAULT_HOUSING_PATH)]
    housing: String,

    /// First monthly value column, counted after the key columns
    #[arg(long, default_value_t = HOUSING_FIRST_COLUMN)]
    housing_first_column: usize,

    /// One past the last monthly value column
    #[arg(long, default_value_t = HOUSING_END_COLUMN)]
    housing_end_column: usize,
}

impl HousingArgs {
    fn layout(&self) -> HousingLayout {
        HousingLayout {
            first_column: self.housing_first_column,
            end_column: self.housing_end_column,
            ..HousingLayout::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the university town list
    Towns {
        /// Town list text file, path or URL
        #[arg(long, default_value = DEFAULT_TOWNS_PATH)]
        towns: String,
    },
    /// Locate the recession start, bottom and end quarters
    Recession {
        #[command(flatten)]
        gdp: GdpArgs,
    },
    /// Convert monthly housing data to quarterly means
    Housing {
        #[command(flatten)]
        housing: HousingArgs,
    },
    /// Run the university vs non-university town t-test
    Ttest {
        /// Town list text file, path or URL
        #[arg(long, default_value = DEFAULT_TOWNS_PATH)]
        towns: String,

        #[command(flatten)]
        gdp: GdpArgs,

        #[command(flatten)]
        housing: HousingArgs,

        /// CSV file to append the run record to
        #[arg(short, long)]
        output: Option<String>,

        /// Print the run record as JSON instead of the summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/housing_recession.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("housing_recession.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let client = BasicClient::new()?;

    match cli.command {
        Commands::Towns { towns } => {
            let records = load_towns(&client, &towns).await?;
            let stateless = records.iter().filter(|t| t.state.is_none()).count();

            for town in &records {
                info!(
                    state = town.state.as_deref().unwrap_or("<none>"),
                    region = %town.region,
                    "Town"
                );
            }
            info!(total = records.len(), stateless, "University town list parsed");
        }
        Commands::Recession { gdp } => {
            let series = load_gdp(&client, &gdp.gdp, &gdp.layout()?).await?;
            info!(
                quarters = series.len(),
                first = %series.quarter_at(0),
                last = %series.quarter_at(series.len() - 1),
                "GDP series loaded"
            );

            let window = series.recession_window()?;
            info!(
                start = %window.start,
                bottom = %window.bottom,
                end = %window.end,
                "Recession quarters"
            );
        }
        Commands::Housing { housing } => {
            let table = load_housing(&client, &housing.housing, &housing.layout()).await?;
            let (rows, quarters) = table.shape();
            info!(rows, quarters, "Quarterly housing table");
        }
        Commands::Ttest {
            towns,
            gdp,
            housing,
            output,
            json,
        } => {
            let sources = Sources {
                towns,
                gdp: gdp.gdp.clone(),
                housing: housing.housing.clone(),
            };

            match analyze(&client, &sources, &gdp.layout()?, &housing.layout()).await {
                Ok(outcome) => {
                    let report = RunReport::from_outcome(&outcome);
                    let stdout = std::io::stdout().lock();
                    if json {
                        write_json(stdout, &report)?;
                    } else {
                        write_summary(stdout, &report)?;
                    }
                    if let Some(path) = &output {
                        append_record(path, &report)?;
                    }
                }
                Err(e) => {
                    let kind = e
                        .downcast_ref::<AnalysisError>()
                        .map(AnalysisError::kind)
                        .unwrap_or("load_error");
                    error!(error = %e, kind, "Analysis failed");

                    if let Some(path) = &output {
                        append_record(path, &RunReport::from_error(kind, &e.to_string()))?;
                    }
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
