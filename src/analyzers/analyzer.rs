use crate::analyzers::aggregate::convert_housing_data_to_quarters;
use crate::analyzers::recession::GdpSeries;
use crate::analyzers::ttest::run_ttest;
use crate::analyzers::types::{AnalysisOutcome, HousingTable, TownRecord};
use crate::config::{
    DEFAULT_GDP_PATH, DEFAULT_HOUSING_PATH, DEFAULT_TOWNS_PATH, GdpLayout, HousingLayout,
};
use crate::error;
use crate::fetch::{HttpClient, load_source, source_name};
use crate::parser::parse_university_towns;
use crate::sheet::read_grid;
use anyhow::Result;
use tracing::info;

/// Locations of the three inputs. Each is a file path or an HTTP(S) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub towns: String,
    pub gdp: String,
    pub housing: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            towns: DEFAULT_TOWNS_PATH.to_string(),
            gdp: DEFAULT_GDP_PATH.to_string(),
            housing: DEFAULT_HOUSING_PATH.to_string(),
        }
    }
}

/// Raw contents of the three inputs.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub towns: Vec<u8>,
    pub gdp: Vec<u8>,
    pub housing: Vec<u8>,
}

/// Parses the university town list from raw bytes (invalid UTF-8 is replaced).
pub fn towns_from_bytes(bytes: &[u8]) -> error::Result<Vec<TownRecord>> {
    parse_university_towns(&String::from_utf8_lossy(bytes))
}

/// Parses the GDP sheet; `source_name` selects CSV or workbook reading.
pub fn gdp_from_bytes(
    source_name: &str,
    bytes: &[u8],
    layout: &GdpLayout,
) -> error::Result<GdpSeries> {
    GdpSeries::from_grid(&read_grid(source_name, bytes)?, layout)
}

/// Runs the whole analysis over already loaded inputs.
pub fn analyze_inputs(
    inputs: &Inputs,
    gdp_source: &str,
    gdp_layout: &GdpLayout,
    housing_layout: &HousingLayout,
) -> error::Result<AnalysisOutcome> {
    let towns = towns_from_bytes(&inputs.towns)?;
    let series = gdp_from_bytes(gdp_source, &inputs.gdp, gdp_layout)?;
    let window = series.recession_window()?;
    let housing = convert_housing_data_to_quarters(&inputs.housing, housing_layout)?;

    run_ttest(&housing, &towns, window)
}

/// Loads the three inputs concurrently.
pub async fn load_inputs<C: HttpClient>(client: &C, sources: &Sources) -> Result<Inputs> {
    let (towns, gdp, housing) = tokio::try_join!(
        load_source(client, &sources.towns),
        load_source(client, &sources.gdp),
        load_source(client, &sources.housing),
    )?;
    Ok(Inputs {
        towns,
        gdp,
        housing,
    })
}

/// Loads all inputs and runs the t-test.
#[tracing::instrument(skip(client, gdp_layout, housing_layout))]
pub async fn analyze<C: HttpClient>(
    client: &C,
    sources: &Sources,
    gdp_layout: &GdpLayout,
    housing_layout: &HousingLayout,
) -> Result<AnalysisOutcome> {
    let inputs = load_inputs(client, sources).await?;
    info!(
        towns_bytes = inputs.towns.len(),
        gdp_bytes = inputs.gdp.len(),
        housing_bytes = inputs.housing.len(),
        "Inputs loaded"
    );

    Ok(analyze_inputs(
        &inputs,
        &source_name(&sources.gdp),
        gdp_layout,
        housing_layout,
    )?)
}

pub async fn load_towns<C: HttpClient>(client: &C, source: &str) -> Result<Vec<TownRecord>> {
    let bytes = load_source(client, source).await?;
    Ok(towns_from_bytes(&bytes)?)
}

pub async fn load_gdp<C: HttpClient>(
    client: &C,
    source: &str,
    layout: &GdpLayout,
) -> Result<GdpSeries> {
    let bytes = load_source(client, source).await?;
    Ok(gdp_from_bytes(&source_name(source), &bytes, layout)?)
}

pub async fn load_housing<C: HttpClient>(
    client: &C,
    source: &str,
    layout: &HousingLayout,
) -> Result<HousingTable> {
    let bytes = load_source(client, source).await?;
    Ok(convert_housing_data_to_quarters(&bytes, layout)?)
}
