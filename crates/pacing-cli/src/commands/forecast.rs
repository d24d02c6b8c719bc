use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use revenue_pacing_core::forecast::{self, DailyActual, ForecastScenario};

use crate::input;

/// A forecast request document: the scenario, its actuals and an optional as-of date.
#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub scenario: ForecastScenario,
    #[serde(default)]
    pub actuals: Vec<DailyActual>,
    #[serde(default)]
    pub as_of_date: Option<NaiveDate>,
}

/// Which part of the forecast result to print
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ForecastView {
    #[default]
    Full,
    Metrics,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

/// Arguments for monthly target distribution
#[derive(Args)]
pub struct TargetsArgs {
    /// Path to scenario file (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for forecast pacing
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to request file: {scenario, actuals, as_of_date} (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,

    /// Separate actuals file; replaces any actuals in the request
    #[arg(long)]
    pub actuals: Option<String>,

    /// Pace as of this date (YYYY-MM-DD); defaults to the request's as_of_date, then today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Section of the result to print
    #[arg(long, value_enum, default_value = "full")]
    pub view: ForecastView,
}

/// Arguments for the re-paced catch-up curve
#[derive(Args)]
pub struct CatchUpArgs {
    /// Path to request file: {scenario, actuals, as_of_date} (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,

    /// Separate actuals file; replaces any actuals in the request
    #[arg(long)]
    pub actuals: Option<String>,

    /// Pace as of this date (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_targets(args: TargetsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: ForecastScenario = input::load(&args.input, "target distribution")?;
    let result = forecast::distribute_and_build_forecast(&scenario)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_forecast(args: ForecastArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (request, as_of) = load_request(&args.input, &args.actuals, args.as_of)?;
    let output = forecast::compute_forecast(&request.scenario, &request.actuals, as_of)?;

    let value = match args.view {
        ForecastView::Full => serde_json::to_value(output)?,
        ForecastView::Metrics => serde_json::to_value(&output.result.metrics)?,
        ForecastView::Daily => serde_json::to_value(&output.result.daily_data)?,
        ForecastView::Weekly => serde_json::to_value(&output.result.weekly_data)?,
        ForecastView::Monthly => serde_json::to_value(&output.result.monthly_data)?,
        ForecastView::Quarterly => serde_json::to_value(&output.result.quarterly_data)?,
    };
    Ok(value)
}

pub fn run_catch_up(args: CatchUpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (request, as_of) = load_request(&args.input, &args.actuals, args.as_of)?;
    let output = forecast::compute_forecast(&request.scenario, &request.actuals, as_of)?;
    let curve = forecast::project_catch_up_curve(&output.result)?;
    Ok(serde_json::to_value(curve)?)
}

fn load_request(
    path: &Option<String>,
    actuals_path: &Option<String>,
    as_of_flag: Option<NaiveDate>,
) -> Result<(ForecastRequest, NaiveDate), Box<dyn std::error::Error>> {
    let mut request: ForecastRequest = input::load(path, "forecast")?;

    if let Some(ref actuals_path) = actuals_path {
        request.actuals = input::file::read_document(actuals_path)?;
    }

    let as_of = as_of_flag
        .or(request.as_of_date)
        .unwrap_or_else(|| Local::now().date_naive());

    info!(
        scenario = %request.scenario.id,
        actuals = request.actuals.len(),
        %as_of,
        "loaded forecast request"
    );

    Ok((request, as_of))
}
