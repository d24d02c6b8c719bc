use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use revenue_pacing_core::forecast::{self, DailyActual, ForecastScenario};
use revenue_pacing_core::ratios::ad_metrics::{self, AdCounters};
use revenue_pacing_core::ratios::rolling::{self, RollingSample};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct ForecastRequest {
    scenario: ForecastScenario,
    #[serde(default)]
    actuals: Vec<DailyActual>,
    as_of_date: NaiveDate,
}

#[derive(Deserialize)]
struct RollingRequest {
    series: Vec<RollingSample>,
    #[serde(default = "default_window")]
    window_days: usize,
}

fn default_window() -> usize {
    rolling::DEFAULT_WINDOW_DAYS
}

// ---------------------------------------------------------------------------
// Forecast & pacing
// ---------------------------------------------------------------------------

/// Scenario JSON in, `{monthly_targets, daily_forecast_curve}` envelope out.
#[napi]
pub fn distribute_and_build_forecast(scenario_json: String) -> NapiResult<String> {
    let scenario: ForecastScenario =
        serde_json::from_str(&scenario_json).map_err(to_napi_error)?;
    let output = forecast::distribute_and_build_forecast(&scenario).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `{scenario, actuals, as_of_date}` in, full forecast result envelope out.
#[napi]
pub fn compute_forecast(request_json: String) -> NapiResult<String> {
    let request: ForecastRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = forecast::compute_forecast(&request.scenario, &request.actuals, request.as_of_date)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_catch_up_curve(request_json: String) -> NapiResult<String> {
    let request: ForecastRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = forecast::compute_forecast(&request.scenario, &request.actuals, request.as_of_date)
        .map_err(to_napi_error)?;
    let curve = forecast::project_catch_up_curve(&output.result).map_err(to_napi_error)?;
    serde_json::to_string(&curve).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ratio metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_ratio_metrics(counters_json: String) -> NapiResult<String> {
    let counters: AdCounters = serde_json::from_str(&counters_json).map_err(to_napi_error)?;
    let metrics = ad_metrics::compute_ratio_metrics(&counters);
    serde_json::to_string(&metrics).map_err(to_napi_error)
}

/// Account-level ratios: counters are summed before dividing.
#[napi]
pub fn compute_aggregate_ratio_metrics(series_json: String) -> NapiResult<String> {
    let series: Vec<AdCounters> = serde_json::from_str(&series_json).map_err(to_napi_error)?;
    let metrics = ad_metrics::compute_aggregate_ratio_metrics(&series);
    serde_json::to_string(&metrics).map_err(to_napi_error)
}

/// `{series, window_days?}` in, one ratio (or null) per input day out.
#[napi]
pub fn compute_rolling_ratio(request_json: String) -> NapiResult<String> {
    let request: RollingRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let ratios =
        rolling::compute_rolling_ratio(&request.series, request.window_days).map_err(to_napi_error)?;
    serde_json::to_string(&ratios).map_err(to_napi_error)
}
