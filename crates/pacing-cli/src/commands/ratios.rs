use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use revenue_pacing_core::ratios::ad_metrics::{self, AdCounters};
use revenue_pacing_core::ratios::rolling::{self, RollingSample};

use crate::input;

/// Arguments for counter ratios
#[derive(Args)]
pub struct RatiosArgs {
    /// Path to counters file: one object, or an array for per-row and total ratios
    #[arg(long)]
    pub input: Option<String>,

    /// Ad spend
    #[arg(long)]
    pub spend: Option<Decimal>,

    /// Impressions
    #[arg(long)]
    pub impressions: Option<Decimal>,

    /// Link clicks
    #[arg(long)]
    pub clicks: Option<Decimal>,

    /// Purchases / conversions
    #[arg(long)]
    pub purchases: Option<Decimal>,

    /// Attributed revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,
}

/// Arguments for the rolling revenue/spend ratio (aMER)
#[derive(Args)]
pub struct RollingArgs {
    /// Path to series file: array of {date?, revenue, spend}
    #[arg(long)]
    pub input: Option<String>,

    /// Trailing window length in days
    #[arg(long, default_value_t = rolling::DEFAULT_WINDOW_DAYS)]
    pub window: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountersDocument {
    Series(Vec<AdCounters>),
    Single(AdCounters),
}

#[derive(Debug, Serialize)]
struct SeriesRatiosOutput {
    rows: Vec<ad_metrics::RatioMetrics>,
    total: ad_metrics::RatioMetrics,
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let from_flags = [
        args.spend,
        args.impressions,
        args.clicks,
        args.purchases,
        args.revenue,
    ]
    .iter()
    .any(Option::is_some);

    if from_flags {
        let counters = AdCounters {
            spend: args.spend.unwrap_or_default(),
            impressions: args.impressions.unwrap_or_default(),
            clicks: args.clicks.unwrap_or_default(),
            purchases: args.purchases.unwrap_or_default(),
            revenue: args.revenue.unwrap_or_default(),
        };
        return Ok(serde_json::to_value(ad_metrics::compute_ratio_metrics(
            &counters,
        ))?);
    }

    let document: CountersDocument = input::load(&args.input, "ratio metrics")?;
    let value = match document {
        CountersDocument::Single(counters) => {
            serde_json::to_value(ad_metrics::compute_ratio_metrics(&counters))?
        }
        CountersDocument::Series(series) => serde_json::to_value(SeriesRatiosOutput {
            rows: ad_metrics::compute_ratio_series(&series),
            total: ad_metrics::compute_aggregate_ratio_metrics(&series),
        })?,
    };
    Ok(value)
}

pub fn run_rolling(args: RollingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let series: Vec<RollingSample> = input::load(&args.input, "rolling ratio")?;
    let points = rolling::compute_rolling_points(&series, args.window)?;
    Ok(serde_json::to_value(points)?)
}
