//! Ratio metrics for advertising KPIs.
//!
//! - **ad_metrics**: ROAS, CPA, CPM, CTR, MER (plus CPC, CVR, AOV) from raw counters
//! - **rolling**: trailing-window revenue/spend ratio (aMER)

pub mod ad_metrics;
pub mod rolling;

pub use ad_metrics::{compute_ratio_metrics, AdCounters, RatioMetrics};
pub use rolling::{compute_rolling_ratio, RollingSample};
