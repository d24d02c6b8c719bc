//! Revenue forecast and pacing.
//!
//! Pipeline, leaves first:
//! - **targets**: split a revenue target into day-weighted monthly targets
//! - **baseline**: expand monthly targets into a daily forecast curve
//! - **actuals**: join sparse daily actuals onto the curve
//! - **pacing**: to-date delta and ahead / behind / on-track status
//! - **catch_up**: daily pace needed over the remaining days when behind
//! - **rollup**: weekly, monthly and quarterly buckets
//! - **engine**: `compute_forecast` and `distribute_and_build_forecast`
//!
//! Every stage is a pure function of its inputs. "Today" is always passed in
//! as an explicit as-of date.

pub mod actuals;
pub mod baseline;
pub mod catch_up;
pub mod engine;
pub mod pacing;
pub mod rollup;
pub mod scenario;
pub mod targets;

pub use actuals::ForecastDataPoint;
pub use catch_up::project_catch_up_curve;
pub use engine::{
    compute_forecast, distribute_and_build_forecast, DistributionOutput, ForecastMetrics,
    ForecastResult,
};
pub use pacing::PacingStatus;
pub use scenario::{DailyActual, ForecastScenario, MonthlyTarget, RevenueSource};
