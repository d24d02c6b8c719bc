use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, validate_range};
use crate::error::PacingError;
use crate::types::{Money, Rate, MAX_MONEY};
use crate::PacingResult;

/// Allowed gap between the sum of explicit monthly targets and the total.
pub const MONTHLY_TARGET_TOLERANCE: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Types — Scenario inputs
// ---------------------------------------------------------------------------

/// Which storefront's revenue a scenario is paced against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueSource {
    Shopify,
    Etsy,
    #[default]
    Combined,
}

impl RevenueSource {
    /// Whether an actual tagged with `source` counts toward this scenario.
    /// Untagged actuals always count.
    pub fn accepts(self, source: Option<RevenueSource>) -> bool {
        match (self, source) {
            (RevenueSource::Combined, _) | (_, None) => true,
            (wanted, Some(got)) => wanted == got,
        }
    }
}

/// Revenue target for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTarget {
    /// `YYYY-MM`
    pub month: String,
    pub target: Money,
}

/// A revenue goal over an inclusive date range.
///
/// Created and edited elsewhere; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastScenario {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Total revenue goal over the range
    pub revenue_target: Money,
    /// Target return on ad spend (revenue / spend), must be positive
    pub roas: Rate,
    #[serde(default)]
    pub auto_catch_up_enabled: bool,
    #[serde(default)]
    pub revenue_source: RevenueSource,
    #[serde(default)]
    pub use_monthly_targets: bool,
    /// Explicit per-month split, used only when `use_monthly_targets` is set
    #[serde(default)]
    pub monthly_targets: Vec<MonthlyTarget>,
    /// Band (in percentage points of `delta_pct`) treated as on track.
    /// Zero means only an exact match is on track.
    #[serde(default)]
    pub on_track_band_pct: Rate,
}

/// Actual revenue and ad spend for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActual {
    pub date: NaiveDate,
    pub revenue: Money,
    #[serde(default)]
    pub ad_spend: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RevenueSource>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Checks every scenario field the pipeline depends on.
///
/// Runs before any aggregation so a bad scenario never yields a partial result.
pub fn validate_scenario(scenario: &ForecastScenario) -> PacingResult<()> {
    validate_range(scenario.start_date, scenario.end_date)?;

    if !is_valid_amount(scenario.revenue_target) {
        return Err(PacingError::InvalidTarget(scenario.revenue_target));
    }

    if scenario.roas <= Decimal::ZERO {
        return Err(PacingError::InvalidRoas(scenario.roas));
    }
    match scenario.revenue_target.checked_div(scenario.roas) {
        Some(spend) if spend <= MAX_MONEY => {}
        _ => return Err(PacingError::InvalidRoas(scenario.roas)),
    }

    if scenario.on_track_band_pct < Decimal::ZERO {
        return Err(PacingError::InvalidInput {
            field: "on_track_band_pct".into(),
            reason: "On-track band cannot be negative".into(),
        });
    }

    if scenario.use_monthly_targets {
        validate_monthly_targets(scenario)?;
    }

    Ok(())
}

/// `0 <= amount <= MAX_MONEY`
pub fn is_valid_amount(amount: Money) -> bool {
    amount >= Decimal::ZERO && amount <= MAX_MONEY
}

/// Explicit monthly targets must name each month of the range exactly once,
/// nothing outside it, and sum to the revenue target.
fn validate_monthly_targets(scenario: &ForecastScenario) -> PacingResult<()> {
    let spans = calendar::months_in_range(scenario.start_date, scenario.end_date);

    for mt in &scenario.monthly_targets {
        calendar::parse_month_key(&mt.month)?;
        if !is_valid_amount(mt.target) {
            return Err(PacingError::InvalidTarget(mt.target));
        }
        if !spans.iter().any(|s| s.key == mt.month) {
            return Err(PacingError::InconsistentMonthlyTargets {
                reason: format!(
                    "month {} lies outside {}..={}",
                    mt.month, scenario.start_date, scenario.end_date
                ),
            });
        }
    }

    for span in &spans {
        let count = scenario
            .monthly_targets
            .iter()
            .filter(|mt| mt.month == span.key)
            .count();
        if count != 1 {
            return Err(PacingError::InconsistentMonthlyTargets {
                reason: if count == 0 {
                    format!("no target given for month {}", span.key)
                } else {
                    format!("month {} is listed {} times", span.key, count)
                },
            });
        }
    }

    let sum: Money = scenario.monthly_targets.iter().map(|mt| mt.target).sum();
    if (sum - scenario.revenue_target).abs() > MONTHLY_TARGET_TOLERANCE {
        return Err(PacingError::InconsistentMonthlyTargets {
            reason: format!(
                "monthly targets sum to {} but the revenue target is {}",
                sum, scenario.revenue_target
            ),
        });
    }

    Ok(())
}
