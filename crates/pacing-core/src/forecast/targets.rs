//! Monthly target distribution.
//!
//! A single revenue target is split across the calendar months touching the
//! scenario range in proportion to how many in-range days each month has.
//! Shares are rounded to cents and whatever the rounding leaves over is
//! assigned to the last month, so the split always sums to the total.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::{self, validate_range};
use crate::error::PacingError;
use crate::forecast::scenario::{is_valid_amount, ForecastScenario, MonthlyTarget};
use crate::types::{round_money, Money};
use crate::PacingResult;

/// Split `total` across buckets proportionally to `weights`.
///
/// Each share is rounded to cents; the rounding residual lands on the last
/// bucket. Returns zeros when every weight is zero. A total too large to
/// multiply by its weights is an `InvalidTarget`.
pub fn apportion(total: Money, weights: &[u32]) -> PacingResult<Vec<Money>> {
    let weight_sum: u64 = weights.iter().map(|w| u64::from(*w)).sum();
    if weights.is_empty() {
        return Ok(Vec::new());
    }
    if weight_sum == 0 {
        return Ok(vec![Decimal::ZERO; weights.len()]);
    }

    let weight_sum = Decimal::from(weight_sum);
    let mut shares = weights
        .iter()
        .map(|w| {
            total
                .checked_mul(Decimal::from(*w))
                .and_then(|scaled| scaled.checked_div(weight_sum))
                .map(round_money)
                .ok_or(PacingError::InvalidTarget(total))
        })
        .collect::<PacingResult<Vec<Money>>>()?;

    let allocated: Money = shares.iter().copied().sum();
    if let Some(last) = shares.last_mut() {
        *last += total - allocated;
    }

    Ok(shares)
}

/// Split an amount evenly over `days` days, cents-rounded, residual on the last day.
pub fn spread_evenly(total: Money, days: usize) -> PacingResult<Vec<Money>> {
    apportion(total, &vec![1; days])
}

// ---------------------------------------------------------------------------
// Function 1: distribute_monthly_targets
// ---------------------------------------------------------------------------

/// Day-weighted monthly split of `revenue_target` over `[start, end]`.
pub fn distribute_monthly_targets(
    revenue_target: Money,
    start: NaiveDate,
    end: NaiveDate,
) -> PacingResult<Vec<MonthlyTarget>> {
    validate_range(start, end)?;
    if !is_valid_amount(revenue_target) {
        return Err(PacingError::InvalidTarget(revenue_target));
    }

    let spans = calendar::months_in_range(start, end);
    let weights: Vec<u32> = spans.iter().map(|s| s.days).collect();
    let shares = apportion(revenue_target, &weights)?;

    Ok(spans
        .into_iter()
        .zip(shares)
        .map(|(span, target)| MonthlyTarget {
            month: span.key,
            target,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Function 2: resolve_monthly_targets
// ---------------------------------------------------------------------------

/// The monthly targets a scenario paces against, in calendar order.
///
/// Uses the explicit split when `use_monthly_targets` is set, otherwise the
/// day-weighted distribution. Expects a validated scenario; a sub-tolerance
/// gap in an explicit split is folded into the last month that stays
/// non-negative after absorbing it, and reported in `warnings`.
pub fn resolve_monthly_targets(
    scenario: &ForecastScenario,
    warnings: &mut Vec<String>,
) -> PacingResult<Vec<MonthlyTarget>> {
    if !scenario.use_monthly_targets {
        return distribute_monthly_targets(
            scenario.revenue_target,
            scenario.start_date,
            scenario.end_date,
        );
    }

    let spans = calendar::months_in_range(scenario.start_date, scenario.end_date);
    let mut targets = Vec::with_capacity(spans.len());
    for span in spans {
        let target = scenario
            .monthly_targets
            .iter()
            .find(|mt| mt.month == span.key)
            .map(|mt| mt.target)
            .ok_or_else(|| PacingError::InconsistentMonthlyTargets {
                reason: format!("no target given for month {}", span.key),
            })?;
        targets.push(MonthlyTarget {
            month: span.key,
            target,
        });
    }

    let sum: Money = targets.iter().map(|t| t.target).sum();
    let residual = scenario.revenue_target - sum;
    if !residual.is_zero() {
        let absorber = targets
            .iter_mut()
            .rev()
            .find(|t| t.target + residual >= Decimal::ZERO)
            .ok_or_else(|| PacingError::InconsistentMonthlyTargets {
                reason: format!(
                    "monthly targets sum to {} and no single month can absorb the {} gap to {}",
                    sum, residual, scenario.revenue_target
                ),
            })?;
        warnings.push(format!(
            "Monthly targets sum to {} vs revenue target {}; residual {} applied to {}",
            sum, scenario.revenue_target, residual, absorber.month
        ));
        absorber.target += residual;
    }

    Ok(targets)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::scenario::RevenueSource;
    use crate::types::MAX_MONEY;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_even_distribution_jan_feb() {
        let targets = distribute_monthly_targets(dec!(1000000), d(2025, 1, 1), d(2025, 2, 28)).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].month, "2025-01");
        // 1,000,000 * 31 / 59 = 525,423.7288...
        assert_eq!(targets[0].target, dec!(525423.73));
        assert_eq!(targets[1].target, dec!(474576.27));
        let sum: Decimal = targets.iter().map(|t| t.target).sum();
        assert_eq!(sum, dec!(1000000));
    }

    #[test]
    fn test_residual_goes_to_last_month() {
        // Apr, May, Jun: 30, 31, 30 days
        // weights 30/91, 31/91, 30/91 of 100.00
        let targets = distribute_monthly_targets(dec!(100), d(2025, 4, 1), d(2025, 6, 30)).unwrap();
        assert_eq!(targets[0].target, dec!(32.97));
        assert_eq!(targets[1].target, dec!(34.07));
        // 100 - 32.97 - 34.07
        assert_eq!(targets[2].target, dec!(32.96));
    }

    #[test]
    fn test_partial_months_weighted_by_in_range_days() {
        // Jan 22..=Feb 10: 10 days in Jan, 10 in Feb
        let targets = distribute_monthly_targets(dec!(2000), d(2025, 1, 22), d(2025, 2, 10)).unwrap();
        assert_eq!(targets[0].target, dec!(1000));
        assert_eq!(targets[1].target, dec!(1000));
    }

    #[test]
    fn test_single_day_range() {
        let targets = distribute_monthly_targets(dec!(123.45), d(2025, 5, 5), d(2025, 5, 5)).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].target, dec!(123.45));
    }

    #[test]
    fn test_distribution_is_idempotent() {
        let a = distribute_monthly_targets(dec!(777777.77), d(2024, 11, 17), d(2025, 8, 3)).unwrap();
        let b = distribute_monthly_targets(dec!(777777.77), d(2024, 11, 17), d(2025, 8, 3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_distribution_sum_exact_for_long_range() {
        let total = dec!(1234567.89);
        let targets = distribute_monthly_targets(total, d(2023, 3, 14), d(2025, 9, 9)).unwrap();
        let sum: Decimal = targets.iter().map(|t| t.target).sum();
        assert_eq!(sum, total);
        assert_eq!(targets.len(), 31);
    }

    #[test]
    fn test_distribution_errors() {
        assert!(matches!(
            distribute_monthly_targets(dec!(100), d(2025, 2, 1), d(2025, 1, 1)),
            Err(PacingError::InvalidRange { .. })
        ));
        assert!(matches!(
            distribute_monthly_targets(dec!(-100), d(2025, 1, 1), d(2025, 2, 1)),
            Err(PacingError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_spread_evenly() {
        let days = spread_evenly(dec!(100), 3).unwrap();
        assert_eq!(days, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
        assert!(spread_evenly(dec!(100), 0).unwrap().is_empty());
    }

    #[test]
    fn test_apportion_zero_weights() {
        assert_eq!(apportion(dec!(10), &[0, 0]).unwrap(), vec![dec!(0), dec!(0)]);
    }

    #[test]
    fn test_apportion_overflow_is_an_error() {
        let huge = Decimal::MAX / dec!(10);
        assert!(matches!(
            apportion(huge, &[31, 28]),
            Err(PacingError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_distribution_rejects_target_above_bound() {
        let too_big = MAX_MONEY + dec!(0.01);
        assert!(matches!(
            distribute_monthly_targets(too_big, d(2025, 1, 1), d(2025, 2, 28)),
            Err(PacingError::InvalidTarget(_))
        ));
        let at_bound = distribute_monthly_targets(MAX_MONEY, d(2025, 1, 1), d(2025, 2, 28)).unwrap();
        let sum: Decimal = at_bound.iter().map(|t| t.target).sum();
        assert_eq!(sum, MAX_MONEY);
    }

    #[test]
    fn test_resolve_explicit_targets_in_calendar_order() {
        let scenario = ForecastScenario {
            id: "s".into(),
            name: None,
            start_date: d(2025, 1, 1),
            end_date: d(2025, 2, 28),
            revenue_target: dec!(1000),
            roas: dec!(2),
            auto_catch_up_enabled: false,
            revenue_source: RevenueSource::Combined,
            use_monthly_targets: true,
            monthly_targets: vec![
                MonthlyTarget {
                    month: "2025-02".into(),
                    target: dec!(700),
                },
                MonthlyTarget {
                    month: "2025-01".into(),
                    target: dec!(300),
                },
            ],
            on_track_band_pct: dec!(0),
        };
        let mut warnings = Vec::new();
        let targets = resolve_monthly_targets(&scenario, &mut warnings).unwrap();
        assert_eq!(targets[0].month, "2025-01");
        assert_eq!(targets[0].target, dec!(300));
        assert_eq!(targets[1].target, dec!(700));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_resolve_folds_sub_cent_gap_into_last_month() {
        let scenario = ForecastScenario {
            id: "s".into(),
            name: None,
            start_date: d(2025, 1, 1),
            end_date: d(2025, 2, 28),
            revenue_target: dec!(1000),
            roas: dec!(2),
            auto_catch_up_enabled: false,
            revenue_source: RevenueSource::Combined,
            use_monthly_targets: true,
            monthly_targets: vec![
                MonthlyTarget {
                    month: "2025-01".into(),
                    target: dec!(300),
                },
                MonthlyTarget {
                    month: "2025-02".into(),
                    target: dec!(699.995),
                },
            ],
            on_track_band_pct: dec!(0),
        };
        let mut warnings = Vec::new();
        let targets = resolve_monthly_targets(&scenario, &mut warnings).unwrap();
        assert_eq!(targets[1].target, dec!(700));
        assert_eq!(warnings.len(), 1);
    }

    fn explicit_split(total: Decimal, jan: Decimal, feb: Decimal) -> ForecastScenario {
        ForecastScenario {
            id: "s".into(),
            name: None,
            start_date: d(2025, 1, 1),
            end_date: d(2025, 2, 28),
            revenue_target: total,
            roas: dec!(2),
            auto_catch_up_enabled: false,
            revenue_source: RevenueSource::Combined,
            use_monthly_targets: true,
            monthly_targets: vec![
                MonthlyTarget {
                    month: "2025-01".into(),
                    target: jan,
                },
                MonthlyTarget {
                    month: "2025-02".into(),
                    target: feb,
                },
            ],
            on_track_band_pct: dec!(0),
        }
    }

    #[test]
    fn test_overshoot_skips_zero_month_when_folding() {
        // sums to 1000.01; February cannot give up a cent
        let scenario = explicit_split(dec!(1000), dec!(1000.01), dec!(0));
        let mut warnings = Vec::new();
        let targets = resolve_monthly_targets(&scenario, &mut warnings).unwrap();
        assert_eq!(targets[0].target, dec!(1000));
        assert_eq!(targets[1].target, dec!(0));
        assert!(targets.iter().all(|t| t.target >= Decimal::ZERO));
        assert!(warnings[0].contains("2025-01"));
    }

    #[test]
    fn test_overshoot_no_month_can_absorb() {
        let scenario = explicit_split(dec!(0), dec!(0.005), dec!(0.005));
        let mut warnings = Vec::new();
        assert!(matches!(
            resolve_monthly_targets(&scenario, &mut warnings),
            Err(PacingError::InconsistentMonthlyTargets { .. })
        ));
    }
}
