//! Baseline daily forecast curve.
//!
//! Each month's target is spread uniformly over that month's in-range days.
//! Daily amounts are cents-rounded with the month's residual on its last
//! in-range day, so every month sums exactly to its target and the final
//! cumulative value equals the sum of all monthly targets.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, validate_range};
use crate::error::PacingError;
use crate::forecast::scenario::MonthlyTarget;
use crate::forecast::targets::spread_evenly;
use crate::types::{Money, Rate};
use crate::PacingResult;

/// One day of the baseline trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineDay {
    pub date: NaiveDate,
    pub forecast_revenue: Money,
    /// forecast_revenue / roas
    pub forecast_ad_spend: Money,
    /// Running sum of forecast revenue from the start of the range
    pub cumulative_forecast_revenue: Money,
}

/// Expand monthly targets into one `BaselineDay` per date of `[start, end]`.
pub fn build_baseline_curve(
    monthly_targets: &[MonthlyTarget],
    start: NaiveDate,
    end: NaiveDate,
    roas: Rate,
) -> PacingResult<Vec<BaselineDay>> {
    validate_range(start, end)?;
    if roas <= Decimal::ZERO {
        return Err(PacingError::InvalidRoas(roas));
    }

    let mut curve = Vec::with_capacity(calendar::days_inclusive(start, end) as usize);
    let mut cumulative = Decimal::ZERO;

    for span in calendar::months_in_range(start, end) {
        let target = monthly_targets
            .iter()
            .find(|mt| mt.month == span.key)
            .map(|mt| mt.target)
            .ok_or_else(|| PacingError::InconsistentMonthlyTargets {
                reason: format!("no target given for month {}", span.key),
            })?;

        let daily = spread_evenly(target, span.days as usize)?;
        for (date, forecast_revenue) in calendar::dates_in_range(span.first, span.last).zip(daily) {
            cumulative += forecast_revenue;
            curve.push(BaselineDay {
                date,
                forecast_revenue,
                forecast_ad_spend: forecast_revenue / roas,
                cumulative_forecast_revenue: cumulative,
            });
        }
    }

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::targets::distribute_monthly_targets;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn mt(month: &str, target: Decimal) -> MonthlyTarget {
        MonthlyTarget {
            month: month.to_string(),
            target,
        }
    }

    #[test]
    fn test_one_point_per_day() {
        let targets = vec![mt("2025-01", dec!(3100)), mt("2025-02", dec!(2800))];
        let curve = build_baseline_curve(&targets, d(2025, 1, 1), d(2025, 2, 28), dec!(2)).unwrap();
        assert_eq!(curve.len(), 59);
        assert_eq!(curve[0].date, d(2025, 1, 1));
        assert_eq!(curve[58].date, d(2025, 2, 28));
        assert_eq!(curve[0].forecast_revenue, dec!(100));
        assert_eq!(curve[0].forecast_ad_spend, dec!(50));
    }

    #[test]
    fn test_month_sums_exact_with_uneven_split() {
        let targets = vec![mt("2025-01", dec!(1000)), mt("2025-02", dec!(1000))];
        let curve = build_baseline_curve(&targets, d(2025, 1, 1), d(2025, 2, 28), dec!(3)).unwrap();
        let jan: Decimal = curve[..31].iter().map(|p| p.forecast_revenue).sum();
        let feb: Decimal = curve[31..].iter().map(|p| p.forecast_revenue).sum();
        assert_eq!(jan, dec!(1000));
        assert_eq!(feb, dec!(1000));
        // 1000 / 31 = 32.258... => 32.26 on days 1..30, 32.20 on the 31st
        assert_eq!(curve[0].forecast_revenue, dec!(32.26));
        assert_eq!(curve[30].forecast_revenue, dec!(32.20));
    }

    #[test]
    fn test_cumulative_runs_across_months() {
        let targets = vec![mt("2025-01", dec!(3100)), mt("2025-02", dec!(2800))];
        let curve = build_baseline_curve(&targets, d(2025, 1, 1), d(2025, 2, 28), dec!(2)).unwrap();
        assert_eq!(curve[30].cumulative_forecast_revenue, dec!(3100));
        assert_eq!(curve[31].cumulative_forecast_revenue, dec!(3200));
        assert_eq!(curve[58].cumulative_forecast_revenue, dec!(5900));
    }

    #[test]
    fn test_terminal_cumulative_equals_target() {
        let total = dec!(987654.32);
        let start = d(2024, 2, 10);
        let end = d(2024, 11, 3);
        let targets = distribute_monthly_targets(total, start, end).unwrap();
        let curve = build_baseline_curve(&targets, start, end, dec!(3.7)).unwrap();
        assert_eq!(curve.last().unwrap().cumulative_forecast_revenue, total);
    }

    #[test]
    fn test_missing_month_is_rejected() {
        let targets = vec![mt("2025-01", dec!(3100))];
        assert!(matches!(
            build_baseline_curve(&targets, d(2025, 1, 1), d(2025, 2, 28), dec!(2)),
            Err(PacingError::InconsistentMonthlyTargets { .. })
        ));
    }

    #[test]
    fn test_invalid_roas_rejected() {
        let targets = vec![mt("2025-01", dec!(3100))];
        assert!(matches!(
            build_baseline_curve(&targets, d(2025, 1, 1), d(2025, 1, 31), dec!(0)),
            Err(PacingError::InvalidRoas(_))
        ));
    }
}
