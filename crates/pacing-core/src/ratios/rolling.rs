//! Trailing-window ratios (aMER).
//!
//! Day *i* sums numerator and denominator over `[max(0, i - w + 1), i]`.
//! At the start of a series the window is partial rather than undefined,
//! so the first value is a one-day ratio, not `None`.

use std::collections::VecDeque;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PacingError;
use crate::ratios::ad_metrics::safe_ratio;
use crate::types::{Money, Rate};
use crate::PacingResult;

/// Default aMER window.
pub const DEFAULT_WINDOW_DAYS: usize = 7;

/// One observation of a rolling ratio series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub revenue: Money,
    pub spend: Money,
}

/// A rolling ratio alongside the window sums that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub window_revenue: Money,
    pub window_spend: Money,
    /// Days actually covered; less than the window at the start of a series
    pub window_len: usize,
    pub ratio: Option<Rate>,
}

/// Trailing-window accumulator. Keeps running sums so each step is O(1).
#[derive(Debug, Clone)]
pub struct RollingWindow {
    window_days: usize,
    samples: VecDeque<(Money, Money)>,
    revenue_sum: Money,
    spend_sum: Money,
}

impl RollingWindow {
    pub fn new(window_days: usize) -> PacingResult<Self> {
        if window_days == 0 {
            return Err(PacingError::InvalidInput {
                field: "window_days".into(),
                reason: "Rolling window must cover at least one day".into(),
            });
        }

        Ok(Self {
            window_days,
            samples: VecDeque::with_capacity(window_days),
            revenue_sum: Decimal::ZERO,
            spend_sum: Decimal::ZERO,
        })
    }

    /// Push a day and return the ratio over the current window.
    pub fn push(&mut self, revenue: Money, spend: Money) -> Option<Rate> {
        self.samples.push_back((revenue, spend));
        self.revenue_sum += revenue;
        self.spend_sum += spend;

        if self.samples.len() > self.window_days {
            if let Some((old_revenue, old_spend)) = self.samples.pop_front() {
                self.revenue_sum -= old_revenue;
                self.spend_sum -= old_spend;
            }
        }

        self.ratio()
    }

    pub fn ratio(&self) -> Option<Rate> {
        safe_ratio(self.revenue_sum, self.spend_sum)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sums(&self) -> (Money, Money) {
        (self.revenue_sum, self.spend_sum)
    }
}

// ---------------------------------------------------------------------------
// Function: compute_rolling_ratio
// ---------------------------------------------------------------------------

/// Rolling revenue/spend ratio for each entry of `series`.
///
/// `None` only where the windowed spend sums to zero.
pub fn compute_rolling_ratio(
    series: &[RollingSample],
    window_days: usize,
) -> PacingResult<Vec<Option<Rate>>> {
    Ok(compute_rolling_points(series, window_days)?
        .into_iter()
        .map(|p| p.ratio)
        .collect())
}

/// Same as [`compute_rolling_ratio`] but keeps the window sums and dates.
pub fn compute_rolling_points(
    series: &[RollingSample],
    window_days: usize,
) -> PacingResult<Vec<RollingPoint>> {
    let mut window = RollingWindow::new(window_days)?;

    Ok(series
        .iter()
        .map(|s| {
            let ratio = window.push(s.revenue, s.spend);
            let (window_revenue, window_spend) = window.sums();
            RollingPoint {
                date: s.date,
                window_revenue,
                window_spend,
                window_len: window.len(),
                ratio,
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(revenue: Decimal, spend: Decimal) -> RollingSample {
        RollingSample {
            date: None,
            revenue,
            spend,
        }
    }

    #[test]
    fn test_partial_window_uses_available_days() {
        // revenue [10, 20, 30], spend 10 each day
        let series = vec![
            sample(dec!(10), dec!(10)),
            sample(dec!(20), dec!(10)),
            sample(dec!(30), dec!(10)),
        ];
        let out = compute_rolling_ratio(&series, 7).unwrap();
        assert_eq!(out[0], Some(dec!(1)));
        // (10 + 20) / 20
        assert_eq!(out[1], Some(dec!(1.5)));
        // (10 + 20 + 30) / 30, not divided by 7
        assert_eq!(out[2], Some(dec!(2)));
    }

    #[test]
    fn test_window_drops_oldest_day() {
        let series = vec![
            sample(dec!(100), dec!(10)),
            sample(dec!(10), dec!(10)),
            sample(dec!(10), dec!(10)),
        ];
        let points = compute_rolling_points(&series, 2).unwrap();
        assert_eq!(points[2].window_len, 2);
        assert_eq!(points[2].window_revenue, dec!(20));
        assert_eq!(points[2].ratio, Some(dec!(1)));
    }

    #[test]
    fn test_zero_spend_window_is_none() {
        let series = vec![
            sample(dec!(50), dec!(0)),
            sample(dec!(50), dec!(0)),
            sample(dec!(50), dec!(25)),
        ];
        let out = compute_rolling_ratio(&series, 7).unwrap();
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        // 150 / 25
        assert_eq!(out[2], Some(dec!(6)));
    }

    #[test]
    fn test_spend_leaving_window_returns_to_none() {
        let series = vec![
            sample(dec!(10), dec!(5)),
            sample(dec!(10), dec!(0)),
            sample(dec!(10), dec!(0)),
        ];
        let out = compute_rolling_ratio(&series, 2).unwrap();
        assert_eq!(out[1], Some(dec!(4)));
        assert_eq!(out[2], None);
    }

    #[test]
    fn test_zero_window_rejected() {
        let series = vec![sample(dec!(1), dec!(1))];
        assert!(matches!(
            compute_rolling_ratio(&series, 0),
            Err(PacingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_series() {
        let out = compute_rolling_ratio(&[], DEFAULT_WINDOW_DAYS).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_dates_carried_through() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let series = vec![RollingSample {
            date: Some(date),
            revenue: dec!(30),
            spend: dec!(10),
        }];
        let points = compute_rolling_points(&series, 7).unwrap();
        assert_eq!(points[0].date, Some(date));
        assert_eq!(points[0].ratio, Some(dec!(3)));
    }
}
