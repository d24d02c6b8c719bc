//! Weekly, monthly and quarterly rollups of the daily series.
//!
//! Weeks are consecutive 7-day windows anchored on the scenario start date
//! (week 1 is days 1-7 of the range), not ISO weeks; the last week may be
//! short. Months and quarters are calendar buckets clipped to the range.
//! Missing actuals count as zero.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::forecast::actuals::ForecastDataPoint;
use crate::forecast::pacing::delta_pct;
use crate::types::{Money, Rate};

pub const WEEK_DAYS: usize = 7;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Summed actual and forecast figures for one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub days: u32,
    pub actual_revenue: Money,
    pub actual_ad_spend: Money,
    pub forecast_revenue: Money,
    pub forecast_ad_spend: Money,
    /// actual_revenue - forecast_revenue
    pub delta: Money,
    /// delta / forecast_revenue * 100, zero when forecast is zero
    pub delta_pct: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    /// 1-based, counted from the scenario start date
    pub week_number: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub totals: BucketTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// `YYYY-MM`
    pub month: String,
    #[serde(flatten)]
    pub totals: BucketTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyAggregate {
    /// `Q{1-4} {year}`
    pub label: String,
    pub quarter: u32,
    pub year: i32,
    #[serde(flatten)]
    pub totals: BucketTotals,
}

// ---------------------------------------------------------------------------
// Folding
// ---------------------------------------------------------------------------

/// Sum a run of days into bucket totals.
pub fn fold_bucket(points: &[ForecastDataPoint]) -> BucketTotals {
    let mut totals = BucketTotals {
        days: points.len() as u32,
        ..BucketTotals::default()
    };

    for p in points {
        totals.actual_revenue += p.actual_revenue.unwrap_or(Decimal::ZERO);
        totals.actual_ad_spend += p.actual_ad_spend.unwrap_or(Decimal::ZERO);
        totals.forecast_revenue += p.forecast_revenue;
        totals.forecast_ad_spend += p.forecast_ad_spend;
    }

    totals.delta = totals.actual_revenue - totals.forecast_revenue;
    totals.delta_pct = delta_pct(totals.delta, totals.forecast_revenue);
    totals
}

/// Start-anchored 7-day buckets.
pub fn rollup_weekly(points: &[ForecastDataPoint]) -> Vec<WeeklyAggregate> {
    points
        .chunks(WEEK_DAYS)
        .enumerate()
        .filter_map(|(i, week)| {
            let (first, last) = (week.first()?, week.last()?);
            Some(WeeklyAggregate {
                week_number: i as u32 + 1,
                start_date: first.date,
                end_date: last.date,
                totals: fold_bucket(week),
            })
        })
        .collect()
}

pub fn rollup_monthly(points: &[ForecastDataPoint]) -> Vec<MonthlyAggregate> {
    points
        .chunk_by(|a, b| a.date.year() == b.date.year() && a.date.month() == b.date.month())
        .filter_map(|month| {
            let first = month.first()?;
            Some(MonthlyAggregate {
                month: calendar::month_key(first.date),
                totals: fold_bucket(month),
            })
        })
        .collect()
}

pub fn rollup_quarterly(points: &[ForecastDataPoint]) -> Vec<QuarterlyAggregate> {
    points
        .chunk_by(|a, b| {
            a.date.year() == b.date.year()
                && calendar::quarter_of(a.date) == calendar::quarter_of(b.date)
        })
        .filter_map(|quarter| {
            let first = quarter.first()?;
            Some(QuarterlyAggregate {
                label: calendar::quarter_label(first.date),
                quarter: calendar::quarter_of(first.date),
                year: first.date.year(),
                totals: fold_bucket(quarter),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Forecast 10/day; actual 12/day on even day offsets, missing on odd ones.
    fn series(start: NaiveDate, end: NaiveDate) -> Vec<ForecastDataPoint> {
        calendar::dates_in_range(start, end)
            .enumerate()
            .map(|(i, date)| {
                let actual = if i % 2 == 0 { Some(dec!(12)) } else { None };
                ForecastDataPoint {
                    date,
                    actual_revenue: actual,
                    actual_ad_spend: actual.map(|_| dec!(3)),
                    forecast_revenue: dec!(10),
                    forecast_ad_spend: dec!(2.5),
                    cumulative_actual_revenue: Decimal::ZERO,
                    cumulative_forecast_revenue: Decimal::ZERO,
                }
            })
            .collect()
    }

    #[test]
    fn test_weeks_anchor_on_start_date() {
        // Wednesday start; 17 days => 7 + 7 + 3
        let points = series(d(2025, 1, 1), d(2025, 1, 17));
        let weeks = rollup_weekly(&points);
        assert_eq!(weeks.len(), 3);
        assert_eq!(weeks[0].week_number, 1);
        assert_eq!(weeks[0].start_date, d(2025, 1, 1));
        assert_eq!(weeks[0].end_date, d(2025, 1, 7));
        assert_eq!(weeks[2].start_date, d(2025, 1, 15));
        assert_eq!(weeks[2].totals.days, 3);
    }

    #[test]
    fn test_week_totals_treat_missing_as_zero() {
        let points = series(d(2025, 1, 1), d(2025, 1, 7));
        let week = &rollup_weekly(&points)[0];
        // actuals on offsets 0, 2, 4, 6
        assert_eq!(week.totals.actual_revenue, dec!(48));
        assert_eq!(week.totals.actual_ad_spend, dec!(12));
        assert_eq!(week.totals.forecast_revenue, dec!(70));
        assert_eq!(week.totals.forecast_ad_spend, dec!(17.5));
        assert_eq!(week.totals.delta, dec!(-22));
        // -22 / 70 * 100
        assert!((week.totals.delta_pct - dec!(-31.428571)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_monthly_buckets_follow_calendar() {
        let points = series(d(2025, 1, 30), d(2025, 3, 2));
        let months = rollup_monthly(&points);
        let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(keys, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(months[0].totals.days, 2);
        assert_eq!(months[1].totals.days, 28);
        assert_eq!(months[1].totals.forecast_revenue, dec!(280));
        assert_eq!(months[2].totals.days, 2);
    }

    #[test]
    fn test_quarterly_labels_across_year_end() {
        let points = series(d(2024, 12, 1), d(2025, 4, 30));
        let quarters = rollup_quarterly(&points);
        let labels: Vec<&str> = quarters.iter().map(|q| q.label.as_str()).collect();
        assert_eq!(labels, vec!["Q4 2024", "Q1 2025", "Q2 2025"]);
        assert_eq!(quarters[1].quarter, 1);
        assert_eq!(quarters[1].year, 2025);
        assert_eq!(quarters[1].totals.days, 90);
    }

    #[test]
    fn test_zero_forecast_bucket_has_zero_delta_pct() {
        let mut points = series(d(2025, 1, 1), d(2025, 1, 3));
        for p in &mut points {
            p.forecast_revenue = dec!(0);
        }
        let totals = fold_bucket(&points);
        assert_eq!(totals.delta_pct, dec!(0));
        assert_eq!(totals.delta, dec!(24));
    }

    #[test]
    fn test_rollups_of_empty_series() {
        assert!(rollup_weekly(&[]).is_empty());
        assert!(rollup_monthly(&[]).is_empty());
        assert!(rollup_quarterly(&[]).is_empty());
    }

    #[test]
    fn test_bucket_sums_match_daily_total() {
        let points = series(d(2025, 1, 1), d(2025, 6, 30));
        let daily: Decimal = points.iter().map(|p| p.forecast_revenue).sum();
        let weekly: Decimal = rollup_weekly(&points).iter().map(|w| w.totals.forecast_revenue).sum();
        let monthly: Decimal = rollup_monthly(&points).iter().map(|m| m.totals.forecast_revenue).sum();
        let quarterly: Decimal = rollup_quarterly(&points).iter().map(|q| q.totals.forecast_revenue).sum();
        assert_eq!(weekly, daily);
        assert_eq!(monthly, daily);
        assert_eq!(quarterly, daily);
    }
}
