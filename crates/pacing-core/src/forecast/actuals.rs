//! Join sparse daily actuals onto the baseline curve.
//!
//! `actual_revenue` / `actual_ad_spend` are `None` exactly when no record was
//! supplied for a date on or before the as-of date, and always `None` after
//! it. Cumulative actuals treat a missing record as zero and stop growing
//! after the as-of date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::forecast::baseline::BaselineDay;
use crate::forecast::scenario::{DailyActual, RevenueSource};
use crate::types::{Money, MAX_MONEY};

/// Actual-vs-forecast record for one day of the scenario range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDataPoint {
    pub date: NaiveDate,
    /// `None` when no actual was reported (or the date is after as-of)
    pub actual_revenue: Option<Money>,
    pub actual_ad_spend: Option<Money>,
    pub forecast_revenue: Money,
    pub forecast_ad_spend: Money,
    pub cumulative_actual_revenue: Money,
    pub cumulative_forecast_revenue: Money,
}

/// Joined series plus the notes produced while joining.
#[derive(Debug, Clone)]
pub struct JoinedActuals {
    pub points: Vec<ForecastDataPoint>,
    pub warnings: Vec<String>,
}

/// Merge `actuals` onto `curve` by date, as of `as_of`.
///
/// Several records for the same date are summed (multi-channel feeds).
/// Records outside the curve, after `as_of`, from a source the scenario does
/// not pace against, or with amounts above `MAX_MONEY` are dropped and
/// reported in `warnings`.
pub fn join_actuals(
    curve: &[BaselineDay],
    actuals: &[DailyActual],
    as_of: NaiveDate,
    source: RevenueSource,
) -> JoinedActuals {
    let mut warnings = Vec::new();
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(f), Some(l)) => (f.date, l.date),
        _ => {
            return JoinedActuals {
                points: Vec::new(),
                warnings,
            }
        }
    };

    let mut by_date: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();
    let mut out_of_range = 0usize;
    let mut after_as_of = 0usize;
    let mut other_source = 0usize;
    let mut oversized = 0usize;

    for actual in actuals {
        if !source.accepts(actual.source) {
            other_source += 1;
        } else if actual.revenue.abs() > MAX_MONEY || actual.ad_spend.abs() > MAX_MONEY {
            oversized += 1;
        } else if actual.date < first || actual.date > last {
            out_of_range += 1;
        } else if actual.date > as_of {
            after_as_of += 1;
        } else {
            let entry = by_date
                .entry(actual.date)
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            entry.0 += actual.revenue;
            entry.1 += actual.ad_spend;
        }
    }

    if oversized > 0 {
        warn!(count = oversized, "dropping actuals larger than the accepted amount");
        warnings.push(format!(
            "{oversized} actual record(s) above {MAX_MONEY} in revenue or ad spend ignored"
        ));
    }
    if out_of_range > 0 {
        warn!(count = out_of_range, "dropping actuals outside the scenario range");
        warnings.push(format!(
            "{out_of_range} actual record(s) outside {first}..={last} ignored"
        ));
    }
    if after_as_of > 0 {
        warn!(count = after_as_of, %as_of, "dropping actuals dated after as-of");
        warnings.push(format!(
            "{after_as_of} actual record(s) dated after {as_of} ignored"
        ));
    }
    if other_source > 0 {
        warn!(count = other_source, ?source, "dropping actuals from another revenue source");
        warnings.push(format!(
            "{other_source} actual record(s) from a source other than {source:?} ignored"
        ));
    }

    let mut cumulative_actual = Decimal::ZERO;
    let points = curve
        .iter()
        .map(|day| {
            let actual = by_date.get(&day.date).copied();
            if let Some((revenue, _)) = actual {
                cumulative_actual += revenue;
            }
            ForecastDataPoint {
                date: day.date,
                actual_revenue: actual.map(|(revenue, _)| revenue),
                actual_ad_spend: actual.map(|(_, spend)| spend),
                forecast_revenue: day.forecast_revenue,
                forecast_ad_spend: day.forecast_ad_spend,
                cumulative_actual_revenue: cumulative_actual,
                cumulative_forecast_revenue: day.cumulative_forecast_revenue,
            }
        })
        .collect();

    JoinedActuals { points, warnings }
}
