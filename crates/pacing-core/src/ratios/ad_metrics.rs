//! Advertising efficiency ratios from raw counters.
//!
//! Every ratio returns `None` when its denominator is zero so that charting
//! and aggregation layers can skip the point instead of plotting a false zero.
//! Invalid input (a malformed window, a negative target) is an error; an
//! undefined ratio is not.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw advertising counters for one scope (account, campaign, ad, day).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdCounters {
    #[serde(default)]
    pub spend: Money,
    #[serde(default)]
    pub impressions: Decimal,
    #[serde(default)]
    pub clicks: Decimal,
    #[serde(default)]
    pub purchases: Decimal,
    #[serde(default)]
    pub revenue: Money,
}

impl Add for AdCounters {
    type Output = AdCounters;

    fn add(self, rhs: AdCounters) -> AdCounters {
        AdCounters {
            spend: self.spend + rhs.spend,
            impressions: self.impressions + rhs.impressions,
            clicks: self.clicks + rhs.clicks,
            purchases: self.purchases + rhs.purchases,
            revenue: self.revenue + rhs.revenue,
        }
    }
}

impl Sum for AdCounters {
    fn sum<I: Iterator<Item = AdCounters>>(iter: I) -> AdCounters {
        iter.fold(AdCounters::default(), Add::add)
    }
}

impl<'a> Sum<&'a AdCounters> for AdCounters {
    fn sum<I: Iterator<Item = &'a AdCounters>>(iter: I) -> AdCounters {
        iter.copied().sum()
    }
}

/// Derived ratios. `None` means the ratio is undefined for these counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioMetrics {
    /// revenue / spend
    pub roas: Option<Rate>,
    /// spend / purchases
    pub cpa: Option<Money>,
    /// spend / impressions * 1000
    pub cpm: Option<Money>,
    /// clicks / impressions * 100 (percent)
    pub ctr: Option<Rate>,
    /// revenue / spend at account level
    pub mer: Option<Rate>,
    /// spend / clicks
    pub cpc: Option<Money>,
    /// purchases / clicks * 100 (percent)
    pub cvr: Option<Rate>,
    /// revenue / purchases
    pub aov: Option<Money>,
}

// ---------------------------------------------------------------------------
// Ratio primitives
// ---------------------------------------------------------------------------

/// `numerator / denominator`, or `None` when the denominator is zero or the
/// quotient does not fit in a Decimal.
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}

pub fn roas(revenue: Money, spend: Money) -> Option<Rate> {
    safe_ratio(revenue, spend)
}

pub fn cpa(spend: Money, purchases: Decimal) -> Option<Money> {
    safe_ratio(spend, purchases)
}

pub fn cpm(spend: Money, impressions: Decimal) -> Option<Money> {
    safe_ratio(spend, impressions).and_then(|r| r.checked_mul(dec!(1000)))
}

pub fn ctr(clicks: Decimal, impressions: Decimal) -> Option<Rate> {
    safe_ratio(clicks, impressions).and_then(|r| r.checked_mul(dec!(100)))
}

/// Marketing efficiency ratio: total revenue over total ad spend.
pub fn mer(revenue: Money, spend: Money) -> Option<Rate> {
    roas(revenue, spend)
}

// ---------------------------------------------------------------------------
// Function 1: compute_ratio_metrics
// ---------------------------------------------------------------------------

/// Convert one set of raw counters into the full ratio set.
pub fn compute_ratio_metrics(counters: &AdCounters) -> RatioMetrics {
    RatioMetrics {
        roas: roas(counters.revenue, counters.spend),
        cpa: cpa(counters.spend, counters.purchases),
        cpm: cpm(counters.spend, counters.impressions),
        ctr: ctr(counters.clicks, counters.impressions),
        mer: mer(counters.revenue, counters.spend),
        cpc: safe_ratio(counters.spend, counters.clicks),
        cvr: safe_ratio(counters.purchases, counters.clicks).and_then(|r| r.checked_mul(dec!(100))),
        aov: safe_ratio(counters.revenue, counters.purchases),
    }
}

/// Ratios for each entry of a counter series, e.g. one per day.
pub fn compute_ratio_series(series: &[AdCounters]) -> Vec<RatioMetrics> {
    series.iter().map(compute_ratio_metrics).collect()
}

/// Ratios of the summed counters, e.g. account level over several campaigns.
///
/// This is not the mean of per-entry ratios: entries with zero spend still
/// contribute their revenue.
pub fn compute_aggregate_ratio_metrics(series: &[AdCounters]) -> RatioMetrics {
    let total: AdCounters = series.iter().sum();
    compute_ratio_metrics(&total)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
