use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Actual-to-date relative to the baseline-to-date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingStatus {
    OnTrack,
    Ahead,
    Behind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingAssessment {
    /// actual - forecast
    pub delta: Money,
    /// delta / forecast * 100, zero when forecast is zero
    pub delta_pct: Rate,
    pub status: PacingStatus,
}

/// `delta / forecast * 100`, or zero when nothing was forecast.
pub fn delta_pct(delta: Money, forecast: Money) -> Rate {
    if forecast.is_zero() {
        Decimal::ZERO
    } else {
        delta / forecast * dec!(100)
    }
}

/// Classify actual-to-date against forecast-to-date.
///
/// With `band_pct` of zero only an exact match is on track. A positive band
/// widens on-track to `|delta_pct| <= band_pct`.
pub fn classify_pacing(
    actual_to_date: Money,
    forecast_to_date: Money,
    band_pct: Rate,
) -> PacingAssessment {
    let delta = actual_to_date - forecast_to_date;
    let delta_pct = delta_pct(delta, forecast_to_date);

    let within_band = band_pct > Decimal::ZERO
        && !forecast_to_date.is_zero()
        && delta_pct.abs() <= band_pct;

    let status = if delta.is_zero() || within_band {
        PacingStatus::OnTrack
    } else if delta > Decimal::ZERO {
        PacingStatus::Ahead
    } else {
        PacingStatus::Behind
    };

    PacingAssessment {
        delta,
        delta_pct,
        status,
    }
}
