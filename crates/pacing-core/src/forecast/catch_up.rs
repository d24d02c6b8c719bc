//! Catch-up replanning.
//!
//! When a scenario is behind, the catch-up plan is the flat daily revenue
//! (and implied ad spend) needed over the remaining days to still land on the
//! original target. The plan is advisory: the baseline curve is never changed.
//! [`project_catch_up_curve`] lets a caller re-pace the future part of the
//! daily series when the scenario opts in with `auto_catch_up_enabled`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PacingError;
use crate::forecast::actuals::ForecastDataPoint;
use crate::forecast::engine::ForecastResult;
use crate::forecast::pacing::PacingStatus;
use crate::forecast::targets::spread_evenly;
use crate::types::{Money, Rate};
use crate::PacingResult;

/// Inputs for a catch-up plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchUpInput {
    pub revenue_target: Money,
    pub actual_revenue_to_date: Money,
    pub total_days: u32,
    pub elapsed_days: u32,
    pub roas: Rate,
    pub status: PacingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchUpPlan {
    /// max(0, target - actual to date)
    pub remaining_revenue_needed: Money,
    /// remaining_revenue_needed / roas
    pub remaining_ad_spend_needed: Money,
    pub days_remaining: u32,
    /// Set only when behind. With no days left this is the whole remainder.
    pub catch_up_daily_revenue: Option<Money>,
    /// catch_up_daily_revenue / roas
    pub catch_up_daily_ad_spend: Option<Money>,
}

/// Compute the remaining need and, when behind, the required daily pace.
pub fn plan_catch_up(input: &CatchUpInput) -> PacingResult<CatchUpPlan> {
    if input.roas <= Decimal::ZERO {
        return Err(PacingError::InvalidRoas(input.roas));
    }
    if input.elapsed_days > input.total_days {
        return Err(PacingError::InvalidInput {
            field: "elapsed_days".into(),
            reason: format!(
                "elapsed days ({}) exceed total days ({})",
                input.elapsed_days, input.total_days
            ),
        });
    }

    let remaining_revenue_needed =
        (input.revenue_target - input.actual_revenue_to_date).max(Decimal::ZERO);
    let days_remaining = input.total_days - input.elapsed_days;

    let catch_up_daily_revenue = if input.status == PacingStatus::Behind {
        let divisor = Decimal::from(days_remaining.max(1));
        Some(remaining_revenue_needed / divisor)
    } else {
        None
    };

    Ok(CatchUpPlan {
        remaining_revenue_needed,
        remaining_ad_spend_needed: remaining_revenue_needed / input.roas,
        days_remaining,
        catch_up_daily_revenue,
        catch_up_daily_ad_spend: catch_up_daily_revenue.map(|r| r / input.roas),
    })
}

/// The daily series with future days re-paced to the catch-up plan.
///
/// Returns the series unchanged unless the scenario has
/// `auto_catch_up_enabled`, is behind, and has days left. Future days share
/// the remaining need evenly (cents-rounded, residual on the last day) and the
/// cumulative forecast is re-anchored on actual revenue to date, so it still
/// ends on the revenue target.
pub fn project_catch_up_curve(result: &ForecastResult) -> PacingResult<Vec<ForecastDataPoint>> {
    let metrics = &result.metrics;
    let mut points = result.daily_data.clone();

    if !result.scenario.auto_catch_up_enabled
        || metrics.status != PacingStatus::Behind
        || metrics.catch_up_daily_revenue.is_none()
    {
        return Ok(points);
    }

    let elapsed = metrics.elapsed_days as usize;
    if elapsed >= points.len() {
        return Ok(points);
    }

    let future = &mut points[elapsed..];
    let shares = spread_evenly(metrics.remaining_revenue_needed, future.len())?;
    let mut cumulative = metrics.actual_revenue_to_date;
    for (point, share) in future.iter_mut().zip(shares) {
        cumulative += share;
        point.forecast_revenue = share;
        point.forecast_ad_spend = share / result.scenario.roas;
        point.cumulative_forecast_revenue = cumulative;
    }

    Ok(points)
}
