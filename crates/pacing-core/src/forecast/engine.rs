use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar;
use crate::forecast::actuals::{join_actuals, ForecastDataPoint};
use crate::forecast::baseline::{build_baseline_curve, BaselineDay};
use crate::forecast::catch_up::{plan_catch_up, CatchUpInput};
use crate::forecast::pacing::{classify_pacing, PacingStatus};
use crate::forecast::rollup::{
    rollup_monthly, rollup_quarterly, rollup_weekly, MonthlyAggregate, QuarterlyAggregate,
    WeeklyAggregate,
};
use crate::forecast::scenario::{validate_scenario, DailyActual, ForecastScenario, MonthlyTarget};
use crate::forecast::targets::resolve_monthly_targets;
use crate::ratios::ad_metrics::{roas, safe_ratio};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PacingResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Scalar pacing summary as of the as-of date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// revenue_target / roas
    pub required_ad_spend_total: Money,
    /// Uniform day-0 rates before any catch-up
    pub base_required_daily_revenue: Money,
    pub base_required_daily_ad_spend: Money,
    pub total_days_in_range: u32,
    /// Days of the range on or before as-of
    pub elapsed_days: u32,
    pub days_remaining: u32,
    pub actual_revenue_to_date: Money,
    pub actual_ad_spend_to_date: Money,
    pub forecast_revenue_to_date: Money,
    /// actual_revenue_to_date - forecast_revenue_to_date
    pub delta: Money,
    /// delta / forecast_revenue_to_date * 100, zero when nothing was forecast
    pub delta_pct: Rate,
    pub status: PacingStatus,
    /// max(0, revenue_target - actual_revenue_to_date)
    pub remaining_revenue_needed: Money,
    pub remaining_ad_spend_needed: Money,
    /// Only set when behind
    pub catch_up_daily_revenue: Option<Money>,
    pub catch_up_daily_ad_spend: Option<Money>,
    /// actual revenue / actual ad spend to date
    pub actual_roas_to_date: Option<Rate>,
    /// Linear run-rate: actual to date / elapsed days * total days
    pub projected_revenue: Option<Money>,
}

/// Everything derived for one scenario as of one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub scenario: ForecastScenario,
    pub as_of_date: NaiveDate,
    pub metrics: ForecastMetrics,
    pub daily_data: Vec<ForecastDataPoint>,
    pub weekly_data: Vec<WeeklyAggregate>,
    pub monthly_data: Vec<MonthlyAggregate>,
    pub quarterly_data: Vec<QuarterlyAggregate>,
}

/// Materialised targets and baseline curve for a scenario preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionOutput {
    pub monthly_targets: Vec<MonthlyTarget>,
    pub daily_forecast_curve: Vec<BaselineDay>,
}

// ---------------------------------------------------------------------------
// Function 1: distribute_and_build_forecast
// ---------------------------------------------------------------------------

/// Monthly targets and the daily baseline for a scenario, without actuals.
pub fn distribute_and_build_forecast(
    scenario: &ForecastScenario,
) -> PacingResult<ComputationOutput<DistributionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_scenario(scenario)?;

    let monthly_targets = resolve_monthly_targets(scenario, &mut warnings)?;
    let daily_forecast_curve = build_baseline_curve(
        &monthly_targets,
        scenario.start_date,
        scenario.end_date,
        scenario.roas,
    )?;

    debug!(
        scenario = %scenario.id,
        months = monthly_targets.len(),
        days = daily_forecast_curve.len(),
        "built baseline forecast"
    );

    let output = DistributionOutput {
        monthly_targets,
        daily_forecast_curve,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Day-weighted monthly target distribution with uniform daily baseline",
        &serde_json::json!({
            "scenario_id": scenario.id,
            "start_date": scenario.start_date,
            "end_date": scenario.end_date,
            "revenue_target": scenario.revenue_target.to_string(),
            "roas": scenario.roas.to_string(),
            "use_monthly_targets": scenario.use_monthly_targets,
            "rounding": "cents, residual to last bucket",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Function 2: compute_forecast
// ---------------------------------------------------------------------------

/// Pace `actuals` against the scenario's baseline as of `as_of_date`.
///
/// Validation happens before anything is aggregated; a failed validation
/// never yields a partial result.
pub fn compute_forecast(
    scenario: &ForecastScenario,
    actuals: &[DailyActual],
    as_of_date: NaiveDate,
) -> PacingResult<ComputationOutput<ForecastResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_scenario(scenario)?;

    // --- Targets and baseline ---
    let monthly_targets = resolve_monthly_targets(scenario, &mut warnings)?;
    let curve = build_baseline_curve(
        &monthly_targets,
        scenario.start_date,
        scenario.end_date,
        scenario.roas,
    )?;

    // --- Join actuals ---
    let joined = join_actuals(&curve, actuals, as_of_date, scenario.revenue_source);
    warnings.extend(joined.warnings);
    let daily_data = joined.points;

    // --- Elapsed window ---
    let total_days = calendar::days_inclusive(scenario.start_date, scenario.end_date);
    let elapsed_days = elapsed_days(scenario.start_date, scenario.end_date, as_of_date);
    let to_date = &daily_data[..elapsed_days as usize];

    let actual_revenue_to_date = to_date
        .last()
        .map_or(Decimal::ZERO, |p| p.cumulative_actual_revenue);
    let actual_ad_spend_to_date: Money = to_date.iter().filter_map(|p| p.actual_ad_spend).sum();
    let forecast_revenue_to_date = to_date
        .last()
        .map_or(Decimal::ZERO, |p| p.cumulative_forecast_revenue);

    if elapsed_days == 0 {
        warnings.push(format!(
            "As-of date {} is before the scenario start {}; nothing has elapsed",
            as_of_date, scenario.start_date
        ));
    }

    // --- Pacing and catch-up ---
    let pacing = classify_pacing(
        actual_revenue_to_date,
        forecast_revenue_to_date,
        scenario.on_track_band_pct,
    );

    let plan = plan_catch_up(&CatchUpInput {
        revenue_target: scenario.revenue_target,
        actual_revenue_to_date,
        total_days,
        elapsed_days,
        roas: scenario.roas,
        status: pacing.status,
    })?;

    debug!(
        scenario = %scenario.id,
        %as_of_date,
        elapsed_days,
        status = ?pacing.status,
        delta = %pacing.delta,
        "classified pacing"
    );

    let required_ad_spend_total = scenario.revenue_target / scenario.roas;
    let total_days_dec = Decimal::from(total_days);

    let metrics = ForecastMetrics {
        required_ad_spend_total,
        base_required_daily_revenue: scenario.revenue_target / total_days_dec,
        base_required_daily_ad_spend: required_ad_spend_total / total_days_dec,
        total_days_in_range: total_days,
        elapsed_days,
        days_remaining: plan.days_remaining,
        actual_revenue_to_date,
        actual_ad_spend_to_date,
        forecast_revenue_to_date,
        delta: pacing.delta,
        delta_pct: pacing.delta_pct,
        status: pacing.status,
        remaining_revenue_needed: plan.remaining_revenue_needed,
        remaining_ad_spend_needed: plan.remaining_ad_spend_needed,
        catch_up_daily_revenue: plan.catch_up_daily_revenue,
        catch_up_daily_ad_spend: plan.catch_up_daily_ad_spend,
        actual_roas_to_date: roas(actual_revenue_to_date, actual_ad_spend_to_date),
        projected_revenue: safe_ratio(actual_revenue_to_date, Decimal::from(elapsed_days))
            .map(|per_day| per_day * total_days_dec),
    };

    // --- Rollups ---
    let weekly_data = rollup_weekly(&daily_data);
    let monthly_data = rollup_monthly(&daily_data);
    let quarterly_data = rollup_quarterly(&daily_data);

    let output = ForecastResult {
        scenario: scenario.clone(),
        as_of_date,
        metrics,
        daily_data,
        weekly_data,
        monthly_data,
        quarterly_data,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Linear revenue pacing against a day-weighted baseline with catch-up replanning",
        &serde_json::json!({
            "scenario_id": scenario.id,
            "as_of_date": as_of_date,
            "revenue_source": scenario.revenue_source,
            "actual_records": actuals.len(),
            "on_track_band_pct": scenario.on_track_band_pct.to_string(),
            "week_anchor": "scenario start date",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Days of `[start, end]` on or before `as_of`, clipped to the range.
pub fn elapsed_days(start: NaiveDate, end: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of < start {
        0
    } else {
        calendar::days_inclusive(start, as_of.min(end))
    }
}
