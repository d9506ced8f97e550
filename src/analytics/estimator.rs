//! Loss estimation
//!
//! Turns the day's broken-hours into dollars under a uniform-average-
//! restaurant assumption: the national daily ice-cream income is split evenly
//! across every restaurant observed that day.

use super::error::AnalyticsError;
use super::types::{BrokenTimeMap, EconomicModel, LossBreakdown, HOURS_PER_DAY};

/// Computes the full loss breakdown
///
/// # Errors
/// `NoRestaurants` when the map is empty; the per-restaurant income would
/// otherwise be a division by zero.
pub fn loss_breakdown(
    broken_time: &BrokenTimeMap,
    model: &EconomicModel,
) -> Result<LossBreakdown, AnalyticsError> {
    let restaurant_count = broken_time.restaurant_count();
    if restaurant_count == 0 {
        return Err(AnalyticsError::NoRestaurants);
    }

    let broken_hours = broken_time.total_broken_hours();
    let broken_restaurant_days = broken_hours as f64 / HOURS_PER_DAY;
    let per_restaurant_daily_income =
        model.net_ice_cream_income_per_day() / restaurant_count as f64;

    Ok(LossBreakdown {
        broken_hours,
        broken_restaurant_days,
        restaurant_count,
        per_restaurant_daily_income,
        loss: broken_restaurant_days * per_restaurant_daily_income,
    })
}

/// Estimated dollars lost over the day
pub fn estimate_loss(
    broken_time: &BrokenTimeMap,
    model: &EconomicModel,
) -> Result<f64, AnalyticsError> {
    loss_breakdown(broken_time, model).map(|breakdown| breakdown.loss)
}
