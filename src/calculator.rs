//! Footprint calculator logic

use tracing::debug;

use crate::error::{TrackerError, TrackerResult};
use crate::factors::EmissionFactors;
use crate::models::{ActivityInput, Breakdown};

/// Diet factors are per day; a month is always counted as 30 days.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Result of a single calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub total: f64,
    pub breakdown: Breakdown,
}

/// Accepts finite, non-negative values; `-0.0` comes back as `0.0`.
fn check_quantity(field: &'static str, value: f64) -> TrackerResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(if value == 0.0 { 0.0 } else { value })
    } else {
        Err(TrackerError::invalid_input(field, value))
    }
}

/// Calculate the monthly footprint for the given activity figures
///
/// All quantities are validated before any coefficient is looked up; a
/// negative or non-finite value is rejected, never clamped.
pub fn calculate_footprint(
    input: &ActivityInput,
    factors: &EmissionFactors,
) -> TrackerResult<Footprint> {
    let transport_km = check_quantity("transport_km", input.transport_km)?;
    let electricity_kwh = check_quantity("electricity_kwh", input.electricity_kwh)?;
    let waste_kg = check_quantity("waste_kg", input.waste_kg)?;

    let breakdown = Breakdown {
        transportation: transport_km * factors.transport(input.transport_mode),
        electricity: electricity_kwh * factors.electricity(),
        diet: input
            .diet
            .map_or(0.0, |diet| factors.diet_per_day(diet) * DAYS_PER_MONTH),
        waste: waste_kg * factors.waste(),
    };
    let total = breakdown.total();

    debug!(
        target: "carbon_tracker::calculator",
        transport_mode = input.transport_mode.key(),
        diet = input.diet.map_or("none", |diet| diet.key()),
        total,
        "footprint calculated"
    );

    Ok(Footprint { total, breakdown })
}
