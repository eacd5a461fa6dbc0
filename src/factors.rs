//! Emission factor table
//!
//! Simplified, illustrative coefficients in kg CO2e per unit. Diet factors
//! are per day.

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, DietProfile, TransportMode};

pub const ELECTRICITY_KEY: &str = "kwh";
pub const WASTE_KEY: &str = "kg_waste";

/// One row of the table, for listing
#[derive(Debug, Clone, PartialEq)]
pub struct FactorRow {
    pub category: Category,
    pub variant: &'static str,
    pub coefficient: f64,
    pub unit: &'static str,
}

/// Fixed coefficients, built once per process and never mutated
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionFactors {
    gasoline_car_km: f64,
    electric_car_km: f64,
    public_transport_km: f64,
    flight_km: f64,
    electricity_kwh: f64,
    high_meat_day: f64,
    medium_meat_day: f64,
    low_meat_day: f64,
    vegetarian_day: f64,
    vegan_day: f64,
    waste_kg: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            gasoline_car_km: 0.21,
            electric_car_km: 0.05, // grid emissions included
            public_transport_km: 0.04,
            flight_km: 0.15,
            electricity_kwh: 0.23, // average grid mix
            high_meat_day: 2.5,
            medium_meat_day: 1.5,
            low_meat_day: 0.8,
            vegetarian_day: 0.5,
            vegan_day: 0.3,
            waste_kg: 0.2, // landfill
        }
    }
}

impl EmissionFactors {
    pub fn transport(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::GasolineCar => self.gasoline_car_km,
            TransportMode::ElectricCar => self.electric_car_km,
            TransportMode::PublicTransport => self.public_transport_km,
            TransportMode::Flight => self.flight_km,
        }
    }

    pub fn electricity(&self) -> f64 {
        self.electricity_kwh
    }

    pub fn diet_per_day(&self, diet: DietProfile) -> f64 {
        match diet {
            DietProfile::HighMeat => self.high_meat_day,
            DietProfile::MediumMeat => self.medium_meat_day,
            DietProfile::LowMeat => self.low_meat_day,
            DietProfile::Vegetarian => self.vegetarian_day,
            DietProfile::Vegan => self.vegan_day,
        }
    }

    pub fn waste(&self) -> f64 {
        self.waste_kg
    }

    /// String-keyed lookup, e.g. `("transportation", "flight")` or
    /// `("electricity", "kwh")`.
    pub fn coefficient(&self, category: &str, variant: &str) -> TrackerResult<f64> {
        self.rows()
            .into_iter()
            .find(|row| row.category.key() == category && row.variant == variant)
            .map(|row| row.coefficient)
            .ok_or_else(|| TrackerError::unknown_variant(category, variant))
    }

    /// Every (category, variant) pair with its coefficient, in display order
    pub fn rows(&self) -> Vec<FactorRow> {
        let mut rows = Vec::with_capacity(11);

        for mode in TransportMode::ALL {
            rows.push(FactorRow {
                category: Category::Transportation,
                variant: mode.key(),
                coefficient: self.transport(mode),
                unit: "km",
            });
        }
        rows.push(FactorRow {
            category: Category::Electricity,
            variant: ELECTRICITY_KEY,
            coefficient: self.electricity(),
            unit: "kWh",
        });
        for diet in DietProfile::ALL {
            rows.push(FactorRow {
                category: Category::Diet,
                variant: diet.key(),
                coefficient: self.diet_per_day(diet),
                unit: "day",
            });
        }
        rows.push(FactorRow {
            category: Category::Waste,
            variant: WASTE_KEY,
            coefficient: self.waste(),
            unit: "kg",
        });

        rows
    }
}
