//! Data models for activity inputs and footprint records

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Lowercase, drop any parenthesised hint, and fold spaces/dashes into `_`.
///
/// Accepts `gasoline_car`, `gasoline-car`, `Gasoline Car` and
/// `High Meat (Daily)` alike.
fn normalize_label(label: &str) -> String {
    let head = label.split('(').next().unwrap_or(label);
    head.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Primary mode of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    GasolineCar,
    ElectricCar,
    PublicTransport,
    Flight,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::GasolineCar,
        TransportMode::ElectricCar,
        TransportMode::PublicTransport,
        TransportMode::Flight,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TransportMode::GasolineCar => "gasoline_car",
            TransportMode::ElectricCar => "electric_car",
            TransportMode::PublicTransport => "public_transport",
            TransportMode::Flight => "flight",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransportMode::GasolineCar => "Gasoline Car",
            TransportMode::ElectricCar => "Electric Car",
            TransportMode::PublicTransport => "Public Transport",
            TransportMode::Flight => "Flight",
        }
    }
}

impl FromStr for TransportMode {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        TransportMode::ALL
            .into_iter()
            .find(|mode| mode.key() == normalized)
            .ok_or_else(|| TrackerError::unknown_variant(Category::Transportation.key(), s))
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Typical diet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietProfile {
    HighMeat,
    MediumMeat,
    LowMeat,
    Vegetarian,
    Vegan,
}

impl DietProfile {
    pub const ALL: [DietProfile; 5] = [
        DietProfile::HighMeat,
        DietProfile::MediumMeat,
        DietProfile::LowMeat,
        DietProfile::Vegetarian,
        DietProfile::Vegan,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DietProfile::HighMeat => "high_meat",
            DietProfile::MediumMeat => "medium_meat",
            DietProfile::LowMeat => "low_meat",
            DietProfile::Vegetarian => "vegetarian",
            DietProfile::Vegan => "vegan",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DietProfile::HighMeat => "High Meat (Daily)",
            DietProfile::MediumMeat => "Medium Meat (Few times/week)",
            DietProfile::LowMeat => "Low Meat (Once/week)",
            DietProfile::Vegetarian => "Vegetarian",
            DietProfile::Vegan => "Vegan",
        }
    }
}

impl FromStr for DietProfile {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        DietProfile::ALL
            .into_iter()
            .find(|diet| diet.key() == normalized)
            .ok_or_else(|| TrackerError::unknown_variant(Category::Diet.key(), s))
    }
}

impl fmt::Display for DietProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn parse_optional_diet(label: &str) -> Result<Option<DietProfile>, TrackerError> {
    match normalize_label(label).as_str() {
        "" | "none" => Ok(None),
        _ => label.parse().map(Some),
    }
}

/// Footprint categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Transportation,
    Electricity,
    Diet,
    Waste,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Transportation,
        Category::Electricity,
        Category::Diet,
        Category::Waste,
    ];

    /// Key used by the emission factor table
    pub fn key(self) -> &'static str {
        match self {
            Category::Transportation => "transportation",
            Category::Electricity => "electricity",
            Category::Diet => "diet",
            Category::Waste => "waste",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Transportation => "Transportation",
            Category::Electricity => "Electricity",
            Category::Diet => "Diet",
            Category::Waste => "Waste",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monthly activity figures for one calculation
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityInput {
    pub transport_km: f64,
    pub transport_mode: TransportMode,
    pub electricity_kwh: f64,
    /// `None` leaves diet out of the footprint
    pub diet: Option<DietProfile>,
    pub waste_kg: f64,
}

impl ActivityInput {
    /// Build an input from free-text variant labels.
    ///
    /// A diet label of `none` (or an empty label) means diet is not tracked.
    pub fn from_labels(
        transport_km: f64,
        transport_mode: &str,
        electricity_kwh: f64,
        diet: &str,
        waste_kg: f64,
    ) -> Result<Self, TrackerError> {
        Ok(Self {
            transport_km,
            transport_mode: transport_mode.parse()?,
            electricity_kwh,
            diet: parse_optional_diet(diet)?,
            waste_kg,
        })
    }
}

/// Per-category CO2e contributions in kg
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    #[serde(rename = "Transportation")]
    pub transportation: f64,
    #[serde(rename = "Electricity")]
    pub electricity: f64,
    #[serde(rename = "Diet")]
    pub diet: f64,
    #[serde(rename = "Waste")]
    pub waste: f64,
}

impl Breakdown {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Transportation => self.transportation,
            Category::Electricity => self.electricity,
            Category::Diet => self.diet,
            Category::Waste => self.waste,
        }
    }

    /// Contributions in fixed category order, zeros included
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, kg)| kg).sum()
    }
}

/// One completed calculation, as kept in the session history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintRecord {
    date: NaiveDate,
    total: f64,
    breakdown: Breakdown,
}

impl FootprintRecord {
    pub(crate) fn new(date: NaiveDate, breakdown: Breakdown) -> Self {
        Self {
            date,
            total: breakdown.total(),
            breakdown,
        }
    }

    /// Rebuild a record read back from storage
    pub(crate) fn restore(date: NaiveDate, total: f64, breakdown: Breakdown) -> Self {
        Self {
            date,
            total,
            breakdown,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn breakdown(&self) -> &Breakdown {
        &self.breakdown
    }
}
