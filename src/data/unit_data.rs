use serde::{Deserialize, Serialize};

use crate::model::{Cost, DisplayCondition, PriceId, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDataFile {
    #[serde(default)]
    pub units: Vec<UnitDefinition>,
    #[serde(default)]
    pub prices: Vec<PriceDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDefinition {
    pub id: UnitId,
    #[serde(default)]
    pub amount: f64,
    /// Units produced per second.
    #[serde(default)]
    pub rate: f64,
    /// Batch cycle length in milliseconds.
    pub duration: Option<f64>,
    #[serde(default)]
    pub min_duration: f64,
    #[serde(default = "default_value_by_action")]
    pub value_by_action: f64,
    /// Lowest amount the unit can fall to.
    #[serde(default)]
    pub min: f64,
    pub max: Option<f64>,
    /// Paid per unit produced.
    pub cost: Option<Cost>,
    /// When set, the cost value follows this price instead of `cost.value`.
    pub cost_price: Option<PriceId>,
    pub revenue: Option<Revenue>,
    #[serde(default)]
    pub display: DisplayCondition,
}

/// Credited per unit produced: `gain - less`, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub unit: UnitId,
    pub gain: PriceId,
    pub less: Option<PriceId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceDefinition {
    pub id: PriceId,
    pub value: f64,
}

const fn default_value_by_action() -> f64 {
    1.0
}
