use serde::{Deserialize, Serialize};

use crate::model::{Effect, SectorId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RabbitDataFile {
    pub test_price: f64,
    pub factor: f64,
    pub price: f64,
    pub life: f64,
    #[serde(default)]
    pub items: Vec<Experiment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub power: f64,
    #[serde(default)]
    pub values: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDataFile {
    pub sector: SectorId,
    /// Seconds.
    pub duration: f64,
    pub price: f64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub toxic: bool,
    #[serde(default)]
    pub accept_values: Vec<Effect>,
    #[serde(default)]
    pub decline_values: Vec<Effect>,
}
