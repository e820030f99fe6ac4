use serde::{Deserialize, Serialize};

use crate::model::SectorId;

/// Balance constants shared by the shop, the complex section and the
/// search encounters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Growth applied per owned copy of a shop item.
    pub item_price_growth: f64,
    /// Linear step used by complex improvements and search pricing.
    pub scale_factor: f64,
    pub complex_time_step_ms: f64,
    pub complex_reference_duration_ms: f64,
    pub complex_base_price: f64,
    pub benefits_goal: f64,
    pub default_sector: SectorId,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            item_price_growth: 1.15,
            scale_factor: 0.25,
            complex_time_step_ms: 500.0,
            complex_reference_duration_ms: 5000.0,
            complex_base_price: 56.0,
            benefits_goal: 1_000_000.0,
            default_sector: SectorId::Production,
        }
    }
}
