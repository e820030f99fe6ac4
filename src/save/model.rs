use serde::{Deserialize, Serialize};

use crate::minigame::SearchState;
use crate::model::{PriceId, SectorId, UnitId};
use crate::shop::ElementKey;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveCycle {
    pub elapsed_ms: f64,
    pub running: bool,
    pub auto_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveUnit {
    pub id: UnitId,
    pub amount: f64,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub value_by_action: f64,
    #[serde(default)]
    pub cycle: Option<SaveCycle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavePrice {
    pub id: PriceId,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveItemCount {
    pub unit: UnitId,
    pub id: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SaveRabbit {
    pub life: f64,
    pub kills: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSearch {
    pub sector: SectorId,
    #[serde(default)]
    pub state: SearchState,
    #[serde(default)]
    pub discovered: Vec<String>,
    #[serde(default)]
    pub declined: Vec<String>,
}

/// Everything a game needs to resume where it stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveData {
    pub version: u32,
    pub units: Vec<SaveUnit>,
    pub prices: Vec<SavePrice>,
    pub purchased: Vec<ElementKey>,
    pub item_counts: Vec<SaveItemCount>,
    pub unlocked_sectors: Vec<SectorId>,
    pub current_sector: SectorId,
    pub revealed_units: Vec<UnitId>,
    pub dark_mode: bool,
    pub start_time_ms: u64,
    pub total_ticks: u64,
    pub goal_reached: bool,
    pub rabbit: SaveRabbit,
    pub searches: Vec<SaveSearch>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            units: Vec::new(),
            prices: Vec::new(),
            purchased: Vec::new(),
            item_counts: Vec::new(),
            unlocked_sectors: vec![SectorId::default()],
            current_sector: SectorId::default(),
            revealed_units: Vec::new(),
            dark_mode: false,
            start_time_ms: 0,
            total_ticks: 0,
            goal_reached: false,
            rabbit: SaveRabbit::default(),
            searches: Vec::new(),
        }
    }
}
