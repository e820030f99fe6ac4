use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;

use crate::core::Game;
use crate::minigame::SearchChoice;
use crate::model::{ElementKind, UnitId};
use crate::save::{Autosave, DEFAULT_AUTOSAVE_DEBOUNCE_MS, FileStorage, Persistence};

#[derive(Resource, Debug, Clone)]
pub struct RuntimeConfig {
    pub save_dir: PathBuf,
    pub tick_hz: f32,
    pub autosave_debounce_ms: u64,
    pub window_title: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saves"),
            tick_hz: 10.0,
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            window_title: "Complex Idle".to_string(),
        }
    }
}

#[derive(Resource, Debug)]
pub struct SessionState {
    pub game: Game,
    pub persistence: Persistence<FileStorage>,
    pub autosave: Autosave,
    pub tick_timer: Timer,
    pub last_save_error: Option<String>,
    pub last_message: Option<String>,
}

/// Unit the shop hotkeys act on.
#[derive(Resource, Debug, Clone, Copy)]
pub struct FocusState {
    pub unit: UnitId,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            unit: UnitId::Actif,
        }
    }
}

impl FocusState {
    pub const CYCLE: [UnitId; 3] = [UnitId::Actif, UnitId::Complex, UnitId::Sale];

    /// Next focusable unit the game currently shows.
    pub fn step(&mut self, game: &Game) {
        let start = Self::CYCLE
            .iter()
            .position(|unit| *unit == self.unit)
            .unwrap_or(0);
        for offset in 1..=Self::CYCLE.len() {
            let candidate = Self::CYCLE[(start + offset) % Self::CYCLE.len()];
            if game.can_display_unit(candidate) {
                self.unit = candidate;
                return;
            }
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum GameAction {
    BuyUnit(UnitId),
    BuyNextElement(UnitId, ElementKind),
    BuyItemCopy(UnitId),
    StartCycle(UnitId),
    ToggleAutoMode(UnitId),
    ImproveComplexTime,
    ImproveComplexQuantity,
    RunExperiment(usize),
    BuyRabbit,
    StartSearch,
    ResolveSearch(SearchChoice),
    StepSector(i32),
    ToggleDarkMode,
}

#[derive(Component)]
pub struct HudText;

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
