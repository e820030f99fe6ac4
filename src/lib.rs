pub mod app;
pub mod core;
pub mod data;
pub mod feedback;
pub mod minigame;
pub mod model;
pub mod save;
pub mod shop;
pub mod text;

pub use core::{
    BatchCycle, ElementView, EndSummary, Game, ProductionLoop, ProductionReport, ReactiveValue, Rejection,
    SubscriptionId, Unit, UnitRegistry,
};
pub use data::{
    Catalog, ElementDefinition, GameConfig, bundled_catalog, load_catalog_from_dir,
};
pub use feedback::{Feedback, FeedbackSink, LogFeedback};
pub use minigame::{RabbitGame, SearchChoice, SearchEncounter, SearchState};
pub use model::{Cost, DisplayCondition, Effect, EffectTarget, ElementKind, PriceId, SectorId, UnitId};
pub use save::{
    Autosave, FileStorage, KeyValueStorage, MemoryStorage, Persistence, SaveData,
    apply_save_data, export_to_base64, import_from_base64, save_data_from_game,
};
pub use shop::{ElementKey, ElementState, Inventory, PriceCurve, get_item_price};
pub use text::{Translate, conjugate, format_elapsed, reputation_tier, rounded_time};
