mod effect;
mod ids;

pub use effect::{Cost, DisplayCondition, Effect, EffectTarget};
pub use ids::{ElementKind, PriceId, SectorId, UnitId};
