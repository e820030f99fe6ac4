use serde::{Deserialize, Serialize};

use super::ids::{ElementKind, PriceId, SectorId, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub value: f64,
    pub unit_id: UnitId,
}

impl Cost {
    pub fn new(value: f64, unit_id: UnitId) -> Self {
        Self { value, unit_id }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            unit_id: self.unit_id,
        }
    }
}

/// What a choice effect lands on. Serialized as the bare id, so catalogs can
/// write `"target": "reputation"` or `"target": "selling"` alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectTarget {
    Unit(UnitId),
    Price(PriceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub value: f64,
    pub target: EffectTarget,
}

impl Effect {
    pub fn on_unit(value: f64, unit: UnitId) -> Self {
        Self {
            value,
            target: EffectTarget::Unit(unit),
        }
    }

    pub fn on_price(value: f64, price: PriceId) -> Self {
        Self {
            value,
            target: EffectTarget::Price(price),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayCondition {
    #[default]
    Always,
    Never,
    UnitAtLeast {
        unit: UnitId,
        value: f64,
    },
    ElementPurchased {
        unit: UnitId,
        kind: ElementKind,
        id: String,
    },
    SectorUnlocked {
        sector: SectorId,
    },
}
