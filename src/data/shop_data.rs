use serde::{Deserialize, Serialize};

use crate::model::{Cost, DisplayCondition, ElementKind, SectorId, UnitId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopDataFile {
    #[serde(default)]
    pub units: Vec<UnitShelf>,
}

impl ShopDataFile {
    pub fn shelf(&self, unit: UnitId) -> Option<&UnitShelf> {
        self.units.iter().find(|shelf| shelf.unit == unit)
    }

    /// Elements of one kind for a unit, in catalog order. Unknown units yield
    /// an empty slice.
    pub fn elements(&self, unit: UnitId, kind: ElementKind) -> &[ElementDefinition] {
        self.shelf(unit)
            .map(|shelf| shelf.elements(kind))
            .unwrap_or(&[])
    }

    pub fn element(&self, unit: UnitId, kind: ElementKind, id: &str) -> Option<&ElementDefinition> {
        self.elements(unit, kind).iter().find(|entry| entry.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitShelf {
    pub unit: UnitId,
    #[serde(default)]
    pub items: Vec<ElementDefinition>,
    #[serde(default)]
    pub upgrades: Vec<ElementDefinition>,
    #[serde(default)]
    pub sectors: Vec<ElementDefinition>,
    #[serde(default)]
    pub other_shop_elements: Vec<ElementDefinition>,
}

impl UnitShelf {
    pub fn elements(&self, kind: ElementKind) -> &[ElementDefinition] {
        match kind {
            ElementKind::Item => &self.items,
            ElementKind::Upgrade => &self.upgrades,
            ElementKind::Sector => &self.sectors,
            ElementKind::OtherShopElement => &self.other_shop_elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: Cost,
    #[serde(default)]
    pub unit_by_time: f64,
    #[serde(default)]
    pub value_by_action: f64,
    pub sector: Option<SectorId>,
    #[serde(default)]
    pub display: DisplayCondition,
}
