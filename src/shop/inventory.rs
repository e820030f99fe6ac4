use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::UnitRegistry;
use crate::data::ShopDataFile;
use crate::model::{DisplayCondition, ElementKind, SectorId, UnitId};

/// Addresses one shop element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementKey {
    pub unit: UnitId,
    pub kind: ElementKind,
    pub id: String,
}

impl ElementKey {
    pub fn new(unit: UnitId, kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            unit,
            kind,
            id: id.into(),
        }
    }
}

/// Purchase state: what was bought, how many copies of each item, and which
/// sectors are open. Purchases only ever grow; [`Inventory::new`] is the sole
/// way back.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    purchased: BTreeSet<ElementKey>,
    item_counts: BTreeMap<(UnitId, String), u32>,
    unlocked_sectors: Vec<SectorId>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(SectorId::default())
    }
}

impl Inventory {
    pub fn new(default_sector: SectorId) -> Self {
        Self {
            purchased: BTreeSet::new(),
            item_counts: BTreeMap::new(),
            unlocked_sectors: vec![default_sector],
        }
    }

    pub fn is_purchased(&self, unit: UnitId, kind: ElementKind, id: &str) -> bool {
        self.purchased.contains(&ElementKey::new(unit, kind, id))
    }

    pub fn purchased(&self) -> impl Iterator<Item = &ElementKey> {
        self.purchased.iter()
    }

    pub fn purchased_for(&self, unit: UnitId, kind: ElementKind) -> Vec<&str> {
        self.purchased
            .iter()
            .filter(|key| key.unit == unit && key.kind == kind)
            .map(|key| key.id.as_str())
            .collect()
    }

    /// Returns false when the element was already purchased.
    pub fn mark_purchased(&mut self, key: ElementKey) -> bool {
        if key.kind == ElementKind::Item {
            self.item_counts.entry((key.unit, key.id.clone())).or_insert(0);
        }
        self.purchased.insert(key)
    }

    pub fn item_count(&self, unit: UnitId, id: &str) -> u32 {
        self.item_counts
            .get(&(unit, id.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn item_counts(&self) -> impl Iterator<Item = (UnitId, &str, u32)> {
        self.item_counts
            .iter()
            .map(|((unit, id), count)| (*unit, id.as_str(), *count))
    }

    pub fn add_item_copy(&mut self, unit: UnitId, id: &str) -> u32 {
        let count = self.item_counts.entry((unit, id.to_string())).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub(crate) fn set_item_count(&mut self, unit: UnitId, id: &str, count: u32) {
        self.item_counts.insert((unit, id.to_string()), count);
    }

    pub fn unlocked_sectors(&self) -> &[SectorId] {
        &self.unlocked_sectors
    }

    pub fn is_sector_unlocked(&self, sector: SectorId) -> bool {
        self.unlocked_sectors.contains(&sector)
    }

    /// Returns false when the sector was already open.
    pub fn unlock_sector(&mut self, sector: SectorId) -> bool {
        if self.is_sector_unlocked(sector) {
            return false;
        }
        self.unlocked_sectors.push(sector);
        true
    }

    /// Element N of a (unit, kind) list needs element N-1 purchased. Unknown
    /// elements never satisfy the constraint.
    pub fn is_sequence_satisfied(
        &self,
        shop: &ShopDataFile,
        unit: UnitId,
        kind: ElementKind,
        id: &str,
    ) -> bool {
        let elements = shop.elements(unit, kind);
        match elements.iter().position(|entry| entry.id == id) {
            Some(0) => true,
            Some(index) => self.is_purchased(unit, kind, &elements[index - 1].id),
            None => false,
        }
    }

    /// Item copy N needs at least one copy of item N-1.
    pub fn is_item_sequence_satisfied(&self, shop: &ShopDataFile, unit: UnitId, id: &str) -> bool {
        let items = shop.elements(unit, ElementKind::Item);
        match items.iter().position(|entry| entry.id == id) {
            Some(0) => true,
            Some(index) => self.item_count(unit, &items[index - 1].id) > 0,
            None => false,
        }
    }

    pub fn condition_holds(&self, condition: &DisplayCondition, units: &UnitRegistry) -> bool {
        match condition {
            DisplayCondition::Always => true,
            DisplayCondition::Never => false,
            DisplayCondition::UnitAtLeast { unit, value } => units.amount(*unit) >= *value,
            DisplayCondition::ElementPurchased { unit, kind, id } => {
                self.is_purchased(*unit, *kind, id)
            }
            DisplayCondition::SectorUnlocked { sector } => self.is_sector_unlocked(*sector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ElementKey, Inventory};
    use crate::data::bundled_catalog;
    use crate::model::{ElementKind, SectorId, UnitId};

    #[test]
    fn default_sector_starts_unlocked() {
        let mut inventory = Inventory::default();

        assert_eq!(inventory.unlocked_sectors(), &[SectorId::Production]);
        assert!(inventory.unlock_sector(SectorId::Laboratory));
        assert!(!inventory.unlock_sector(SectorId::Laboratory));
        assert_eq!(
            inventory.unlocked_sectors(),
            &[SectorId::Production, SectorId::Laboratory]
        );
    }

    #[test]
    fn marking_an_item_purchased_reveals_zero_copies() {
        let mut inventory = Inventory::default();
        let key = ElementKey::new(UnitId::Actif, ElementKind::Item, "pipette");

        assert!(inventory.mark_purchased(key.clone()));
        assert!(!inventory.mark_purchased(key));
        assert_eq!(inventory.item_count(UnitId::Actif, "pipette"), 0);
        assert_eq!(inventory.add_item_copy(UnitId::Actif, "pipette"), 1);
    }

    #[test]
    fn sequence_follows_catalog_order() {
        let catalog = bundled_catalog().expect("bundled catalog should parse");
        let shop = &catalog.shop;
        let mut inventory = Inventory::default();

        assert!(inventory.is_sequence_satisfied(shop, UnitId::Actif, ElementKind::Upgrade, "gloves"));
        assert!(!inventory.is_sequence_satisfied(
            shop,
            UnitId::Actif,
            ElementKind::Upgrade,
            "microscope"
        ));
        assert!(!inventory.is_sequence_satisfied(shop, UnitId::Actif, ElementKind::Upgrade, "nope"));

        inventory.mark_purchased(ElementKey::new(UnitId::Actif, ElementKind::Upgrade, "gloves"));
        assert!(inventory.is_sequence_satisfied(
            shop,
            UnitId::Actif,
            ElementKind::Upgrade,
            "microscope"
        ));
    }

    #[test]
    fn item_copies_need_a_previous_copy() {
        let catalog = bundled_catalog().expect("bundled catalog should parse");
        let shop = &catalog.shop;
        let mut inventory = Inventory::default();
        inventory.mark_purchased(ElementKey::new(UnitId::Actif, ElementKind::Item, "pipette"));

        assert!(!inventory.is_item_sequence_satisfied(shop, UnitId::Actif, "distiller"));
        inventory.add_item_copy(UnitId::Actif, "pipette");
        assert!(inventory.is_item_sequence_satisfied(shop, UnitId::Actif, "distiller"));
    }
}
