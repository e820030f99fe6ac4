use crate::core::{Rejection, UnitRegistry};
use crate::data::{ElementDefinition, ShopDataFile};
use crate::feedback::Feedback;
use crate::model::{Cost, ElementKind, UnitId};

use super::inventory::{ElementKey, Inventory};
use super::pricing::PriceCurve;

/// Where a shop element stands for the player right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    Hidden,
    Visible,
    Purchasable,
    Purchased,
}

/// Validates and applies shop purchases against an inventory and a registry.
///
/// Every check runs before the first write, so a rejected purchase leaves
/// both untouched.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseEngine<'a> {
    shop: &'a ShopDataFile,
    item_curve: PriceCurve,
}

impl<'a> PurchaseEngine<'a> {
    pub fn new(shop: &'a ShopDataFile, item_curve: PriceCurve) -> Self {
        Self { shop, item_curve }
    }

    pub fn element(&self, unit: UnitId, kind: ElementKind, id: &str) -> Option<&'a ElementDefinition> {
        self.shop.element(unit, kind, id)
    }

    pub fn should_display_element(
        &self,
        inventory: &Inventory,
        units: &UnitRegistry,
        unit: UnitId,
        kind: ElementKind,
        element: &ElementDefinition,
    ) -> bool {
        if inventory.is_purchased(unit, kind, &element.id) {
            return true;
        }
        let sector_open = match (kind, element.sector) {
            (ElementKind::Sector, _) | (_, None) => true,
            (_, Some(sector)) => inventory.is_sector_unlocked(sector),
        };
        sector_open && inventory.condition_holds(&element.display, units)
    }

    pub fn element_state(
        &self,
        inventory: &Inventory,
        units: &UnitRegistry,
        unit: UnitId,
        kind: ElementKind,
        id: &str,
    ) -> ElementState {
        let Some(element) = self.element(unit, kind, id) else {
            return ElementState::Hidden;
        };
        if inventory.is_purchased(unit, kind, id) {
            return ElementState::Purchased;
        }
        if !self.should_display_element(inventory, units, unit, kind, element) {
            return ElementState::Hidden;
        }
        let affordable = units.has_enough_units(element.cost.value, element.cost.unit_id);
        if affordable && inventory.is_sequence_satisfied(self.shop, unit, kind, id) {
            ElementState::Purchasable
        } else {
            ElementState::Visible
        }
    }

    /// Buys a shop element once. Items are revealed with zero copies,
    /// upgrades raise the unit's per-action amount, sectors open up.
    pub fn buy_element(
        &self,
        inventory: &mut Inventory,
        units: &mut UnitRegistry,
        unit: UnitId,
        kind: ElementKind,
        id: &str,
    ) -> Result<Vec<Feedback>, Rejection> {
        let element = self.element(unit, kind, id).ok_or(Rejection::UnknownEntity)?;
        if inventory.is_purchased(unit, kind, id) {
            return Err(Rejection::AlreadyPurchased);
        }
        if !self.should_display_element(inventory, units, unit, kind, element) {
            return Err(Rejection::Locked);
        }
        if !inventory.is_sequence_satisfied(self.shop, unit, kind, id) {
            return Err(Rejection::InvalidSequencing);
        }
        let sector = match kind {
            ElementKind::Sector => Some(element.sector.ok_or(Rejection::UnknownEntity)?),
            _ => None,
        };
        debit(units, element.cost)?;

        let mut cues = vec![Feedback::BuyShop];
        inventory.mark_purchased(ElementKey::new(unit, kind, id));
        match kind {
            ElementKind::Upgrade => {
                units.add_value_by_action(unit, element.value_by_action);
            }
            ElementKind::Sector => {
                if let Some(sector) = sector.filter(|sector| inventory.unlock_sector(*sector)) {
                    cues.push(Feedback::SectorUnlocked(sector));
                }
            }
            ElementKind::Item | ElementKind::OtherShopElement => {}
        }
        log::info!("purchased {unit}/{kind:?}/{id}");
        Ok(cues)
    }

    pub fn item_price(&self, inventory: &Inventory, unit: UnitId, id: &str) -> Option<Cost> {
        let element = self.element(unit, ElementKind::Item, id)?;
        let count = inventory.item_count(unit, id);
        Some(Cost::new(
            self.item_curve.price(element.cost.value, f64::from(count)),
            element.cost.unit_id,
        ))
    }

    pub fn can_buy_item(&self, inventory: &Inventory, units: &UnitRegistry, unit: UnitId, id: &str) -> bool {
        self.check_item(inventory, units, unit, id).is_ok()
    }

    /// Buys one more copy of a revealed item; each copy adds its
    /// `unitByTime` to the owning unit's rate.
    pub fn buy_item(
        &self,
        inventory: &mut Inventory,
        units: &mut UnitRegistry,
        unit: UnitId,
        id: &str,
    ) -> Result<Vec<Feedback>, Rejection> {
        let (element, price) = self.check_item(inventory, units, unit, id)?;
        debit(units, price)?;
        inventory.add_item_copy(unit, id);
        units.modify_unit_rate(unit, element.unit_by_time);
        Ok(vec![Feedback::BuyBasic])
    }

    fn check_item(
        &self,
        inventory: &Inventory,
        units: &UnitRegistry,
        unit: UnitId,
        id: &str,
    ) -> Result<(&'a ElementDefinition, Cost), Rejection> {
        let element = self
            .element(unit, ElementKind::Item, id)
            .ok_or(Rejection::UnknownEntity)?;
        if !inventory.is_purchased(unit, ElementKind::Item, id) {
            return Err(Rejection::Locked);
        }
        if !inventory.is_item_sequence_satisfied(self.shop, unit, id) {
            return Err(Rejection::InvalidSequencing);
        }
        let price = self
            .item_price(inventory, unit, id)
            .ok_or(Rejection::UnknownEntity)?;
        if !units.has_enough_units(price.value, price.unit_id) {
            return Err(Rejection::InsufficientFunds {
                unit: price.unit_id,
                needed: price.value,
            });
        }
        Ok((element, price))
    }
}

/// Checks then debits a cost; nothing is written when the check fails.
pub(crate) fn debit(units: &mut UnitRegistry, cost: Cost) -> Result<(), Rejection> {
    if units.get_unit(cost.unit_id).is_none() {
        return Err(Rejection::UnknownEntity);
    }
    if !units.has_enough_units(cost.value, cost.unit_id) {
        return Err(Rejection::InsufficientFunds {
            unit: cost.unit_id,
            needed: cost.value,
        });
    }
    if cost.value > 0.0 {
        units.modify_unit_value(cost.unit_id, -cost.value);
    }
    Ok(())
}
