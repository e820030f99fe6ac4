use std::collections::BTreeSet;

use anyhow::Result;

use crate::data::{Catalog, ElementDefinition, GameConfig, SearchItem, bundled_catalog};
use crate::feedback::Feedback;
use crate::minigame::{RabbitGame, SearchChoice, SearchEncounter};
use crate::model::{Cost, Effect, ElementKind, PriceId, SectorId, UnitId};
use crate::shop::{ElementState, Inventory, PriceCurve, PurchaseEngine, debit};

use super::production::ProductionLoop;
use super::reactive::SubscriptionId;
use super::rejection::Rejection;
use super::unit_registry::{Unit, UnitRegistry};

/// Upgrade that allows a batch unit to run in auto mode.
pub const AUTO_MODE_UPGRADE: &str = "autoprod";
/// Shop element that opens rabbit combat.
pub const RABBIT_GAME_ELEMENT: (UnitId, ElementKind, &str) =
    (UnitId::Sale, ElementKind::OtherShopElement, "rabbitGame");
/// The unit whose cycle the complex improvements tune.
pub const COMPLEX_UNIT: UnitId = UnitId::Complex;
/// Currency of the complex improvements.
pub const COMPLEX_IMPROVEMENT_CURRENCY: UnitId = UnitId::Actif;

/// A shop element as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView<'a> {
    pub definition: &'a ElementDefinition,
    pub state: ElementState,
    /// Cost of the element, or of the next copy once an item is revealed.
    pub price: Cost,
    pub count: u32,
}

/// Figures shown once the benefits goal is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct EndSummary {
    pub benefits_goal: f64,
    pub elapsed_ms: u64,
    pub rabbits_killed: u32,
    pub toxic_discovered: usize,
    pub karma: f64,
    /// Copies bought per item, in catalog order, for every unit.
    pub item_copies: Vec<(UnitId, String, u32)>,
}

/// Everything one player owns, plus the catalog it was built from.
///
/// Every public mutator either applies all of its writes and then publishes
/// them in one flush, or returns a [`Rejection`] with nothing changed.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) catalog: Catalog,
    pub(crate) units: UnitRegistry,
    pub(crate) production: ProductionLoop,
    pub(crate) inventory: Inventory,
    pub(crate) rabbit: RabbitGame,
    pub(crate) searches: Vec<SearchEncounter>,
    pub(crate) current_sector: SectorId,
    pub(crate) dark_mode: bool,
    pub(crate) start_time_ms: u64,
    pub(crate) revealed_units: BTreeSet<UnitId>,
    pub(crate) goal_reached: bool,
    revision: u64,
}

impl Game {
    pub fn new(catalog: Catalog, start_time_ms: u64) -> Self {
        let units = UnitRegistry::from_definitions(&catalog.units);
        let inventory = Inventory::new(catalog.config.default_sector);
        let rabbit = RabbitGame::new(&catalog.rabbits);
        let searches = catalog
            .searches
            .iter()
            .map(|data| SearchEncounter::new(data.sector))
            .collect();
        let current_sector = catalog.config.default_sector;

        let mut game = Self {
            catalog,
            units,
            production: ProductionLoop::default(),
            inventory,
            rabbit,
            searches,
            current_sector,
            dark_mode: false,
            start_time_ms,
            revealed_units: BTreeSet::new(),
            goal_reached: false,
            revision: 0,
        };
        game.latch_revealed_units();
        game
    }

    pub fn bundled(start_time_ms: u64) -> Result<Self> {
        Ok(Self::new(bundled_catalog()?, start_time_ms))
    }

    /// Back to the initial state. Values jump without transition and keep
    /// their subscribers.
    pub fn reset(&mut self, start_time_ms: u64) {
        let fresh = Self::new(self.catalog.clone(), start_time_ms);
        self.units.jump_to(&fresh.units);
        self.production = fresh.production;
        self.inventory = fresh.inventory;
        self.rabbit = fresh.rabbit;
        self.searches = fresh.searches;
        self.current_sector = fresh.current_sector;
        self.dark_mode = fresh.dark_mode;
        self.start_time_ms = fresh.start_time_ms;
        self.revealed_units = fresh.revealed_units;
        self.goal_reached = false;
        self.revision += 1;
        log::info!("game reset");
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.catalog.config
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn rabbit(&self) -> &RabbitGame {
        &self.rabbit
    }

    pub fn search(&self, sector: SectorId) -> Option<&SearchEncounter> {
        self.searches.iter().find(|search| search.sector == sector)
    }

    pub fn searches(&self) -> &[SearchEncounter] {
        &self.searches
    }

    pub fn current_sector(&self) -> SectorId {
        self.current_sector
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn start_time_ms(&self) -> u64 {
        self.start_time_ms
    }

    /// Bumped by every committed change; persistence watches it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_paused(&self) -> bool {
        self.production.paused
    }

    /// A paused game ignores [`Game::advance`]; actions still apply.
    pub fn set_paused(&mut self, paused: bool) {
        self.production.paused = paused;
    }

    pub fn production_ticks(&self) -> u64 {
        self.production.tick_index
    }

    pub fn get_unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get_unit(id)
    }

    pub fn amount(&self, id: UnitId) -> f64 {
        self.units.amount(id)
    }

    pub fn price(&self, id: PriceId) -> f64 {
        self.units.price(id)
    }

    pub fn has_enough_units(&self, amount: f64, id: UnitId) -> bool {
        self.units.has_enough_units(amount, id)
    }

    /// Once a unit has been shown it stays shown, even if its condition
    /// stops holding.
    pub fn can_display_unit(&self, id: UnitId) -> bool {
        if self.revealed_units.contains(&id) {
            return true;
        }
        self.units
            .get_unit(id)
            .is_some_and(|unit| self.inventory.condition_holds(&unit.display, &self.units))
    }

    pub fn can_buy_unit(&self, id: UnitId) -> bool {
        self.units.can_produce(id, self.units.value_by_action(id))
    }

    pub fn unit_cost(&self, id: UnitId) -> Option<Cost> {
        self.units.unit_cost(id)
    }

    fn purchases(&self) -> PurchaseEngine<'_> {
        PurchaseEngine::new(
            &self.catalog.shop,
            PriceCurve::Exponential {
                growth: self.catalog.config.item_price_growth,
            },
        )
    }

    fn improvement_curve(&self) -> PriceCurve {
        PriceCurve::Linear {
            factor: self.catalog.config.scale_factor,
        }
    }

    pub fn element_state(&self, unit: UnitId, kind: ElementKind, id: &str) -> ElementState {
        self.purchases()
            .element_state(&self.inventory, &self.units, unit, kind, id)
    }

    /// Displayable elements of one kind for a unit, in catalog order.
    pub fn get_elements_for_unit(&self, unit: UnitId, kind: ElementKind) -> Vec<ElementView<'_>> {
        let purchases = self.purchases();
        self.catalog
            .shop
            .elements(unit, kind)
            .iter()
            .filter_map(|definition| {
                let state =
                    purchases.element_state(&self.inventory, &self.units, unit, kind, &definition.id);
                if state == ElementState::Hidden {
                    return None;
                }
                let is_revealed_item = kind == ElementKind::Item && state == ElementState::Purchased;
                let price = if is_revealed_item {
                    purchases
                        .item_price(&self.inventory, unit, &definition.id)
                        .unwrap_or(definition.cost)
                } else {
                    definition.cost
                };
                Some(ElementView {
                    definition,
                    state,
                    price,
                    count: self.inventory.item_count(unit, &definition.id),
                })
            })
            .collect()
    }

    pub fn item_price(&self, unit: UnitId, id: &str) -> Option<Cost> {
        self.purchases().item_price(&self.inventory, unit, id)
    }

    pub fn can_buy_item(&self, unit: UnitId, id: &str) -> bool {
        self.purchases()
            .can_buy_item(&self.inventory, &self.units, unit, id)
    }

    /// Price of shortening the complex cycle, `None` once it cannot shrink.
    pub fn complex_time_price(&self) -> Option<Cost> {
        let config = &self.catalog.config;
        let duration = self.units.get_unit(COMPLEX_UNIT)?.duration_ms()?;
        if duration <= config.complex_time_step_ms {
            return None;
        }
        let reduction_percent = (1.0 - duration / config.complex_reference_duration_ms) * 100.0;
        let value = self
            .improvement_curve()
            .price(config.complex_base_price, reduction_percent.max(1.0));
        Some(Cost::new(value, COMPLEX_IMPROVEMENT_CURRENCY))
    }

    pub fn complex_quantity_price(&self) -> Cost {
        let value = self.improvement_curve().price(
            self.catalog.config.complex_base_price,
            self.units.value_by_action(COMPLEX_UNIT),
        );
        Cost::new(value, COMPLEX_IMPROVEMENT_CURRENCY)
    }

    pub fn search_price(&self, sector: SectorId) -> Option<f64> {
        let data = self.catalog.search(sector)?;
        Some(self.search(sector)?.price(data, self.catalog.config.scale_factor))
    }

    pub fn discovered_items(&self, sector: SectorId) -> Vec<&SearchItem> {
        match (self.catalog.search(sector), self.search(sector)) {
            (Some(data), Some(search)) => search.discovered_items(data).collect(),
            _ => Vec::new(),
        }
    }

    pub fn toxic_discovered_count(&self) -> usize {
        self.discovered_items(SectorId::Laboratory)
            .into_iter()
            .filter(|item| item.toxic)
            .count()
    }

    pub fn is_rabbit_game_unlocked(&self) -> bool {
        let (unit, kind, id) = RABBIT_GAME_ELEMENT;
        self.inventory.is_purchased(unit, kind, id)
    }

    pub fn is_auto_mode_unlocked(&self, unit: UnitId) -> bool {
        self.inventory
            .is_purchased(unit, ElementKind::Upgrade, AUTO_MODE_UPGRADE)
    }

    pub fn is_game_ending(&self) -> bool {
        self.goal_reached || self.units.amount(UnitId::Benefits) >= self.catalog.config.benefits_goal
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_time_ms)
    }

    pub fn end_summary(&self, now_ms: u64) -> EndSummary {
        let item_copies = self
            .catalog
            .shop
            .units
            .iter()
            .flat_map(|shelf| {
                shelf.items.iter().map(move |item| {
                    let count = self.inventory.item_count(shelf.unit, &item.id);
                    (shelf.unit, item.id.clone(), count)
                })
            })
            .collect();
        EndSummary {
            benefits_goal: self.catalog.config.benefits_goal,
            elapsed_ms: self.elapsed_ms(now_ms),
            rabbits_killed: self.rabbit.kills,
            toxic_discovered: self.toxic_discovered_count(),
            karma: self.units.amount(UnitId::Karma),
            item_copies,
        }
    }

    pub fn on_unit_change(
        &mut self,
        id: UnitId,
        listener: impl FnMut(f64) + Send + Sync + 'static,
    ) -> Option<SubscriptionId> {
        self.units.on_amount_change(id, listener)
    }

    pub fn on_price_change(
        &mut self,
        id: PriceId,
        listener: impl FnMut(f64) + Send + Sync + 'static,
    ) -> Option<SubscriptionId> {
        self.units.on_price_change(id, listener)
    }

    pub fn unsubscribe_unit(&mut self, id: UnitId, subscription: SubscriptionId) -> bool {
        self.units.unsubscribe_amount(id, subscription)
    }

    /// Manual production: one click yields `valueByAction` units.
    pub fn buy_unit(&mut self, id: UnitId) -> Result<Vec<Feedback>, Rejection> {
        let batch = self.units.value_by_action(id);
        let result = self
            .units
            .produce(id, batch)
            .map(|()| vec![Feedback::ClickBasic]);
        self.finish("buy_unit", result)
    }

    /// Adds to a unit's amount, clamped at its bounds. Unknown ids are a
    /// silent no-op.
    pub fn modify_unit_value(&mut self, id: UnitId, delta: f64) -> bool {
        if !self.units.modify_unit_value(id, delta) {
            return false;
        }
        self.commit(&mut Vec::new());
        true
    }

    pub fn apply_choice_effects(&mut self, effects: &[Effect]) -> Vec<Feedback> {
        self.units.apply_choice_effects(effects);
        let mut cues = Vec::new();
        self.commit(&mut cues);
        cues
    }

    pub fn buy_element(
        &mut self,
        unit: UnitId,
        kind: ElementKind,
        id: &str,
    ) -> Result<Vec<Feedback>, Rejection> {
        let engine = PurchaseEngine::new(
            &self.catalog.shop,
            PriceCurve::Exponential {
                growth: self.catalog.config.item_price_growth,
            },
        );
        let result = engine.buy_element(&mut self.inventory, &mut self.units, unit, kind, id);
        self.finish("buy_element", result)
    }

    /// Reveals an item in its unit section; copies are bought with
    /// [`Game::buy_item`].
    pub fn buy_element_from_shop(&mut self, unit: UnitId, id: &str) -> Result<Vec<Feedback>, Rejection> {
        self.buy_element(unit, ElementKind::Item, id)
    }

    pub fn buy_item(&mut self, unit: UnitId, id: &str) -> Result<Vec<Feedback>, Rejection> {
        let engine = PurchaseEngine::new(
            &self.catalog.shop,
            PriceCurve::Exponential {
                growth: self.catalog.config.item_price_growth,
            },
        );
        let result = engine.buy_item(&mut self.inventory, &mut self.units, unit, id);
        self.finish("buy_item", result)
    }

    pub fn improve_complex_time(&mut self) -> Result<Vec<Feedback>, Rejection> {
        let result = match self.complex_time_price() {
            None if self.units.get_unit(COMPLEX_UNIT).is_none() => Err(Rejection::UnknownEntity),
            None => Err(Rejection::NotReady),
            Some(cost) => debit(&mut self.units, cost).map(|()| {
                let step = self.catalog.config.complex_time_step_ms;
                self.units.update_unit_duration(COMPLEX_UNIT, -step);
                vec![Feedback::BuyBasic]
            }),
        };
        self.finish("improve_complex_time", result)
    }

    pub fn improve_complex_quantity(&mut self) -> Result<Vec<Feedback>, Rejection> {
        let cost = self.complex_quantity_price();
        let result = self
            .units
            .update_value_by_action(COMPLEX_UNIT, 1.0, cost)
            .map(|()| vec![Feedback::BuyBasic]);
        self.finish("improve_complex_quantity", result)
    }

    /// Starts one batch cycle by hand.
    pub fn start_cycle(&mut self, id: UnitId) -> Result<Vec<Feedback>, Rejection> {
        let result = self.try_start_cycle(id);
        self.finish("start_cycle", result)
    }

    fn try_start_cycle(&mut self, id: UnitId) -> Result<Vec<Feedback>, Rejection> {
        let cycle = self.units.cycle(id).ok_or(Rejection::UnknownEntity)?;
        if cycle.running {
            return Err(Rejection::Busy);
        }
        let batch = self.units.value_by_action(id);
        if !self.units.can_produce(id, batch) {
            let needed = self.units.unit_cost(id).map(|cost| cost.scaled(batch));
            return Err(match needed {
                Some(cost) => Rejection::InsufficientFunds {
                    unit: cost.unit_id,
                    needed: cost.value,
                },
                None => Rejection::NotReady,
            });
        }
        if let Some(cycle) = self.units.cycle_mut(id) {
            cycle.running = true;
            cycle.elapsed_ms = 0.0;
        }
        Ok(vec![Feedback::Hold])
    }

    pub fn set_auto_mode(&mut self, id: UnitId, enabled: bool) -> Result<Vec<Feedback>, Rejection> {
        let result = if self.units.cycle(id).is_none() {
            Err(Rejection::UnknownEntity)
        } else if !self.is_auto_mode_unlocked(id) {
            Err(Rejection::Locked)
        } else {
            if let Some(cycle) = self.units.cycle_mut(id) {
                cycle.auto_mode = enabled;
            }
            Ok(vec![Feedback::ClickBasic])
        };
        self.finish("set_auto_mode", result)
    }

    pub fn run_experiment(&mut self, experiment_id: &str) -> Result<Vec<Feedback>, Rejection> {
        let result = if self.is_rabbit_game_unlocked() {
            self.rabbit
                .run_experiment(&self.catalog.rabbits, &mut self.units, experiment_id)
        } else {
            Err(Rejection::Locked)
        };
        self.finish("run_experiment", result)
    }

    pub fn buy_rabbit(&mut self) -> Result<Vec<Feedback>, Rejection> {
        let result = if self.is_rabbit_game_unlocked() {
            self.rabbit.buy_rabbit(&self.catalog.rabbits, &mut self.units)
        } else {
            Err(Rejection::Locked)
        };
        self.finish("buy_rabbit", result)
    }

    pub fn start_search(&mut self, sector: SectorId) -> Result<Vec<Feedback>, Rejection> {
        let result = self.try_start_search(sector);
        self.finish("start_search", result)
    }

    fn try_start_search(&mut self, sector: SectorId) -> Result<Vec<Feedback>, Rejection> {
        let data = self.catalog.search(sector).ok_or(Rejection::UnknownEntity)?;
        if !self.inventory.is_sector_unlocked(sector) {
            return Err(Rejection::Locked);
        }
        let search = self
            .searches
            .iter_mut()
            .find(|search| search.sector == sector)
            .ok_or(Rejection::UnknownEntity)?;
        search.start(data, self.catalog.config.scale_factor, &mut self.units)
    }

    pub fn resolve_search(
        &mut self,
        sector: SectorId,
        choice: SearchChoice,
    ) -> Result<Vec<Feedback>, Rejection> {
        let result = match (
            self.catalog.search(sector),
            self.searches.iter_mut().find(|search| search.sector == sector),
        ) {
            (Some(data), Some(search)) => search.resolve(data, &mut self.units, choice),
            _ => Err(Rejection::UnknownEntity),
        };
        self.finish("resolve_search", result)
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        if self.dark_mode != enabled {
            self.dark_mode = enabled;
            self.commit(&mut Vec::new());
        }
    }

    pub fn set_current_sector(&mut self, sector: SectorId) -> Result<Vec<Feedback>, Rejection> {
        let result = if self.inventory.is_sector_unlocked(sector) {
            self.current_sector = sector;
            Ok(vec![Feedback::Arrow])
        } else {
            Err(Rejection::Locked)
        };
        self.finish("set_current_sector", result)
    }

    /// Moves the whole game forward by `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Feedback> {
        if self.production.paused {
            return Vec::new();
        }
        let report = self.production.advance(&mut self.units, dt_ms);
        let mut cues = Vec::new();
        for (unit, _) in &report.completed_batches {
            if !self.units.cycle(*unit).is_some_and(|cycle| cycle.auto_mode) {
                cues.push(Feedback::HoldEnd);
            }
        }

        let mut searching = false;
        for search in &mut self.searches {
            searching |= !search.is_idle();
            if search.advance(dt_ms) {
                log::info!("search finished in {:?}", search.sector);
                cues.push(Feedback::SearchFinished(search.sector));
            }
        }

        let cycling = self.units.units().any(|unit| unit.cycle.is_some_and(|cycle| cycle.running));
        if self.units.has_pending() || !report.is_empty() || searching || cycling {
            self.commit(&mut cues);
        }
        cues
    }

    fn finish(
        &mut self,
        action: &str,
        result: Result<Vec<Feedback>, Rejection>,
    ) -> Result<Vec<Feedback>, Rejection> {
        match result {
            Ok(mut cues) => {
                self.commit(&mut cues);
                Ok(cues)
            }
            Err(rejection) => {
                log::debug!("{action} rejected: {rejection}");
                Err(rejection)
            }
        }
    }

    /// Publishes staged values and records the change.
    fn commit(&mut self, cues: &mut Vec<Feedback>) {
        self.units.flush();
        self.revision += 1;
        self.latch_revealed_units();
        if !self.goal_reached
            && self.units.amount(UnitId::Benefits) >= self.catalog.config.benefits_goal
        {
            self.goal_reached = true;
            log::info!("benefits goal reached");
            cues.push(Feedback::GameEnded);
        }
    }

    fn latch_revealed_units(&mut self) {
        for unit in self.units.units() {
            if !self.revealed_units.contains(&unit.id)
                && self.inventory.condition_holds(&unit.display, &self.units)
            {
                self.revealed_units.insert(unit.id);
            }
        }
    }

    pub(crate) fn restored_revision(&mut self) {
        self.revision = 0;
    }
}
