use std::collections::BTreeMap;

use crate::data::{Revenue, UnitDataFile, UnitDefinition};
use crate::model::{Cost, DisplayCondition, Effect, EffectTarget, PriceId, UnitId};

use super::reactive::{ReactiveValue, SubscriptionId};
use super::rejection::Rejection;

/// Slack used when comparing an amount against a cost.
pub const AFFORD_EPSILON: f64 = 1e-9;

/// Shortest batch cycle any unit can be tuned down to, in milliseconds.
pub const MIN_CYCLE_MS: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchCycle {
    pub elapsed_ms: f64,
    pub running: bool,
    pub auto_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub amount: ReactiveValue,
    /// Units per second.
    pub rate: ReactiveValue,
    pub duration: Option<ReactiveValue>,
    pub min_duration: f64,
    pub value_by_action: ReactiveValue,
    pub min: f64,
    pub max: Option<f64>,
    pub cost: Option<Cost>,
    pub cost_price: Option<PriceId>,
    pub revenue: Option<Revenue>,
    pub display: DisplayCondition,
    pub cycle: Option<BatchCycle>,
}

impl Unit {
    pub fn from_definition(definition: &UnitDefinition) -> Self {
        let duration = definition
            .duration
            .map(|ms| ReactiveValue::new(ms.max(definition.min_duration).max(MIN_CYCLE_MS)));
        let cycle = duration.as_ref().map(|_| BatchCycle::default());

        Self {
            id: definition.id,
            amount: ReactiveValue::new(definition.amount.max(definition.min)),
            rate: ReactiveValue::new(definition.rate),
            duration,
            min_duration: definition.min_duration,
            value_by_action: ReactiveValue::new(definition.value_by_action),
            min: definition.min,
            max: definition.max,
            cost: definition.cost,
            cost_price: definition.cost_price,
            revenue: definition.revenue,
            display: definition.display.clone(),
            cycle,
        }
    }

    pub fn duration_ms(&self) -> Option<f64> {
        self.duration.as_ref().map(ReactiveValue::get)
    }

    fn clamp(&self, value: f64) -> f64 {
        let floored = value.max(self.min);
        match self.max {
            Some(max) => floored.min(max),
            None => floored,
        }
    }

    fn has_pending(&self) -> bool {
        self.amount.is_pending()
            || self.rate.is_pending()
            || self.value_by_action.is_pending()
            || self.duration.as_ref().is_some_and(ReactiveValue::is_pending)
    }

    fn flush(&mut self) {
        self.amount.flush();
        self.rate.flush();
        self.value_by_action.flush();
        if let Some(duration) = self.duration.as_mut() {
            duration.flush();
        }
    }
}

/// Every unit and price of a running game.
///
/// Mutators only stage their writes; [`UnitRegistry::flush`] publishes them,
/// so the owner decides when an action is complete.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
    prices: BTreeMap<PriceId, ReactiveValue>,
    tick_deltas: BTreeMap<UnitId, f64>,
}

/// Per-tick bookkeeping is not part of the state.
impl PartialEq for UnitRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.units == other.units && self.prices == other.prices
    }
}

impl UnitRegistry {
    pub fn from_definitions(data: &UnitDataFile) -> Self {
        let units = data
            .units
            .iter()
            .map(|definition| (definition.id, Unit::from_definition(definition)))
            .collect();
        let prices = data
            .prices
            .iter()
            .map(|price| (price.id, ReactiveValue::new(price.value.max(0.0))))
            .collect();

        Self {
            units,
            prices,
            tick_deltas: BTreeMap::new(),
        }
    }

    pub fn get_unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn get_unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    /// Current amount, `0.0` for unknown units.
    pub fn amount(&self, id: UnitId) -> f64 {
        self.units.get(&id).map_or(0.0, |unit| unit.amount.get())
    }

    pub fn rate(&self, id: UnitId) -> f64 {
        self.units.get(&id).map_or(0.0, |unit| unit.rate.get())
    }

    pub fn value_by_action(&self, id: UnitId) -> f64 {
        self.units
            .get(&id)
            .map_or(0.0, |unit| unit.value_by_action.get())
    }

    pub fn price(&self, id: PriceId) -> f64 {
        self.prices.get(&id).map_or(0.0, ReactiveValue::get)
    }

    pub fn price_value(&self, id: PriceId) -> Option<&ReactiveValue> {
        self.prices.get(&id)
    }

    /// Adds `delta` to a unit, clamped to `[min, max]`. Returns false for
    /// unknown units.
    pub fn modify_unit_value(&mut self, id: UnitId, delta: f64) -> bool {
        let Some(unit) = self.units.get_mut(&id) else {
            return false;
        };
        let previous = unit.amount.get();
        let next = unit.clamp(previous + delta);
        unit.amount.stage(next);
        let applied = next - previous;
        if applied != 0.0 {
            *self.tick_deltas.entry(id).or_insert(0.0) += applied;
        }
        true
    }

    pub fn set_unit_value(&mut self, id: UnitId, value: f64) -> bool {
        let Some(unit) = self.units.get_mut(&id) else {
            return false;
        };
        let next = unit.clamp(value);
        unit.amount.stage(next);
        true
    }

    pub fn modify_unit_rate(&mut self, id: UnitId, delta: f64) -> bool {
        let Some(unit) = self.units.get_mut(&id) else {
            return false;
        };
        let next = (unit.rate.get() + delta).max(0.0);
        unit.rate.stage(next);
        true
    }

    pub fn modify_price(&mut self, id: PriceId, delta: f64) -> bool {
        let Some(price) = self.prices.get_mut(&id) else {
            return false;
        };
        let next = (price.get() + delta).max(0.0);
        price.stage(next);
        true
    }

    pub fn has_enough_units(&self, amount: f64, id: UnitId) -> bool {
        if amount <= 0.0 {
            return true;
        }
        self.amount(id) + AFFORD_EPSILON >= amount
    }

    /// Cost of producing one unit, with `costPrice` resolved.
    pub fn unit_cost(&self, id: UnitId) -> Option<Cost> {
        let unit = self.units.get(&id)?;
        let cost = unit.cost?;
        Some(match unit.cost_price {
            Some(price) => Cost::new(self.price(price), cost.unit_id),
            None => cost,
        })
    }

    /// Revenue credited per unit produced.
    pub fn unit_revenue(&self, id: UnitId) -> Option<(UnitId, f64)> {
        let revenue = self.units.get(&id)?.revenue?;
        let less = revenue.less.map_or(0.0, |price| self.price(price));
        Some((revenue.unit, (self.price(revenue.gain) - less).max(0.0)))
    }

    /// How many units the cost unit can pay for right now.
    pub fn max_affordable(&self, id: UnitId) -> f64 {
        match self.unit_cost(id) {
            Some(cost) if cost.value > 0.0 => self.amount(cost.unit_id) / cost.value,
            _ => f64::INFINITY,
        }
    }

    pub fn can_produce(&self, id: UnitId, count: f64) -> bool {
        if !self.units.contains_key(&id) {
            return false;
        }
        match self.unit_cost(id) {
            Some(cost) => self.has_enough_units(cost.value * count, cost.unit_id),
            None => true,
        }
    }

    /// Pays for `count` units, credits them, then credits their revenue.
    pub fn produce(&mut self, id: UnitId, count: f64) -> Result<(), Rejection> {
        if !self.units.contains_key(&id) {
            return Err(Rejection::UnknownEntity);
        }
        if count <= 0.0 {
            return Ok(());
        }
        let cost = self.unit_cost(id).map(|cost| cost.scaled(count));
        if let Some(cost) = cost.filter(|cost| !self.has_enough_units(cost.value, cost.unit_id)) {
            return Err(Rejection::InsufficientFunds {
                unit: cost.unit_id,
                needed: cost.value,
            });
        }
        let revenue = self.unit_revenue(id);

        if let Some(cost) = cost {
            self.modify_unit_value(cost.unit_id, -cost.value);
        }
        self.modify_unit_value(id, count);
        if let Some((unit, per_unit)) = revenue {
            self.modify_unit_value(unit, per_unit * count);
        }
        Ok(())
    }

    /// Moves a unit's batch duration by `delta` ms, never below its floor.
    pub fn update_unit_duration(&mut self, id: UnitId, delta: f64) -> bool {
        let Some(unit) = self.units.get_mut(&id) else {
            return false;
        };
        let floor = unit.min_duration.max(MIN_CYCLE_MS);
        let Some(duration) = unit.duration.as_mut() else {
            return false;
        };
        let next = (duration.get() + delta).max(floor);
        duration.stage(next);
        true
    }

    /// Raises the per-action amount of a unit after paying `cost`.
    pub fn update_value_by_action(
        &mut self,
        id: UnitId,
        delta: f64,
        cost: Cost,
    ) -> Result<(), Rejection> {
        if !self.units.contains_key(&id) || !self.units.contains_key(&cost.unit_id) {
            return Err(Rejection::UnknownEntity);
        }
        if !self.has_enough_units(cost.value, cost.unit_id) {
            return Err(Rejection::InsufficientFunds {
                unit: cost.unit_id,
                needed: cost.value,
            });
        }
        self.modify_unit_value(cost.unit_id, -cost.value.max(0.0));
        self.add_value_by_action(id, delta);
        Ok(())
    }

    pub fn add_value_by_action(&mut self, id: UnitId, delta: f64) -> bool {
        let Some(unit) = self.units.get_mut(&id) else {
            return false;
        };
        let next = (unit.value_by_action.get() + delta).max(0.0);
        unit.value_by_action.stage(next);
        true
    }

    /// Applies effects in list order; effects on unknown targets are skipped.
    pub fn apply_choice_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect.target {
                EffectTarget::Unit(unit) => {
                    self.modify_unit_value(unit, effect.value);
                }
                EffectTarget::Price(price) => {
                    self.modify_price(price, effect.value);
                }
            }
        }
    }

    pub fn cycle(&self, id: UnitId) -> Option<BatchCycle> {
        self.units.get(&id)?.cycle
    }

    pub fn cycle_mut(&mut self, id: UnitId) -> Option<&mut BatchCycle> {
        self.units.get_mut(&id)?.cycle.as_mut()
    }

    pub fn begin_tick(&mut self) {
        self.tick_deltas.clear();
    }

    /// Net change of a unit since the last [`UnitRegistry::begin_tick`].
    pub fn tick_delta(&self, id: UnitId) -> f64 {
        self.tick_deltas.get(&id).copied().unwrap_or(0.0)
    }

    pub fn has_pending(&self) -> bool {
        self.units.values().any(Unit::has_pending)
            || self.prices.values().any(ReactiveValue::is_pending)
    }

    /// Publishes every staged write, units first in id order, then prices.
    pub fn flush(&mut self) {
        for unit in self.units.values_mut() {
            unit.flush();
        }
        for price in self.prices.values_mut() {
            price.flush();
        }
    }

    pub fn on_amount_change(
        &mut self,
        id: UnitId,
        listener: impl FnMut(f64) + Send + Sync + 'static,
    ) -> Option<SubscriptionId> {
        Some(self.units.get_mut(&id)?.amount.on_change(listener))
    }

    pub fn on_price_change(
        &mut self,
        id: PriceId,
        listener: impl FnMut(f64) + Send + Sync + 'static,
    ) -> Option<SubscriptionId> {
        Some(self.prices.get_mut(&id)?.on_change(listener))
    }

    pub fn unsubscribe_amount(&mut self, id: UnitId, subscription: SubscriptionId) -> bool {
        self.units
            .get_mut(&id)
            .is_some_and(|unit| unit.amount.unsubscribe(subscription))
    }

    /// Moves every value onto `other`'s with no transition, keeping the
    /// listeners registered here.
    pub(crate) fn jump_to(&mut self, other: &UnitRegistry) {
        for (id, source) in &other.units {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };
            unit.amount.jump(source.amount.get());
            unit.rate.jump(source.rate.get());
            unit.value_by_action.jump(source.value_by_action.get());
            if let (Some(current), Some(saved)) = (unit.duration.as_mut(), source.duration.as_ref()) {
                current.jump(saved.get());
            }
            unit.cycle = source.cycle;
        }
        for (id, source) in &other.prices {
            if let Some(price) = self.prices.get_mut(id) {
                price.jump(source.get());
            }
        }
        self.tick_deltas.clear();
    }

    pub(crate) fn jump_amount(&mut self, id: UnitId, value: f64) {
        if let Some(unit) = self.units.get_mut(&id) {
            let next = unit.clamp(value);
            unit.amount.jump(next);
        }
    }

    pub(crate) fn restore_unit(
        &mut self,
        id: UnitId,
        rate: f64,
        duration: Option<f64>,
        value_by_action: f64,
        cycle: Option<BatchCycle>,
    ) {
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        unit.rate.jump(rate.max(0.0));
        unit.value_by_action.jump(value_by_action.max(0.0));
        let floor = unit.min_duration.max(MIN_CYCLE_MS);
        if let (Some(current), Some(saved)) = (unit.duration.as_mut(), duration) {
            current.jump(saved.max(floor));
        }
        if let (Some(current), Some(saved)) = (unit.cycle.as_mut(), cycle) {
            *current = saved;
        }
    }

    pub(crate) fn jump_price(&mut self, id: PriceId, value: f64) {
        if let Some(price) = self.prices.get_mut(&id) {
            price.jump(value.max(0.0));
        }
    }
}
