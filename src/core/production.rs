use crate::model::UnitId;

use super::unit_registry::UnitRegistry;

/// Upper bound on batches a single unit may complete in one advance, so a
/// long offline gap on a very short cycle cannot stall a frame.
pub const MAX_BATCHES_PER_ADVANCE: u32 = 10_000;

/// What one [`ProductionLoop::advance`] call completed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionReport {
    /// `(unit, batches)` for every batch-cycle unit that finished at least
    /// one cycle.
    pub completed_batches: Vec<(UnitId, u32)>,
    /// Cycles that reached their end but could no longer pay for the batch.
    pub starved_batches: Vec<UnitId>,
}

impl ProductionReport {
    pub fn is_empty(&self) -> bool {
        self.completed_batches.is_empty() && self.starved_batches.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionLoop {
    pub paused: bool,
    pub tick_index: u64,
}

impl ProductionLoop {
    /// Advances every unit by `dt_ms` milliseconds.
    pub fn advance(&mut self, units: &mut UnitRegistry, dt_ms: f64) -> ProductionReport {
        units.begin_tick();
        let mut report = ProductionReport::default();
        if self.paused || dt_ms <= 0.0 {
            return report;
        }

        self.tick_index += 1;

        self.produce_at_rate(units, dt_ms);
        self.run_batch_cycles(units, dt_ms, &mut report);
        report
    }

    fn produce_at_rate(&mut self, units: &mut UnitRegistry, dt_ms: f64) {
        let seconds = dt_ms / 1000.0;
        for id in units.unit_ids() {
            let rate = units.rate(id);
            if rate <= 0.0 {
                continue;
            }
            let count = (rate * seconds).min(units.max_affordable(id));
            if count <= 0.0 {
                continue;
            }
            if let Err(rejection) = units.produce(id, count) {
                log::debug!("rate production of {id} skipped: {rejection}");
            }
        }
    }

    fn run_batch_cycles(&mut self, units: &mut UnitRegistry, dt_ms: f64, report: &mut ProductionReport) {
        for id in units.unit_ids() {
            let Some(duration) = units.get_unit(id).and_then(|unit| unit.duration_ms()) else {
                continue;
            };
            let Some(mut cycle) = units.cycle(id) else {
                continue;
            };
            let batch = units.value_by_action(id);

            if !cycle.running {
                if !(cycle.auto_mode && units.can_produce(id, batch)) {
                    continue;
                }
                cycle.running = true;
                cycle.elapsed_ms = 0.0;
            }

            cycle.elapsed_ms += dt_ms;
            let mut completed = 0;
            while cycle.elapsed_ms >= duration {
                cycle.elapsed_ms -= duration;
                match units.produce(id, batch) {
                    Ok(()) => completed += 1,
                    Err(_) => report.starved_batches.push(id),
                }

                if !(cycle.auto_mode && units.can_produce(id, batch)) {
                    cycle.running = false;
                    cycle.elapsed_ms = 0.0;
                    break;
                }
                if completed >= MAX_BATCHES_PER_ADVANCE {
                    cycle.elapsed_ms %= duration;
                    break;
                }
            }

            if completed > 0 {
                report.completed_batches.push((id, completed));
            }
            if let Some(slot) = units.cycle_mut(id) {
                *slot = cycle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProductionLoop;
    use crate::core::UnitRegistry;
    use crate::data::bundled_catalog;
    use crate::model::{PriceId, UnitId};

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn registry() -> UnitRegistry {
        let catalog = bundled_catalog().expect("bundled catalog should parse");
        UnitRegistry::from_definitions(&catalog.units)
    }

    fn set_auto(units: &mut UnitRegistry, id: UnitId) {
        let cycle = units.cycle_mut(id).expect("batch unit");
        cycle.auto_mode = true;
    }

    #[test]
    fn rate_accumulates_with_elapsed_time() {
        let mut units = registry();
        let mut production = ProductionLoop::default();
        units.modify_unit_rate(UnitId::Actif, 2.0);

        production.advance(&mut units, 1500.0);

        assert_close(units.amount(UnitId::Actif), 3.0);
        assert_close(units.tick_delta(UnitId::Actif), 3.0);
        assert_eq!(production.tick_index, 1);
    }

    #[test]
    fn rate_production_is_capped_by_cost_unit() {
        let mut units = registry();
        let mut production = ProductionLoop::default();
        units.modify_unit_rate(UnitId::Sale, 1.0);
        units.set_unit_value(UnitId::Complex, 0.5);

        production.advance(&mut units, 2000.0);

        assert_close(units.amount(UnitId::Complex), 0.0);
        assert_close(units.amount(UnitId::Sale), 0.5);
        let margin = units.price(PriceId::Selling) - units.price(PriceId::Production);
        assert_close(units.amount(UnitId::Benefits), 0.5 * margin);
    }

    #[test]
    fn auto_cycle_completes_once_and_resets_timer() {
        let mut units = registry();
        let mut production = ProductionLoop::default();
        set_auto(&mut units, UnitId::Complex);
        units.set_unit_value(UnitId::Actif, 5.0);

        let report = production.advance(&mut units, 5000.0);

        assert_eq!(report.completed_batches, vec![(UnitId::Complex, 1)]);
        assert_close(units.amount(UnitId::Complex), 1.0);
        assert_close(units.amount(UnitId::Actif), 0.0);
        let cycle = units.cycle(UnitId::Complex).expect("batch unit");
        assert_close(cycle.elapsed_ms, 0.0);
        assert!(!cycle.running);
    }

    #[test]
    fn overflow_carries_into_next_cycle() {
        let mut units = registry();
        let mut production = ProductionLoop::default();
        set_auto(&mut units, UnitId::Complex);
        units.set_unit_value(UnitId::Actif, 50.0);

        production.advance(&mut units, 3000.0);
        let report = production.advance(&mut units, 3000.0);

        assert_eq!(report.completed_batches, vec![(UnitId::Complex, 1)]);
        let cycle = units.cycle(UnitId::Complex).expect("batch unit");
        assert!(cycle.running);
        assert_close(cycle.elapsed_ms, 1000.0);
    }

    #[test]
    fn manual_cycle_stops_after_one_batch() {
        let mut units = registry();
        let mut production = ProductionLoop::default();
        units.set_unit_value(UnitId::Actif, 50.0);
        if let Some(cycle) = units.cycle_mut(UnitId::Complex) {
            cycle.running = true;
        }

        let report = production.advance(&mut units, 12_000.0);

        assert_eq!(report.completed_batches, vec![(UnitId::Complex, 1)]);
        let cycle = units.cycle(UnitId::Complex).expect("batch unit");
        assert!(!cycle.running);
        assert_close(cycle.elapsed_ms, 0.0);
    }

    #[test]
    fn idle_auto_cycle_waits_for_funds() {
        let mut units = registry();
        let mut production = ProductionLoop::default();
        set_auto(&mut units, UnitId::Complex);

        let report = production.advance(&mut units, 5000.0);

        assert!(report.is_empty());
        assert!(!units.cycle(UnitId::Complex).is_some_and(|cycle| cycle.running));
    }

    #[test]
    fn paused_loop_changes_nothing() {
        let mut units = registry();
        let mut production = ProductionLoop {
            paused: true,
            ..ProductionLoop::default()
        };
        units.modify_unit_rate(UnitId::Actif, 2.0);
        let before = units.amount(UnitId::Actif);

        production.advance(&mut units, 1000.0);

        assert_close(units.amount(UnitId::Actif), before);
        assert_eq!(production.tick_index, 0);
    }

    #[test]
    fn repeated_advances_are_deterministic() {
        let mut a = registry();
        a.set_unit_value(UnitId::Actif, 40.0);
        a.modify_unit_rate(UnitId::Actif, 0.5);
        a.modify_unit_rate(UnitId::Sale, 0.2);
        set_auto(&mut a, UnitId::Complex);
        let mut b = a.clone();
        let mut loop_a = ProductionLoop::default();
        let mut loop_b = ProductionLoop::default();

        for _ in 0..64 {
            loop_a.advance(&mut a, 250.0);
            loop_b.advance(&mut b, 250.0);
            assert_eq!(a, b);
        }
    }
}
