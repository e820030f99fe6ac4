use crate::core::{Rejection, UnitRegistry};
use crate::data::RabbitDataFile;
use crate::feedback::Feedback;
use crate::model::{Cost, UnitId};
use crate::shop::debit;

/// Currency both the experiments and replacement rabbits are paid in.
pub const RABBIT_CURRENCY: UnitId = UnitId::Benefits;

/// Rabbit combat state: one rabbit at a time, worn down by experiments.
#[derive(Debug, Clone, PartialEq)]
pub struct RabbitGame {
    pub life: f64,
    pub kills: u32,
    /// Price of the next replacement rabbit.
    pub price: f64,
}

impl RabbitGame {
    pub fn new(data: &RabbitDataFile) -> Self {
        Self {
            life: data.life,
            kills: 0,
            price: data.price,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Runs one experiment on the living rabbit: pays the test price,
    /// applies the experiment's effects and takes away its power in life.
    pub fn run_experiment(
        &mut self,
        data: &RabbitDataFile,
        units: &mut UnitRegistry,
        experiment_id: &str,
    ) -> Result<Vec<Feedback>, Rejection> {
        let experiment = data
            .items
            .iter()
            .find(|entry| entry.id == experiment_id)
            .ok_or(Rejection::UnknownEntity)?;
        if self.is_dead() {
            return Err(Rejection::NotReady);
        }
        debit(units, Cost::new(data.test_price, RABBIT_CURRENCY))?;

        units.apply_choice_effects(&experiment.values);
        self.life = (self.life - experiment.power.max(0.0)).max(0.0);

        let mut cues = vec![Feedback::ClickBasic];
        if self.is_dead() {
            log::info!("rabbit killed by {experiment_id}");
            cues.push(Feedback::RabbitKilled);
        }
        Ok(cues)
    }

    /// Settles the kill of a dead rabbit and replaces it: the kill is
    /// counted, life is restored and the next one costs `factor` times more.
    /// All three change together or not at all.
    pub fn buy_rabbit(
        &mut self,
        data: &RabbitDataFile,
        units: &mut UnitRegistry,
    ) -> Result<Vec<Feedback>, Rejection> {
        if !self.is_dead() {
            return Err(Rejection::Busy);
        }
        debit(units, Cost::new(self.price, RABBIT_CURRENCY))?;
        self.kills += 1;
        self.price *= data.factor;
        self.life = data.life;
        log::info!("rabbit replaced, {} killed so far", self.kills);
        Ok(vec![Feedback::BuyBasic])
    }
}

#[cfg(test)]
mod tests {
    use super::RabbitGame;
    use crate::core::{Rejection, UnitRegistry};
    use crate::data::{Catalog, bundled_catalog};
    use crate::feedback::Feedback;
    use crate::model::{PriceId, UnitId};

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn fixture(benefits: f64) -> (Catalog, UnitRegistry, RabbitGame) {
        let catalog = bundled_catalog().expect("bundled catalog should parse");
        let mut units = UnitRegistry::from_definitions(&catalog.units);
        units.set_unit_value(UnitId::Benefits, benefits);
        let rabbit = RabbitGame::new(&catalog.rabbits);
        (catalog, units, rabbit)
    }

    #[test]
    fn experiment_costs_test_price_and_applies_effects() {
        let (catalog, mut units, mut rabbit) = fixture(500.0);
        let selling = units.price(PriceId::Selling);

        rabbit
            .run_experiment(&catalog.rabbits, &mut units, "eyes")
            .expect("affordable");

        assert_close(units.amount(UnitId::Benefits), 400.0);
        assert_close(units.price(PriceId::Selling), selling + 1.0);
        assert_close(rabbit.life, 4.0);
    }

    #[test]
    fn life_reaching_zero_counts_one_kill() {
        let (catalog, mut units, mut rabbit) = fixture(10_000.0);

        rabbit
            .run_experiment(&catalog.rabbits, &mut units, "ingestion")
            .expect("first");
        let cues = rabbit
            .run_experiment(&catalog.rabbits, &mut units, "ingestion")
            .expect("second");

        assert!(rabbit.is_dead());
        assert!(cues.contains(&Feedback::RabbitKilled));
        assert_eq!(
            rabbit.run_experiment(&catalog.rabbits, &mut units, "skin"),
            Err(Rejection::NotReady)
        );
        assert_eq!(
            (rabbit.kills, rabbit.price, rabbit.life),
            (0, catalog.rabbits.price, 0.0)
        );

        rabbit
            .buy_rabbit(&catalog.rabbits, &mut units)
            .expect("affordable");

        assert_eq!(rabbit.kills, 1);
        assert_close(rabbit.price, catalog.rabbits.price * catalog.rabbits.factor);
        assert_close(rabbit.life, catalog.rabbits.life);
    }

    #[test]
    fn unaffordable_replacement_leaves_the_kill_unsettled() {
        let (catalog, mut units, mut rabbit) = fixture(10.0);
        rabbit.life = 0.0;

        let result = rabbit.buy_rabbit(&catalog.rabbits, &mut units);

        assert!(matches!(result, Err(Rejection::InsufficientFunds { .. })));
        assert_eq!(rabbit.kills, 0);
        assert_close(rabbit.price, catalog.rabbits.price);
        assert!(rabbit.is_dead());
    }

    #[test]
    fn replacement_scales_price_and_restores_life() {
        let (catalog, mut units, mut rabbit) = fixture(10_000.0);
        assert_eq!(
            rabbit.buy_rabbit(&catalog.rabbits, &mut units),
            Err(Rejection::Busy)
        );
        rabbit.life = 0.0;
        let before = units.amount(UnitId::Benefits);

        rabbit
            .buy_rabbit(&catalog.rabbits, &mut units)
            .expect("affordable");

        assert_close(units.amount(UnitId::Benefits), before - catalog.rabbits.price);
        assert_close(rabbit.price, catalog.rabbits.price * catalog.rabbits.factor);
        assert_close(rabbit.life, catalog.rabbits.life);
        assert_eq!(rabbit.kills, 1);
    }

    #[test]
    fn cruel_experiments_drive_karma_negative() {
        let (catalog, mut units, mut rabbit) = fixture(10_000.0);

        rabbit
            .run_experiment(&catalog.rabbits, &mut units, "ingestion")
            .expect("first");
        rabbit
            .run_experiment(&catalog.rabbits, &mut units, "ingestion")
            .expect("second");

        assert_close(units.amount(UnitId::Karma), -40.0);
    }

    #[test]
    fn broke_player_cannot_experiment() {
        let (catalog, mut units, mut rabbit) = fixture(50.0);

        let result = rabbit.run_experiment(&catalog.rabbits, &mut units, "skin");

        assert!(matches!(result, Err(Rejection::InsufficientFunds { .. })));
        assert_close(rabbit.life, catalog.rabbits.life);
        assert_close(units.amount(UnitId::Benefits), 50.0);
    }
}
