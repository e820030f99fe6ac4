mod game;
mod production;
mod reactive;
mod rejection;
mod unit_registry;

pub use game::{
    AUTO_MODE_UPGRADE, COMPLEX_IMPROVEMENT_CURRENCY, COMPLEX_UNIT, ElementView, EndSummary, Game,
    RABBIT_GAME_ELEMENT,
};
pub use production::{MAX_BATCHES_PER_ADVANCE, ProductionLoop, ProductionReport};
pub use reactive::{ReactiveValue, SubscriptionId};
pub use rejection::Rejection;
pub use unit_registry::{AFFORD_EPSILON, BatchCycle, MIN_CYCLE_MS, Unit, UnitRegistry};
