mod rabbit;
mod search;

pub use rabbit::{RABBIT_CURRENCY, RabbitGame};
pub use search::{SEARCH_CURRENCY, SearchChoice, SearchEncounter, SearchState};
