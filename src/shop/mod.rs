mod inventory;
mod pricing;
mod purchase;

pub use inventory::{ElementKey, Inventory};
pub use pricing::{DEFAULT_ITEM_PRICE_GROWTH, PriceCurve, get_item_price};
pub use purchase::{ElementState, PurchaseEngine};

pub(crate) use purchase::debit;
