use std::fmt;

use crate::model::UnitId;

/// Why a game action was refused. A refused action leaves every unit, price
/// and flag exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    UnknownEntity,
    InsufficientFunds { unit: UnitId, needed: f64 },
    InvalidSequencing,
    AlreadyPurchased,
    Locked,
    Busy,
    NothingToDiscover,
    NotReady,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntity => f.write_str("unknown unit or element"),
            Self::InsufficientFunds { unit, needed } => {
                write!(f, "not enough {unit}: {needed} needed")
            }
            Self::InvalidSequencing => f.write_str("previous element must be acquired first"),
            Self::AlreadyPurchased => f.write_str("element already purchased"),
            Self::Locked => f.write_str("feature not unlocked yet"),
            Self::Busy => f.write_str("an operation is already in progress"),
            Self::NothingToDiscover => f.write_str("nothing left to discover"),
            Self::NotReady => f.write_str("operation not ready"),
        }
    }
}

impl std::error::Error for Rejection {}
