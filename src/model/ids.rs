use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitId {
    Benefits,
    Actif,
    Complex,
    Sale,
    Reputation,
    Karma,
}

impl UnitId {
    pub const ALL: [UnitId; 6] = [
        UnitId::Benefits,
        UnitId::Actif,
        UnitId::Complex,
        UnitId::Sale,
        UnitId::Reputation,
        UnitId::Karma,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Benefits => "benefits",
            Self::Actif => "actif",
            Self::Complex => "complex",
            Self::Sale => "sale",
            Self::Reputation => "reputation",
            Self::Karma => "karma",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.key() == key)
    }

    /// Translation key of the unit name, e.g. `UNITS.ACTIF`.
    pub fn label_key(self) -> String {
        format!("UNITS.{}", self.key().to_uppercase())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceId {
    Production,
    Selling,
}

impl PriceId {
    pub const ALL: [PriceId; 2] = [PriceId::Production, PriceId::Selling];

    pub fn key(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Selling => "selling",
        }
    }
}

impl fmt::Display for PriceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SectorId {
    #[default]
    Production,
    Laboratory,
    Publicity,
}

impl SectorId {
    pub const ALL: [SectorId; 3] = [
        SectorId::Production,
        SectorId::Laboratory,
        SectorId::Publicity,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Laboratory => "laboratory",
            Self::Publicity => "publicity",
        }
    }

    pub fn label_key(self) -> String {
        format!("SECTORS.{}", self.key().to_uppercase())
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The four shelves a unit's shop entries are sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Item,
    Upgrade,
    Sector,
    OtherShopElement,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Item,
        ElementKind::Upgrade,
        ElementKind::Sector,
        ElementKind::OtherShopElement,
    ];
}

#[cfg(test)]
mod tests {
    use super::{ElementKind, PriceId, SectorId, UnitId};

    #[test]
    fn unit_keys_round_trip() {
        for unit in UnitId::ALL {
            assert_eq!(UnitId::from_key(unit.key()), Some(unit));
        }
        assert_eq!(UnitId::from_key("euros"), None);
        assert_eq!(UnitId::Actif.label_key(), "UNITS.ACTIF");
    }

    #[test]
    fn identifiers_serialize_as_plain_strings() {
        assert_eq!(serde_json::to_string(&UnitId::Benefits).unwrap(), "\"benefits\"");
        assert_eq!(serde_json::to_string(&PriceId::Selling).unwrap(), "\"selling\"");
        assert_eq!(serde_json::to_string(&SectorId::Laboratory).unwrap(), "\"laboratory\"");
        assert_eq!(
            serde_json::to_string(&ElementKind::OtherShopElement).unwrap(),
            "\"otherShopElement\""
        );
    }
}
