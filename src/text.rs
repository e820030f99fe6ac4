//! Translation-key helpers for whatever renders the game.

/// Pure key lookup supplied by the presentation layer.
pub trait Translate {
    fn translate(&self, key: &str) -> String;
}

/// Echoes keys back; handy when no string table is loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyEcho;

impl Translate for KeyEcho {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// `UNITS.ACTIF` becomes `UNITS.ACTIF.PLURAL` when `count > 1`, otherwise
/// `UNITS.ACTIF.SINGULAR`. Keys without a dot are returned unchanged.
pub fn conjugate(key: &str, count: f64) -> String {
    if !key.contains('.') {
        return key.to_string();
    }
    let form = if count > 1.0 { "PLURAL" } else { "SINGULAR" };
    format!("{key}.{form}")
}

/// `DDJ HHH MMM SSS`, each field zero-padded to two digits.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / 1000;
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{days:02}J {hours:02}H {minutes:02}M {seconds:02}S")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedTime {
    pub value: f64,
    pub unit_key: &'static str,
}

pub fn rounded_time(seconds: f64) -> RoundedTime {
    if seconds < 60.0 {
        RoundedTime {
            value: seconds.round(),
            unit_key: "UNITS.SEC",
        }
    } else if seconds < 3600.0 {
        RoundedTime {
            value: (seconds / 60.0).round(),
            unit_key: "UNITS.MIN",
        }
    } else {
        RoundedTime {
            value: (seconds / 3600.0).round(),
            unit_key: "UNITS.HOUR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReputationTier {
    Excellent,
    VeryGood,
    Good,
    Average,
    Bad,
}

impl ReputationTier {
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Excellent => "REPUTATION.EXCELLENT",
            Self::VeryGood => "REPUTATION.VERY_GOOD",
            Self::Good => "REPUTATION.GOOD",
            Self::Average => "REPUTATION.AVERAGE",
            Self::Bad => "REPUTATION.BAD",
        }
    }
}

/// Reputation shown to the player, capped at 100.
pub fn displayed_reputation(value: f64) -> f64 {
    value.min(100.0)
}

pub fn reputation_tier(value: f64) -> ReputationTier {
    match displayed_reputation(value) {
        v if v >= 80.0 => ReputationTier::Excellent,
        v if v >= 60.0 => ReputationTier::VeryGood,
        v if v >= 40.0 => ReputationTier::Good,
        v if v >= 20.0 => ReputationTier::Average,
        _ => ReputationTier::Bad,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        KeyEcho, ReputationTier, Translate, conjugate, format_elapsed, reputation_tier,
        rounded_time,
    };

    #[test]
    fn conjugate_picks_form_from_count() {
        assert_eq!(conjugate("UNITS.ACTIF", 1.0), "UNITS.ACTIF.SINGULAR");
        assert_eq!(conjugate("UNITS.ACTIF", 0.0), "UNITS.ACTIF.SINGULAR");
        assert_eq!(conjugate("UNITS.ACTIF", 2.0), "UNITS.ACTIF.PLURAL");
        assert_eq!(conjugate("TITLE", 5.0), "TITLE");
    }

    #[test]
    fn elapsed_time_is_zero_padded() {
        assert_eq!(format_elapsed(0), "00J 00H 00M 00S");
        let ms = ((2 * 86_400) + (3 * 3600) + (4 * 60) + 5) * 1000 + 999;
        assert_eq!(format_elapsed(ms), "02J 03H 04M 05S");
    }

    #[test]
    fn rounded_time_switches_units() {
        assert_eq!(rounded_time(30.0).unit_key, "UNITS.SEC");
        let minutes = rounded_time(90.0);
        assert_eq!((minutes.value, minutes.unit_key), (2.0, "UNITS.MIN"));
        assert_eq!(rounded_time(7200.0).value, 2.0);
    }

    #[test]
    fn reputation_tiers_use_clamped_value() {
        assert_eq!(reputation_tier(250.0), ReputationTier::Excellent);
        assert_eq!(reputation_tier(60.0), ReputationTier::VeryGood);
        assert_eq!(reputation_tier(45.0), ReputationTier::Good);
        assert_eq!(reputation_tier(20.0), ReputationTier::Average);
        assert_eq!(reputation_tier(-3.0), ReputationTier::Bad);
    }

    #[test]
    fn closures_translate() {
        let table = |key: &str| if key == "UNITS.SEC" { "s".to_string() } else { key.to_string() };
        assert_eq!(table.translate("UNITS.SEC"), "s");
        assert_eq!(KeyEcho.translate("UNITS.MIN"), "UNITS.MIN");
    }
}
