use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use super::{Catalog, GameConfig, RabbitDataFile, SearchDataFile, ShopDataFile, UnitDataFile};

const ASSETS_RELATIVE_PATH: &str = "assets";

const CONFIG_FILE: &str = "config.json";
const UNITS_FILE: &str = "units.json";
const SHOP_FILE: &str = "shop.json";
const RABBITS_FILE: &str = "rabbits.json";
const SEARCH_FILES: [&str; 2] = ["search_laboratory.json", "search_publicity.json"];

const BUNDLED_CONFIG: &str = include_str!("../../assets/config.json");
const BUNDLED_UNITS: &str = include_str!("../../assets/units.json");
const BUNDLED_SHOP: &str = include_str!("../../assets/shop.json");
const BUNDLED_RABBITS: &str = include_str!("../../assets/rabbits.json");
const BUNDLED_SEARCHES: [&str; 2] = [
    include_str!("../../assets/search_laboratory.json"),
    include_str!("../../assets/search_publicity.json"),
];

pub fn assets_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(ASSETS_RELATIVE_PATH)
}

/// Catalog compiled into the binary.
pub fn bundled_catalog() -> Result<Catalog> {
    let mut searches = Vec::with_capacity(BUNDLED_SEARCHES.len());
    for (raw, name) in BUNDLED_SEARCHES.iter().zip(SEARCH_FILES) {
        searches.push(parse_json::<SearchDataFile>(raw, name)?);
    }

    Ok(Catalog {
        config: parse_json::<GameConfig>(BUNDLED_CONFIG, CONFIG_FILE)?,
        units: parse_json::<UnitDataFile>(BUNDLED_UNITS, UNITS_FILE)?,
        shop: parse_json::<ShopDataFile>(BUNDLED_SHOP, SHOP_FILE)?,
        rabbits: parse_json::<RabbitDataFile>(BUNDLED_RABBITS, RABBITS_FILE)?,
        searches,
    })
}

/// Reads every catalog file from `dir`. A missing `config.json` falls back to
/// the default balance constants.
pub fn load_catalog_from_dir(dir: impl AsRef<Path>) -> Result<Catalog> {
    let dir = dir.as_ref();
    let config_path = dir.join(CONFIG_FILE);
    let config = if config_path.exists() {
        load_game_config_from_path(&config_path)?
    } else {
        GameConfig::default()
    };

    let mut searches = Vec::with_capacity(SEARCH_FILES.len());
    for name in SEARCH_FILES {
        searches.push(load_search_data_from_path(dir.join(name))?);
    }

    Ok(Catalog {
        config,
        units: load_unit_data_from_path(dir.join(UNITS_FILE))?,
        shop: load_shop_data_from_path(dir.join(SHOP_FILE))?,
        rabbits: load_rabbit_data_from_path(dir.join(RABBITS_FILE))?,
        searches,
    })
}

pub fn load_game_config_from_path(path: impl AsRef<Path>) -> Result<GameConfig> {
    read_json(path.as_ref(), "game config")
}

pub fn load_unit_data_from_path(path: impl AsRef<Path>) -> Result<UnitDataFile> {
    read_json(path.as_ref(), "unit data")
}

pub fn load_shop_data_from_path(path: impl AsRef<Path>) -> Result<ShopDataFile> {
    read_json(path.as_ref(), "shop data")
}

pub fn load_rabbit_data_from_path(path: impl AsRef<Path>) -> Result<RabbitDataFile> {
    read_json(path.as_ref(), "rabbit data")
}

pub fn load_search_data_from_path(path: impl AsRef<Path>) -> Result<SearchDataFile> {
    read_json(path.as_ref(), "search data")
}

fn read_json<T>(path: &Path, label: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {label} file: {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing {label} file as JSON: {}", path.display()))
}

fn parse_json<T>(raw: &str, name: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(raw).with_context(|| format!("failed parsing bundled {name}"))
}
