mod game_config;
mod loader;
mod minigame_data;
mod shop_data;
mod unit_data;

pub use game_config::GameConfig;
pub use loader::{
    assets_path, bundled_catalog, load_catalog_from_dir, load_game_config_from_path,
    load_rabbit_data_from_path, load_search_data_from_path, load_shop_data_from_path,
    load_unit_data_from_path,
};
pub use minigame_data::{Experiment, RabbitDataFile, SearchDataFile, SearchItem};
pub use shop_data::{ElementDefinition, ShopDataFile, UnitShelf};
pub use unit_data::{PriceDefinition, Revenue, UnitDataFile, UnitDefinition};

use crate::model::SectorId;

/// Every static definition a game is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub config: GameConfig,
    pub units: UnitDataFile,
    pub shop: ShopDataFile,
    pub rabbits: RabbitDataFile,
    pub searches: Vec<SearchDataFile>,
}

impl Catalog {
    pub fn search(&self, sector: SectorId) -> Option<&SearchDataFile> {
        self.searches.iter().find(|entry| entry.sector == sector)
    }
}

#[cfg(test)]
mod tests {
    use super::{assets_path, bundled_catalog, load_catalog_from_dir};
    use crate::model::{ElementKind, SectorId, UnitId};

    #[test]
    fn bundled_catalog_has_entries() {
        let catalog = bundled_catalog().expect("bundled catalog should parse");

        assert_eq!(catalog.units.units.len(), UnitId::ALL.len());
        assert!(!catalog.shop.elements(UnitId::Actif, ElementKind::Item).is_empty());
        assert!(!catalog.rabbits.items.is_empty());
        assert!(catalog.search(SectorId::Laboratory).is_some());
        assert!(catalog.search(SectorId::Publicity).is_some());
    }

    #[test]
    fn assets_directory_matches_bundled_catalog() {
        let from_disk = load_catalog_from_dir(assets_path()).expect("assets should load");
        let bundled = bundled_catalog().expect("bundled catalog should parse");

        assert_eq!(from_disk, bundled);
    }

    #[test]
    fn missing_directory_reports_path() {
        let err = load_catalog_from_dir("/definitely/not/here").expect_err("should fail");
        assert!(format!("{err:#}").contains("/definitely/not/here"));
    }
}
