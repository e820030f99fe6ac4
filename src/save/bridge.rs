use anyhow::{Result, bail};

use crate::core::{BatchCycle, Game};
use crate::minigame::{SearchEncounter, SearchState};
use crate::model::ElementKind;
use crate::shop::Inventory;

use super::{
    SAVE_VERSION, SaveCycle, SaveData, SaveItemCount, SavePrice, SaveRabbit, SaveSearch, SaveUnit,
};

pub fn save_data_from_game(game: &Game) -> SaveData {
    let units = game
        .units
        .units()
        .map(|unit| SaveUnit {
            id: unit.id,
            amount: unit.amount.get(),
            rate: unit.rate.get(),
            duration: unit.duration_ms(),
            value_by_action: unit.value_by_action.get(),
            cycle: unit.cycle.map(|cycle| SaveCycle {
                elapsed_ms: cycle.elapsed_ms,
                running: cycle.running,
                auto_mode: cycle.auto_mode,
            }),
        })
        .collect();
    let prices = game
        .catalog
        .units
        .prices
        .iter()
        .map(|price| SavePrice {
            id: price.id,
            value: game.units.price(price.id),
        })
        .collect();
    let item_counts = game
        .inventory
        .item_counts()
        .map(|(unit, id, count)| SaveItemCount {
            unit,
            id: id.to_string(),
            count,
        })
        .collect();
    let searches = game
        .searches
        .iter()
        .map(|search| SaveSearch {
            sector: search.sector,
            state: search.state.clone(),
            discovered: search.discovered.clone(),
            declined: search.declined.clone(),
        })
        .collect();

    SaveData {
        version: SAVE_VERSION,
        units,
        prices,
        purchased: game.inventory.purchased().cloned().collect(),
        item_counts,
        unlocked_sectors: game.inventory.unlocked_sectors().to_vec(),
        current_sector: game.current_sector,
        revealed_units: game.revealed_units.iter().copied().collect(),
        dark_mode: game.dark_mode,
        start_time_ms: game.start_time_ms,
        total_ticks: game.production.tick_index,
        goal_reached: game.goal_reached,
        rabbit: SaveRabbit {
            life: game.rabbit.life,
            kills: game.rabbit.kills,
            price: game.rabbit.price,
        },
        searches,
    }
}

/// Rebuilds `game` from a save. Entries naming units, elements or sectors
/// the catalog does not know are skipped.
pub fn apply_save_data(game: &mut Game, save: &SaveData) -> Result<()> {
    if save.version != SAVE_VERSION {
        bail!("unsupported save version {}", save.version);
    }
    game.reset(save.start_time_ms);

    for entry in &save.units {
        let cycle = entry.cycle.map(|cycle| BatchCycle {
            elapsed_ms: cycle.elapsed_ms.max(0.0),
            running: cycle.running,
            auto_mode: cycle.auto_mode,
        });
        game.units.restore_unit(
            entry.id,
            entry.rate,
            entry.duration,
            entry.value_by_action,
            cycle,
        );
        game.units.jump_amount(entry.id, entry.amount);
    }
    for price in &save.prices {
        game.units.jump_price(price.id, price.value);
    }

    let mut inventory = Inventory::new(game.catalog.config.default_sector);
    for sector in &save.unlocked_sectors {
        inventory.unlock_sector(*sector);
    }
    for key in &save.purchased {
        if game.catalog.shop.element(key.unit, key.kind, &key.id).is_some() {
            inventory.mark_purchased(key.clone());
        }
    }
    for entry in &save.item_counts {
        if inventory.is_purchased(entry.unit, ElementKind::Item, &entry.id) {
            inventory.set_item_count(entry.unit, &entry.id, entry.count);
        }
    }
    game.inventory = inventory;

    game.current_sector = if game.inventory.is_sector_unlocked(save.current_sector) {
        save.current_sector
    } else {
        game.catalog.config.default_sector
    };
    game.revealed_units.extend(save.revealed_units.iter().copied());
    game.dark_mode = save.dark_mode;
    game.production.tick_index = save.total_ticks;
    game.goal_reached = save.goal_reached;

    game.rabbit.life = save.rabbit.life.clamp(0.0, game.catalog.rabbits.life);
    game.rabbit.kills = save.rabbit.kills;
    game.rabbit.price = save.rabbit.price.max(0.0);

    for saved in &save.searches {
        let Some(search) = game
            .searches
            .iter_mut()
            .find(|search| search.sector == saved.sector)
        else {
            continue;
        };
        let known = |item: &str| {
            game.catalog
                .search(saved.sector)
                .is_some_and(|data| data.items.iter().any(|entry| entry.id == item))
        };
        let state = match saved.state.item() {
            Some(item) if !known(item) => {
                log::warn!("dropping {:?} search for unknown item {item}", saved.sector);
                SearchState::Idle
            }
            _ => saved.state.clone(),
        };
        *search = SearchEncounter {
            sector: saved.sector,
            state,
            discovered: saved.discovered.clone(),
            declined: saved.declined.clone(),
        };
    }

    game.restored_revision();
    Ok(())
}
