use complex_idle::save::load_from_json_string;
use complex_idle::{
    ElementKind, Feedback, Game, MemoryStorage, Persistence, Rejection, SearchChoice, SectorId,
    UnitId, bundled_catalog, save_data_from_game,
};

const EPSILON: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "expected {expected}, got {actual}"
    );
}

fn fresh_game() -> Game {
    Game::bundled(0).expect("bundled catalog should parse")
}

fn rich_game() -> Game {
    let mut game = fresh_game();
    game.modify_unit_value(UnitId::Benefits, 50_000.0);
    game.modify_unit_value(UnitId::Actif, 50_000.0);
    game
}

fn unlock_rabbit_game(game: &mut Game) {
    game.buy_element(UnitId::Sale, ElementKind::Sector, "laboratory")
        .expect("laboratory sector");
    game.buy_element(UnitId::Sale, ElementKind::OtherShopElement, "rabbitGame")
        .expect("rabbit game");
}

#[test]
fn removing_then_adding_restores_amount_unless_clamped() {
    for unit in UnitId::ALL {
        let mut game = fresh_game();
        game.modify_unit_value(unit, 10.0);
        let original = game.amount(unit);

        game.modify_unit_value(unit, -4.0);
        game.modify_unit_value(unit, 4.0);
        assert_close(game.amount(unit), original);

        let floor = game.units().get_unit(unit).map_or(0.0, |entry| entry.min);
        let bottom = (-7.0_f64).max(floor);
        game.modify_unit_value(unit, -(original + 7.0));
        assert_close(game.amount(unit), bottom);
        game.modify_unit_value(unit, original + 7.0);
        assert_close(game.amount(unit), bottom + original + 7.0);
    }
}

#[test]
fn exact_debit_leaves_nothing_for_a_second_one() {
    let mut catalog = bundled_catalog().expect("bundled catalog should parse");
    for shelf in &mut catalog.shop.units {
        for upgrade in &mut shelf.upgrades {
            upgrade.cost.value = 100.0;
        }
    }
    let mut game = Game::new(catalog, 0);
    game.modify_unit_value(UnitId::Benefits, 100.0);
    assert!(game.has_enough_units(100.0, UnitId::Benefits));

    game.buy_element(UnitId::Actif, ElementKind::Upgrade, "gloves")
        .expect("exactly affordable");

    assert!(!game.has_enough_units(100.0, UnitId::Benefits));
    assert!(matches!(
        game.buy_element(UnitId::Actif, ElementKind::Upgrade, "microscope"),
        Err(Rejection::InsufficientFunds { unit: UnitId::Benefits, .. })
    ));
}

#[test]
fn buying_a_hundred_benefit_element_out_of_a_thousand() {
    let mut catalog = bundled_catalog().expect("bundled catalog should parse");
    let gloves = catalog
        .shop
        .units
        .iter_mut()
        .flat_map(|shelf| shelf.upgrades.iter_mut())
        .find(|upgrade| upgrade.id == "gloves")
        .expect("gloves upgrade in catalog");
    gloves.cost.value = 100.0;

    let mut game = Game::new(catalog, 0);
    game.modify_unit_value(UnitId::Benefits, 1000.0);

    let cues = game
        .buy_element(UnitId::Actif, ElementKind::Upgrade, "gloves")
        .expect("affordable");
    assert_eq!(cues, vec![Feedback::BuyShop]);
    assert_close(game.amount(UnitId::Benefits), 900.0);
    assert!(game.inventory().is_purchased(UnitId::Actif, ElementKind::Upgrade, "gloves"));

    assert_eq!(
        game.buy_element(UnitId::Actif, ElementKind::Upgrade, "gloves"),
        Err(Rejection::AlreadyPurchased)
    );
    assert_close(game.amount(UnitId::Benefits), 900.0);
}

#[test]
fn no_element_can_be_bought_ahead_of_its_predecessor() {
    let catalog = bundled_catalog().expect("bundled catalog should parse");
    for shelf in &catalog.shop.units {
        for kind in ElementKind::ALL {
            let elements = shelf.elements(kind);
            for index in 1..elements.len() {
                let mut game = rich_game();
                let benefits = game.amount(UnitId::Benefits);
                let id = &elements[index].id;

                assert!(
                    game.buy_element(shelf.unit, kind, id).is_err(),
                    "{} {kind:?} {id} bought out of order",
                    shelf.unit
                );
                assert!(!game.inventory().is_purchased(shelf.unit, kind, id));
                assert_close(game.amount(UnitId::Benefits), benefits);

                for earlier in &elements[..index] {
                    game.buy_element(shelf.unit, kind, &earlier.id)
                        .expect("in-order purchase");
                }
                game.buy_element(shelf.unit, kind, id)
                    .expect("predecessor purchased");
            }
        }
    }
}

#[test]
fn item_copies_follow_catalog_order() {
    let mut game = rich_game();
    game.buy_element_from_shop(UnitId::Actif, "pipette")
        .expect("first item");
    game.buy_element_from_shop(UnitId::Actif, "distiller")
        .expect("second item");

    assert_eq!(
        game.buy_item(UnitId::Actif, "distiller"),
        Err(Rejection::InvalidSequencing)
    );

    game.buy_item(UnitId::Actif, "pipette").expect("first copy");
    let before = game.amount(UnitId::Benefits);
    let price = game.item_price(UnitId::Actif, "distiller").expect("priced");
    game.buy_item(UnitId::Actif, "distiller").expect("predecessor owned");

    assert_close(game.amount(UnitId::Benefits), before - price.value);
    assert_close(game.units().rate(UnitId::Actif), 0.5 + 3.0);
    assert_close(
        game.item_price(UnitId::Actif, "distiller").expect("priced").value,
        120.0 * 1.15,
    );
}

#[test]
fn killing_a_rabbit_counts_once_and_raises_the_next_price() {
    let mut game = rich_game();
    unlock_rabbit_game(&mut game);
    assert_eq!(game.buy_rabbit(), Err(Rejection::Busy));

    game.run_experiment("eyes").expect("alive");
    game.run_experiment("eyes").expect("alive");
    let cues = game.run_experiment("eyes").expect("alive");

    assert!(cues.contains(&Feedback::RabbitKilled));
    assert!(game.rabbit().is_dead());
    assert_eq!(game.run_experiment("skin"), Err(Rejection::NotReady));
    assert_eq!(game.rabbit().kills, 0);
    assert_close(game.rabbit().price, 1000.0);

    let benefits = game.amount(UnitId::Benefits);
    game.buy_rabbit().expect("dead rabbit can be replaced");

    assert_close(game.amount(UnitId::Benefits), benefits - 1000.0);
    assert_eq!(game.rabbit().kills, 1);
    assert_close(game.rabbit().price, 1500.0);
    assert_close(game.rabbit().life, 6.0);
    assert_eq!(game.buy_rabbit(), Err(Rejection::Busy));
    assert_eq!(game.rabbit().kills, 1);
}

#[test]
fn experiments_lower_the_ethics_score() {
    let mut game = rich_game();
    unlock_rabbit_game(&mut game);

    game.run_experiment("eyes").expect("alive");
    game.run_experiment("skin").expect("alive");

    assert_close(game.amount(UnitId::Karma), -15.0);
    assert_close(game.end_summary(0).karma, -15.0);
}

#[test]
fn auto_complex_cycle_yields_one_batch_per_duration() {
    let mut game = rich_game();
    game.buy_element(UnitId::Complex, ElementKind::Upgrade, "autoprod")
        .expect("autoprod");
    game.set_auto_mode(UnitId::Complex, true).expect("unlocked");
    let complex = game.amount(UnitId::Complex);
    let actif = game.amount(UnitId::Actif);

    game.advance(5000.0);

    assert_close(game.amount(UnitId::Complex), complex + 1.0);
    assert_close(game.amount(UnitId::Actif), actif - 5.0);
    let cycle = game.units().cycle(UnitId::Complex).expect("batch unit");
    assert_close(cycle.elapsed_ms, 0.0);
    assert!(cycle.running);
}

#[test]
fn saved_game_resumes_identically() {
    let mut game = rich_game();
    for _ in 0..6 {
        game.buy_unit(UnitId::Actif).expect("free");
    }
    game.buy_element(UnitId::Actif, ElementKind::Upgrade, "gloves")
        .expect("upgrade");
    game.buy_element_from_shop(UnitId::Sale, "stand").expect("item");
    game.buy_item(UnitId::Sale, "stand").expect("copy");
    game.buy_element(UnitId::Complex, ElementKind::Upgrade, "autoprod")
        .expect("autoprod");
    game.set_auto_mode(UnitId::Complex, true).expect("unlocked");
    game.improve_complex_time().expect("affordable");
    unlock_rabbit_game(&mut game);
    game.run_experiment("skin").expect("alive");
    game.set_current_sector(SectorId::Laboratory).expect("unlocked");
    game.start_search(SectorId::Laboratory).expect("affordable");
    game.set_dark_mode(true);
    game.advance(7_250.0);

    let mut persistence = Persistence::new(MemoryStorage::default());
    persistence.save_game(&game).expect("memory save");

    let mut restored = fresh_game();
    assert!(persistence.restore(&mut restored));

    assert_eq!(save_data_from_game(&restored), save_data_from_game(&game));
    assert_eq!(restored.units(), game.units());
    assert_eq!(restored.inventory(), game.inventory());
    assert_eq!(restored.rabbit(), game.rabbit());
    assert_eq!(restored.searches(), game.searches());
    assert_eq!(restored.current_sector(), SectorId::Laboratory);
    assert!(restored.dark_mode());

    game.advance(30_000.0);
    restored.advance(30_000.0);
    assert_eq!(restored.units(), game.units());
    game.resolve_search(SectorId::Laboratory, SearchChoice::Decline)
        .expect("awaiting choice");
    restored
        .resolve_search(SectorId::Laboratory, SearchChoice::Decline)
        .expect("awaiting choice");
    assert_eq!(save_data_from_game(&restored), save_data_from_game(&game));
}

#[test]
fn stored_record_is_plain_json() {
    let mut game = rich_game();
    game.buy_unit(UnitId::Actif).expect("free");
    let mut persistence = Persistence::new(MemoryStorage::default());
    persistence.save_game(&game).expect("memory save");

    let raw = complex_idle::KeyValueStorage::get(persistence.storage(), "complex-idle:game-state")
        .expect("memory read")
        .expect("record written");
    let parsed = load_from_json_string(&raw).expect("valid record");
    assert_eq!(parsed, save_data_from_game(&game));
}
