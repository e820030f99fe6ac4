use std::fmt::Write as _;

use bevy::prelude::*;

use crate::core::Game;
use crate::minigame::SearchState;
use crate::model::{ElementKind, UnitId};
use crate::text::{KeyEcho, Translate, conjugate, format_elapsed, reputation_tier, rounded_time};

use super::resources::{FocusState, HudText, SessionState, now_ms};
use super::state::SimRunState;

const LIGHT_BACKGROUND: Color = Color::srgb(0.93, 0.92, 0.89);
const DARK_BACKGROUND: Color = Color::srgb(0.02, 0.02, 0.03);
const LIGHT_TEXT: Color = Color::srgb(0.94, 0.97, 0.99);
const DARK_TEXT: Color = Color::srgb(0.08, 0.08, 0.1);

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HudText"),
        HudText,
        Text::new("Initializing..."),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(DARK_TEXT),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
    ));
}

pub fn apply_theme(
    session: Res<SessionState>,
    mut clear_color: ResMut<ClearColor>,
    mut hud_query: Query<&mut TextColor, With<HudText>>,
) {
    let (background, text) = if session.game.dark_mode() {
        (DARK_BACKGROUND, LIGHT_TEXT)
    } else {
        (LIGHT_BACKGROUND, DARK_TEXT)
    };
    if clear_color.0 != background {
        clear_color.0 = background;
    }
    for mut color in &mut hud_query {
        if color.0 != text {
            color.0 = text;
        }
    }
}

pub fn refresh_hud(
    session: Res<SessionState>,
    focus: Res<FocusState>,
    run_state: Res<State<SimRunState>>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut hud) = hud_query.get_single_mut() else {
        return;
    };

    let game = &session.game;
    let run_label = run_state.get().label();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  Elapsed: {}  Sector: {}  Focus: {}",
        run_label,
        format_elapsed(game.elapsed_ms(now_ms())),
        KeyEcho.translate(&game.current_sector().label_key()),
        focus.unit,
    );
    write_units(&mut out, game);
    write_shop(&mut out, game, focus.unit);
    write_minigames(&mut out, game);

    if let Some(message) = &session.last_message {
        let _ = writeln!(out, "! {message}");
    }
    let save_line = session
        .last_save_error
        .as_deref()
        .map(|msg| format!("Save: {msg}"))
        .unwrap_or_else(|| "Save: OK (F5 save, F9 load, F12 reset, autosave on)".to_string());
    let _ = writeln!(
        out,
        "A actif, C complex, S sale, Tab focus, I/O/U shop, K/L sectors, T/Y/M complex\n1-3 experiments, R rabbit, F search, Enter/Backspace choose, arrows sector, D theme, Space pause\n{save_line}"
    );

    *hud = Text::new(out);
}

/// Summary shown once the benefits goal is reached. F12 starts over.
pub fn refresh_end_screen(
    session: Res<SessionState>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut hud) = hud_query.get_single_mut() else {
        return;
    };
    let summary = session.game.end_summary(now_ms());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Goal reached: {:.0} benefits in {}",
        summary.benefits_goal,
        format_elapsed(summary.elapsed_ms)
    );
    let _ = writeln!(out, "{} rabbits killed", summary.rabbits_killed);
    let _ = writeln!(out, "{} toxic actifs", summary.toxic_discovered);
    for (unit, item, count) in summary.item_copies.iter().filter(|(_, _, count)| *count > 0) {
        let _ = writeln!(out, "{count} x {unit}/{item}");
    }
    let _ = writeln!(out, "Karma: {:.0}", summary.karma);
    let _ = writeln!(out, "\nF12 to start a new game");

    *hud = Text::new(out);
}

fn write_units(out: &mut String, game: &Game) {
    for unit in UnitId::ALL {
        if !game.can_display_unit(unit) {
            continue;
        }
        let amount = game.amount(unit);
        let name = KeyEcho.translate(&conjugate(&unit.label_key(), amount));
        let rate = game.units().rate(unit);
        let delta = game.units().tick_delta(unit);
        let _ = write!(out, "{name}: {amount:.2}");
        if rate > 0.0 {
            let _ = write!(out, " (+{rate:.2}/s)");
        }
        if delta != 0.0 {
            let _ = write!(out, " [{delta:+.2}]");
        }
        if let Some(cycle) = game.units().cycle(unit) {
            let duration = game
                .get_unit(unit)
                .and_then(|entry| entry.duration_ms())
                .unwrap_or_default();
            let _ = write!(
                out,
                " cycle {:.1}/{:.1}s{}{}",
                cycle.elapsed_ms / 1000.0,
                duration / 1000.0,
                if cycle.running { " running" } else { "" },
                if cycle.auto_mode { " auto" } else { "" },
            );
        }
        let _ = writeln!(out);
    }
    let reputation = game.amount(UnitId::Reputation);
    let _ = writeln!(
        out,
        "Reputation tier: {}",
        KeyEcho.translate(reputation_tier(reputation).label_key())
    );
    if let Some(cost) = game.complex_time_price() {
        let _ = write!(out, "Improve time: {:.0} {}  ", cost.value, cost.unit_id);
    }
    let quantity = game.complex_quantity_price();
    let _ = writeln!(out, "Improve quantity: {:.0} {}", quantity.value, quantity.unit_id);
}

fn write_shop(out: &mut String, game: &Game, unit: UnitId) {
    for kind in ElementKind::ALL {
        let views = game.get_elements_for_unit(unit, kind);
        if views.is_empty() {
            continue;
        }
        let _ = write!(out, "{kind:?}:");
        for view in views {
            let _ = write!(
                out,
                " {} [{:?} {:.0} {}]",
                view.definition.id, view.state, view.price.value, view.price.unit_id
            );
            if kind == ElementKind::Item && view.count > 0 {
                let _ = write!(out, " x{}", view.count);
            }
        }
        let _ = writeln!(out);
    }
}

fn write_minigames(out: &mut String, game: &Game) {
    if game.is_rabbit_game_unlocked() {
        let rabbit = game.rabbit();
        let _ = writeln!(
            out,
            "Rabbit life {:.0}, kills {}, next rabbit {:.0}{}",
            rabbit.life,
            rabbit.kills,
            rabbit.price,
            if rabbit.is_dead() { " (dead)" } else { "" }
        );
    }

    let sector = game.current_sector();
    let (Some(search), Some(price)) = (game.search(sector), game.search_price(sector)) else {
        return;
    };
    let status = match &search.state {
        SearchState::Idle => {
            let duration = game
                .catalog()
                .search(sector)
                .map(|data| rounded_time(data.duration))
                .map(|time| format!("{:.0} {}", time.value, KeyEcho.translate(time.unit_key)))
                .unwrap_or_default();
            format!("idle, costs {price:.0} for {duration}")
        }
        SearchState::InProgress { remaining_ms, .. } => {
            format!("searching, {:.0}s left", (remaining_ms / 1000.0).ceil())
        }
        SearchState::AwaitingChoice { item } => format!("found {item}, accept or decline"),
    };
    let _ = writeln!(
        out,
        "Search: {status}  Discovered: {}  Toxic: {}",
        search.discovered.len(),
        game.toxic_discovered_count()
    );
}
