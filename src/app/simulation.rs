use bevy::prelude::*;

use crate::core::{Game, Rejection};
use crate::feedback::{Feedback, FeedbackSink, LogFeedback};
use crate::model::{ElementKind, SectorId, UnitId};
use crate::shop::ElementState;

use super::resources::{GameAction, SessionState, now_ms};
use super::state::AppPhase;

pub fn apply_game_actions(mut actions: EventReader<GameAction>, mut session: ResMut<SessionState>) {
    let mut sink = LogFeedback;
    for action in actions.read() {
        let result = perform(&mut session.game, *action);
        match result {
            Ok(cues) => {
                sink.play_all(&cues);
                session.last_message = None;
            }
            Err(rejection) => {
                session.last_message = Some(format!("{action:?}: {rejection}"));
            }
        }
    }
}

fn perform(game: &mut Game, action: GameAction) -> Result<Vec<Feedback>, Rejection> {
    match action {
        GameAction::BuyUnit(unit) => game.buy_unit(unit),
        GameAction::BuyNextElement(unit, kind) => {
            let id = next_element(game, unit, kind).ok_or(Rejection::NothingToDiscover)?;
            game.buy_element(unit, kind, &id)
        }
        GameAction::BuyItemCopy(unit) => {
            let id = best_item_copy(game, unit).ok_or(Rejection::Locked)?;
            game.buy_item(unit, &id)
        }
        GameAction::StartCycle(unit) => game.start_cycle(unit),
        GameAction::ToggleAutoMode(unit) => {
            let enabled = game
                .units()
                .cycle(unit)
                .is_some_and(|cycle| cycle.auto_mode);
            game.set_auto_mode(unit, !enabled)
        }
        GameAction::ImproveComplexTime => game.improve_complex_time(),
        GameAction::ImproveComplexQuantity => game.improve_complex_quantity(),
        GameAction::RunExperiment(index) => {
            let id = game
                .catalog()
                .rabbits
                .items
                .get(index)
                .map(|experiment| experiment.id.clone())
                .ok_or(Rejection::UnknownEntity)?;
            game.run_experiment(&id)
        }
        GameAction::BuyRabbit => game.buy_rabbit(),
        GameAction::StartSearch => game.start_search(game.current_sector()),
        GameAction::ResolveSearch(choice) => game.resolve_search(game.current_sector(), choice),
        GameAction::StepSector(step) => {
            let sector = step_sector(game, step);
            game.set_current_sector(sector)
        }
        GameAction::ToggleDarkMode => {
            game.set_dark_mode(!game.dark_mode());
            Ok(vec![Feedback::ClickBasic])
        }
    }
}

/// First element of the list that is not bought yet.
fn next_element(game: &Game, unit: UnitId, kind: ElementKind) -> Option<String> {
    game.get_elements_for_unit(unit, kind)
        .into_iter()
        .find(|view| view.state != ElementState::Purchased)
        .map(|view| view.definition.id.clone())
}

/// Most advanced revealed item whose next copy can be bought.
fn best_item_copy(game: &Game, unit: UnitId) -> Option<String> {
    game.get_elements_for_unit(unit, ElementKind::Item)
        .into_iter()
        .rev()
        .filter(|view| view.state == ElementState::Purchased)
        .map(|view| view.definition.id.clone())
        .find(|id| game.can_buy_item(unit, id))
}

fn step_sector(game: &Game, step: i32) -> SectorId {
    let unlocked = game.inventory().unlocked_sectors();
    let current = unlocked
        .iter()
        .position(|sector| *sector == game.current_sector())
        .unwrap_or(0) as i32;
    let len = unlocked.len().max(1) as i32;
    let index = (current + step).rem_euclid(len) as usize;
    unlocked.get(index).copied().unwrap_or(game.current_sector())
}

pub fn tick_game(time: Res<Time>, mut session: ResMut<SessionState>) {
    let steps = session
        .tick_timer
        .tick(time.delta())
        .times_finished_this_tick();
    let step_ms = session.tick_timer.duration().as_secs_f64() * 1000.0;

    let mut sink = LogFeedback;
    for _ in 0..steps {
        let cues = session.game.advance(step_ms);
        sink.play_all(&cues);
    }
}

pub fn detect_game_end(session: Res<SessionState>, mut next_phase: ResMut<NextState<AppPhase>>) {
    if session.game.is_game_ending() {
        info!("benefits goal reached, showing the summary");
        next_phase.set(AppPhase::Ended);
    }
}

/// Back to play once a reset cleared the goal.
pub fn leave_end_screen(session: Res<SessionState>, mut next_phase: ResMut<NextState<AppPhase>>) {
    if !session.game.is_game_ending() {
        next_phase.set(AppPhase::InGame);
    }
}

pub fn mark_sim_running(session: Option<ResMut<SessionState>>) {
    if let Some(mut session) = session {
        session.game.set_paused(false);
    }
}

pub fn mark_sim_paused(session: Option<ResMut<SessionState>>) {
    if let Some(mut session) = session {
        session.game.set_paused(true);
    }
}

pub fn autosave_session(mut session: ResMut<SessionState>) {
    let session = &mut *session;
    match session
        .autosave
        .poll(now_ms(), &session.game, &mut session.persistence)
    {
        Ok(_) => session.last_save_error = None,
        Err(err) => {
            warn!("autosave failed: {err:#}");
            session.last_save_error = Some(format!("{err:#}"));
        }
    }
}

/// F5 saves now, F9 reloads the last save, F12 wipes the save and restarts.
pub fn handle_save_hotkeys(keys: Res<ButtonInput<KeyCode>>, mut session: ResMut<SessionState>) {
    let session = &mut *session;

    if keys.just_pressed(KeyCode::F5) {
        let result = session.persistence.save_game(&session.game);
        match result {
            Ok(()) => {
                session.autosave.mark_saved(session.game.revision());
                session.last_save_error = None;
            }
            Err(err) => session.last_save_error = Some(format!("{err:#}")),
        }
    }

    if keys.just_pressed(KeyCode::F9) {
        if session.persistence.restore(&mut session.game) {
            session.autosave.mark_saved(session.game.revision());
            session.last_message = Some("save loaded".to_string());
        } else {
            session.last_message = Some("no usable save".to_string());
        }
    }

    if keys.just_pressed(KeyCode::F12) {
        if let Err(err) = session.persistence.reset() {
            session.last_save_error = Some(format!("{err:#}"));
        }
        session.game.reset(now_ms());
        session.autosave.mark_saved(session.game.revision());
        session.last_message = Some("game reset".to_string());
    }
}

pub fn flush_on_exit(mut exits: EventReader<AppExit>, session: Option<ResMut<SessionState>>) {
    if exits.read().next().is_none() {
        return;
    }
    let Some(mut session) = session else {
        return;
    };
    let session = &mut *session;
    if let Err(err) = session.autosave.flush(&session.game, &mut session.persistence) {
        error!("final save failed: {err:#}");
    }
}
