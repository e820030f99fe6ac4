use bevy::prelude::*;

use crate::minigame::SearchChoice;
use crate::model::{ElementKind, UnitId};

use super::resources::{FocusState, GameAction, SessionState};
use super::state::SimRunState;

const EXPERIMENT_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

pub fn handle_keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<SessionState>,
    mut focus: ResMut<FocusState>,
    mut actions: EventWriter<GameAction>,
    run_state: Res<State<SimRunState>>,
    mut next_run_state: ResMut<NextState<SimRunState>>,
) {
    let unit = focus.unit;
    let bindings = [
        (KeyCode::KeyA, GameAction::BuyUnit(UnitId::Actif)),
        (KeyCode::KeyS, GameAction::BuyUnit(UnitId::Sale)),
        (KeyCode::KeyC, GameAction::StartCycle(UnitId::Complex)),
        (KeyCode::KeyM, GameAction::ToggleAutoMode(UnitId::Complex)),
        (KeyCode::KeyT, GameAction::ImproveComplexTime),
        (KeyCode::KeyY, GameAction::ImproveComplexQuantity),
        (KeyCode::KeyI, GameAction::BuyNextElement(unit, ElementKind::Item)),
        (KeyCode::KeyO, GameAction::BuyItemCopy(unit)),
        (KeyCode::KeyU, GameAction::BuyNextElement(unit, ElementKind::Upgrade)),
        (KeyCode::KeyK, GameAction::BuyNextElement(UnitId::Sale, ElementKind::Sector)),
        (
            KeyCode::KeyL,
            GameAction::BuyNextElement(UnitId::Sale, ElementKind::OtherShopElement),
        ),
        (KeyCode::KeyR, GameAction::BuyRabbit),
        (KeyCode::KeyF, GameAction::StartSearch),
        (KeyCode::Enter, GameAction::ResolveSearch(SearchChoice::Accept)),
        (KeyCode::Backspace, GameAction::ResolveSearch(SearchChoice::Decline)),
        (KeyCode::ArrowLeft, GameAction::StepSector(-1)),
        (KeyCode::ArrowRight, GameAction::StepSector(1)),
        (KeyCode::KeyD, GameAction::ToggleDarkMode),
    ];
    for (key, action) in bindings {
        if keys.just_pressed(key) {
            actions.send(action);
        }
    }

    for (index, key) in EXPERIMENT_KEYS.into_iter().enumerate() {
        if keys.just_pressed(key) {
            actions.send(GameAction::RunExperiment(index));
        }
    }

    if keys.just_pressed(KeyCode::Tab) {
        focus.step(&session.game);
    }

    if keys.just_pressed(KeyCode::Space) || keys.just_pressed(KeyCode::KeyP) {
        next_run_state.set(run_state.get().toggled());
    }
}
