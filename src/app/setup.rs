use bevy::prelude::*;

use crate::core::Game;
use crate::data::bundled_catalog;
use crate::save::{Autosave, FileStorage, Persistence};

use super::resources::{RuntimeConfig, SessionState, now_ms};
use super::state::{AppPhase, SimRunState};

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("PrimaryCamera"), Camera2d));
}

pub fn bootstrap_session(
    mut commands: Commands,
    config: Res<RuntimeConfig>,
    mut next_phase: ResMut<NextState<AppPhase>>,
    mut next_run_state: ResMut<NextState<SimRunState>>,
    mut exit: EventWriter<AppExit>,
) {
    let catalog = match bundled_catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("failed to load game catalog: {err:#}");
            exit.send(AppExit::error());
            return;
        }
    };

    let mut game = Game::new(catalog, now_ms());
    let persistence = Persistence::new(FileStorage::new(&config.save_dir));
    let mut autosave = Autosave::new(config.autosave_debounce_ms);
    if persistence.restore(&mut game) {
        info!("resumed saved game from {}", config.save_dir.display());
        autosave.mark_saved(game.revision());
    } else {
        info!("starting a new game");
    }

    commands.insert_resource(SessionState {
        game,
        persistence,
        autosave,
        tick_timer: Timer::from_seconds((1.0 / config.tick_hz).max(0.01), TimerMode::Repeating),
        last_save_error: None,
        last_message: None,
    });

    next_run_state.set(SimRunState::Running);
    next_phase.set(AppPhase::InGame);
}
