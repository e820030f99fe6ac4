mod input;
mod resources;
mod setup;
mod simulation;
mod state;
mod view;

use bevy::prelude::*;

pub use resources::{FocusState, GameAction, RuntimeConfig, SessionState};
pub use state::{AppPhase, SimRunState};

pub struct IdleAppPlugin;

impl Plugin for IdleAppPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppPhase>()
            .init_state::<SimRunState>()
            .init_resource::<RuntimeConfig>()
            .init_resource::<FocusState>()
            .add_event::<GameAction>()
            .add_systems(Startup, setup::spawn_camera)
            .add_systems(OnEnter(AppPhase::Boot), setup::bootstrap_session)
            .add_systems(OnExit(AppPhase::Boot), view::spawn_hud)
            .add_systems(OnEnter(SimRunState::Running), simulation::mark_sim_running)
            .add_systems(OnEnter(SimRunState::Paused), simulation::mark_sim_paused)
            .add_systems(
                Update,
                (
                    input::handle_keyboard_controls,
                    simulation::handle_save_hotkeys,
                    simulation::apply_game_actions,
                    simulation::tick_game.run_if(in_state(SimRunState::Running)),
                    simulation::autosave_session,
                    view::apply_theme,
                    view::refresh_hud,
                    simulation::detect_game_end,
                )
                    .chain()
                    .run_if(in_state(AppPhase::InGame)),
            )
            .add_systems(
                Update,
                (
                    simulation::handle_save_hotkeys,
                    simulation::autosave_session,
                    view::apply_theme,
                    view::refresh_end_screen,
                    simulation::leave_end_screen,
                )
                    .chain()
                    .run_if(in_state(AppPhase::Ended)),
            )
            .add_systems(Last, simulation::flush_on_exit);
    }
}
