use bevy::prelude::*;
use bevy::window::{PresentMode, Window};

use complex_idle::app::{IdleAppPlugin, RuntimeConfig};

fn main() {
    let config = RuntimeConfig::default();

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.93, 0.92, 0.89)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: config.window_title.clone(),
                resolution: (1280.0, 720.0).into(),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(config)
        .add_plugins(IdleAppPlugin)
        .run();
}
