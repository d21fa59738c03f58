use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use grid::config::GridSettings;

/// Path to a JSON file overriding the default grid and starting inventory.
const SETTINGS_ENV: &str = "GRIDBUILDER_SETTINGS";

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Grid Builder".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    });

    if let Ok(path) = std::env::var(SETTINGS_ENV) {
        match GridSettings::load(&path) {
            Ok(settings) => {
                info!("Loaded grid settings from {path}");
                app.insert_resource(settings);
            }
            Err(e) => {
                error!("Failed to load grid settings from {path}, using defaults: {e}");
            }
        }
    }

    app.add_plugins((
        grid::GridPlugin,
        editor::EditorPlugin,
        editor::EditorRenderPlugin,
        ui::UiPlugin,
    ));

    app.run();
}
