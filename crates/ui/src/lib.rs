use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use editor::EditorSet;

pub mod inventory_panel;
pub mod pointer_guard;
pub mod theme;
pub mod toolbar;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Startup, theme::apply_theme)
            .add_systems(
                Update,
                (
                    toolbar::editor_toolbar_ui,
                    inventory_panel::inventory_panel_ui,
                    pointer_guard::track_pointer_over_ui,
                )
                    .chain()
                    .before(EditorSet::Input),
            );
    }
}
