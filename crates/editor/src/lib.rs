use bevy::prelude::*;

pub mod camera;
pub mod controller;
pub mod events;
pub mod input;
pub mod mode;
pub mod pick;
pub mod tick;
pub mod visuals;

#[cfg(test)]
mod test_harness;

use controller::PlacementController;
use events::{PlacementEvent, SelectPlaceable, SetEditorActive, SetEditorMode};
use input::{ConfirmInput, UiKeyboardFocus};
use pick::{PickRay, PointerOverUi};

/// Per-frame ordering of the editor. UI systems that write
/// [`PointerOverUi`] or send editor requests run before `Input`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorSet {
    /// Pick ray, confirm press and keyboard shortcuts.
    Input,
    /// Session, mode and selection requests.
    Requests,
    /// The placement controller tick.
    Tick,
    /// Derived tile and object appearance.
    Visuals,
}

/// Controller state, requests and the placement tick. Runs headless.
pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementController>()
            .init_resource::<ConfirmInput>()
            .init_resource::<PickRay>()
            .init_resource::<PointerOverUi>()
            .init_resource::<UiKeyboardFocus>()
            .add_event::<PlacementEvent>()
            .add_event::<SelectPlaceable>()
            .add_event::<SetEditorMode>()
            .add_event::<SetEditorActive>()
            .configure_sets(
                Update,
                (
                    EditorSet::Input,
                    EditorSet::Requests,
                    EditorSet::Tick,
                    EditorSet::Visuals,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    tick::apply_editor_requests.in_set(EditorSet::Requests),
                    tick::run_placement_tick.in_set(EditorSet::Tick),
                ),
            );
    }
}

/// Camera, lighting, pointer input and the tile/object visuals.
pub struct EditorRenderPlugin;

impl Plugin for EditorRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (camera::setup_camera, setup_lighting, visuals::spawn_grid_tiles),
        )
        .add_systems(
            Update,
            (
                (camera::camera_keyboard, camera::camera_mouse),
                camera::sync_camera_transform,
            )
                .chain()
                .before(EditorSet::Input),
        )
        .add_systems(
            Update,
            (
                pick::update_pick_ray,
                input::read_confirm_input,
                input::keyboard_shortcuts,
            )
                .in_set(EditorSet::Input),
        )
        .add_systems(
            Update,
            (
                visuals::attach_object_meshes,
                visuals::refresh_cell_visuals,
                visuals::refresh_object_visuals,
            )
                .chain()
                .in_set(EditorSet::Visuals),
        );
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 400.0,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
    ));
}
