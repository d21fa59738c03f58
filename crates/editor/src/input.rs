use bevy::prelude::*;

use crate::controller::PlacementController;
use crate::events::{SelectPlaceable, SetEditorActive, SetEditorMode};
use crate::mode::BuildMode;

/// Level-triggered confirm press for this frame, consumed by the tick.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmInput(pub bool);

/// An egui widget holds keyboard focus this frame, so Enter belongs to it.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiKeyboardFocus(pub bool);

/// Left click confirms, and so does Enter unless a UI widget has focus.
pub fn confirm_pressed(
    buttons: &ButtonInput<MouseButton>,
    keys: &ButtonInput<KeyCode>,
    ui_focus: UiKeyboardFocus,
) -> bool {
    buttons.just_pressed(MouseButton::Left) || (!ui_focus.0 && keys.just_pressed(KeyCode::Enter))
}

pub fn read_confirm_input(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    ui_focus: Res<UiKeyboardFocus>,
    mut confirm: ResMut<ConfirmInput>,
) {
    confirm.0 = confirm_pressed(&buttons, &keys, *ui_focus);
}

/// E toggles the session, B/X pick the mode, Escape drops the selection.
pub fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    controller: Res<PlacementController>,
    mut active_events: EventWriter<SetEditorActive>,
    mut mode_events: EventWriter<SetEditorMode>,
    mut select_events: EventWriter<SelectPlaceable>,
) {
    if keys.just_pressed(KeyCode::KeyE) {
        active_events.send(SetEditorActive(!controller.is_active()));
    }
    if !controller.is_active() {
        return;
    }
    if keys.just_pressed(KeyCode::KeyB) {
        mode_events.send(SetEditorMode(BuildMode::Build));
    }
    if keys.just_pressed(KeyCode::KeyX) {
        mode_events.send(SetEditorMode(BuildMode::Demolish));
    }
    if keys.just_pressed(KeyCode::Escape) && controller.selected().is_some() {
        select_events.send(SelectPlaceable(None));
    }
}
