//! Keeps clicks on panels, and Enter on a focused widget, from reaching the grid.
//!
//! Runs after every panel has been drawn for the frame and publishes the
//! result as [`PointerOverUi`], which the editor's pick source reports as a
//! UI-layer hit, and [`UiKeyboardFocus`], which keeps Enter from confirming.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use editor::input::UiKeyboardFocus;
use editor::pick::PointerOverUi;

/// Returns `true` when egui wants the pointer: the cursor is over a panel or
/// egui is handling a drag/click.
#[inline]
pub fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}

/// Returns `true` when a widget has keyboard focus or egui is taking text.
pub fn egui_wants_keyboard(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_keyboard_input() || ctx.memory(|mem| mem.focused().is_some())
}

pub fn track_pointer_over_ui(
    mut contexts: EguiContexts,
    mut over_ui: ResMut<PointerOverUi>,
    mut ui_focus: ResMut<UiKeyboardFocus>,
) {
    let wants = egui_wants_pointer(&mut contexts);
    if over_ui.0 != wants {
        over_ui.0 = wants;
    }
    let focused = egui_wants_keyboard(&mut contexts);
    if ui_focus.0 != focused {
        ui_focus.0 = focused;
    }
}
