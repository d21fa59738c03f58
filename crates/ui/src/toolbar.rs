use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use editor::controller::PlacementController;
use editor::events::{SetEditorActive, SetEditorMode};
use editor::mode::BuildMode;

const ON_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 200, 100);
const OFF_COLOR: egui::Color32 = egui::Color32::from_rgb(170, 170, 170);

pub(crate) fn session_label(active: bool) -> &'static str {
    if active {
        "Editing (E to stop)"
    } else {
        "Edit grid (E)"
    }
}

/// One-line hint for the current mode and selection.
pub(crate) fn status_line(controller: &PlacementController) -> String {
    match (controller.mode(), controller.selected()) {
        (BuildMode::Build, Some(def)) => format!(
            "Placing {} ({}x{}), {} left",
            def.name, def.footprint.x, def.footprint.y, def.count
        ),
        (BuildMode::Build, None) => "Pick something from the inventory".to_string(),
        (BuildMode::Demolish, _) => "Click an object to remove it".to_string(),
    }
}

pub fn editor_toolbar_ui(
    mut contexts: EguiContexts,
    controller: Res<PlacementController>,
    mut active_events: EventWriter<SetEditorActive>,
    mut mode_events: EventWriter<SetEditorMode>,
) {
    egui::TopBottomPanel::top("editor_toolbar")
        .exact_height(36.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 10.0;

                let active = controller.is_active();
                let color = if active { ON_COLOR } else { OFF_COLOR };
                let toggle = egui::Button::new(
                    egui::RichText::new(session_label(active)).strong().color(color),
                );
                if ui.add(toggle).clicked() {
                    active_events.send(SetEditorActive(!active));
                }

                if !active {
                    return;
                }

                ui.separator();
                for mode in BuildMode::ALL {
                    let key = match mode {
                        BuildMode::Build => "B",
                        BuildMode::Demolish => "X",
                    };
                    let selected = controller.mode() == mode;
                    if ui
                        .selectable_label(selected, format!("{} ({key})", mode.label()))
                        .clicked()
                        && !selected
                    {
                        mode_events.send(SetEditorMode(mode));
                    }
                }

                ui.separator();
                ui.label(status_line(&controller));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid::inventory::PlaceableDefinition;

    #[test]
    fn test_status_line_follows_mode_and_selection() {
        let mut controller = PlacementController::default();
        assert_eq!(status_line(&controller), "Pick something from the inventory");

        let mut def = PlaceableDefinition::new("shed", UVec2::new(2, 1), 3);
        def.name = "Shed".into();
        controller.set_selected_definition(def);
        assert_eq!(status_line(&controller), "Placing Shed (2x1), 3 left");

        controller.set_mode(BuildMode::Demolish);
        assert_eq!(status_line(&controller), "Click an object to remove it");
    }

    #[test]
    fn test_session_label() {
        assert_ne!(session_label(true), session_label(false));
    }
}
