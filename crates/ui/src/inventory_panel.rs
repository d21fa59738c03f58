//! Paged list of owned placeables. Clicking an entry hands it to the
//! placement controller through a `SelectPlaceable` request; nothing else in
//! the panel touches the editor.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use editor::controller::PlacementController;
use editor::events::SelectPlaceable;
use grid::inventory::{page_count, Inventory, PlaceableDefinition, Pager};

pub(crate) fn entry_label(def: &PlaceableDefinition) -> String {
    format!(
        "{}  {}x{}  x{}",
        def.name, def.footprint.x, def.footprint.y, def.count
    )
}

/// Free placeables show no price.
pub(crate) fn cost_label(def: &PlaceableDefinition) -> Option<String> {
    (def.cost > 0).then(|| format!("Cost: {}", def.cost))
}

pub(crate) fn page_label(pager: &Pager, entries: usize) -> String {
    format!("Page {} / {}", pager.current(), page_count(entries).max(1))
}

fn color32(color: [f32; 4]) -> egui::Color32 {
    let [r, g, b, a] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

pub fn inventory_panel_ui(
    mut contexts: EguiContexts,
    controller: Res<PlacementController>,
    inventory: Res<Inventory>,
    mut pager: ResMut<Pager>,
    mut select_events: EventWriter<SelectPlaceable>,
) {
    if !controller.is_active() {
        return;
    }

    let entries = inventory.entries();
    pager.clamp(entries.len());
    let selected_id = controller.selected().map(|def| &def.id);

    egui::SidePanel::left("inventory_panel")
        .resizable(false)
        .default_width(220.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Inventory");
            ui.separator();

            if entries.is_empty() {
                ui.label("Nothing left to place");
                return;
            }

            for def in &entries[pager.visible_range(entries.len())] {
                ui.horizontal(|ui| {
                    let (swatch, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, color32(def.color));

                    let is_selected = selected_id == Some(&def.id);
                    let response = ui.selectable_label(is_selected, entry_label(def));
                    let cost = cost_label(def);
                    let response = if def.brief.is_empty()
                        && def.description.is_empty()
                        && cost.is_none()
                    {
                        response
                    } else {
                        response.on_hover_ui(|ui| {
                            ui.strong(&def.name);
                            if !def.brief.is_empty() {
                                ui.label(&def.brief);
                            }
                            if !def.description.is_empty() {
                                ui.label(&def.description);
                            }
                            if let Some(cost) = &cost {
                                ui.label(cost);
                            }
                        })
                    };
                    if response.clicked() && !is_selected {
                        select_events.send(SelectPlaceable(Some(def.id.clone())));
                    }
                });
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("<").clicked() {
                    pager.previous(entries.len());
                }
                ui.label(page_label(&pager, entries.len()));
                if ui.button(">").clicked() {
                    pager.next(entries.len());
                }
            });
        });
}
