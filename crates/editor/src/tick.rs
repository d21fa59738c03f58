use bevy::prelude::*;

use grid::inventory::{Inventory, PlaceableInventory};
use grid::occupancy::Grid;
use grid::placed::PlacedObject;

use crate::controller::{EcsPlacementWorld, PlacementController};
use crate::events::{PlacementEvent, SelectPlaceable, SetEditorActive, SetEditorMode};
use crate::input::ConfirmInput;
use crate::mode::BuildMode;
use crate::pick::{PickRay, PointerOverUi, WorldPicker};

/// Apply session, mode and selection requests sent by the UI and shortcuts.
pub fn apply_editor_requests(
    mut active_events: EventReader<SetEditorActive>,
    mut mode_events: EventReader<SetEditorMode>,
    mut select_events: EventReader<SelectPlaceable>,
    mut controller: ResMut<PlacementController>,
    mut inventory: ResMut<Inventory>,
) {
    for SetEditorActive(active) in active_events.read() {
        controller.set_active(*active);
        info!("Editor {}", if *active { "on" } else { "off" });
    }

    for SetEditorMode(mode) in mode_events.read() {
        if controller.mode() != *mode {
            controller.set_mode(*mode);
        }
    }

    for SelectPlaceable(request) in select_events.read() {
        let Some(id) = request else {
            inventory.clear_selection();
            controller.clear_selection();
            continue;
        };
        if !inventory.select(id) {
            warn!("Cannot select '{id}': not in the inventory");
            continue;
        }
        if let Some(definition) = inventory.current_selection() {
            controller.set_selected_definition(definition.clone());
        }
        if controller.mode() != BuildMode::Build {
            controller.set_mode(BuildMode::Build);
        }
    }

    // The inventory may have dropped or restocked the held entry.
    controller.sync_selection(&*inventory);
}

/// One controller tick per frame against the current pick ray.
#[allow(clippy::too_many_arguments)]
pub fn run_placement_tick(
    mut commands: Commands,
    mut controller: ResMut<PlacementController>,
    mut grid: ResMut<Grid>,
    mut inventory: ResMut<Inventory>,
    mut confirm: ResMut<ConfirmInput>,
    pick_ray: Res<PickRay>,
    pointer_over_ui: Res<PointerOverUi>,
    objects: Query<(Entity, &PlacedObject)>,
    mut events: EventWriter<PlacementEvent>,
) {
    let confirmed = std::mem::take(&mut confirm.0);
    let geometry = grid.geometry();
    let picker = WorldPicker::new(pick_ray.0, pointer_over_ui.0, geometry).with_objects(
        objects.iter().map(|(entity, obj)| {
            let (min, max) = obj.world_bounds(&geometry);
            (entity, min, max)
        }),
    );

    let mut world = EcsPlacementWorld {
        commands: &mut commands,
        objects: &objects,
    };
    if let Some(event) =
        controller.tick(&picker, confirmed, &mut grid, &mut *inventory, &mut world)
    {
        events.send(event);
    }
}
