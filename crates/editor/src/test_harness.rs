//! # TestEditor: headless harness for the placement editor
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins`, `GridPlugin` and
//! `EditorPlugin`. Instead of a camera, tests aim a vertical pick ray at a
//! cell and press confirm directly.

use bevy::app::App;
use bevy::prelude::*;

use grid::config::GridSettings;
use grid::inventory::{Inventory, PlaceableDefinition, PlaceableId};
use grid::occupancy::Grid;
use grid::placed::PlacedObject;
use grid::GridPlugin;

use crate::controller::PlacementController;
use crate::events::{PlacementEvent, SelectPlaceable, SetEditorActive, SetEditorMode};
use crate::input::ConfirmInput;
use crate::mode::BuildMode;
use crate::pick::{PickRay, PointerOverUi};
use crate::{EditorPlugin, EditorSet};

/// Every `PlacementEvent` seen so far.
#[derive(Resource, Default)]
struct PlacementLog(Vec<PlacementEvent>);

fn record_placement_events(
    mut events: EventReader<PlacementEvent>,
    mut log: ResMut<PlacementLog>,
) {
    log.0.extend(events.read().cloned());
}

pub struct TestEditor {
    app: App,
}

impl TestEditor {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A 10x10 grid of 2-unit cells with no starting placeables.
    pub fn new() -> Self {
        Self::with_settings(GridSettings {
            starting_placeables: Vec::new(),
            ..default()
        })
    }

    pub fn with_settings(settings: GridSettings) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(settings);
        app.add_plugins((GridPlugin, EditorPlugin));
        app.init_resource::<PlacementLog>();
        app.add_systems(Update, record_placement_events.after(EditorSet::Tick));
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    pub fn with_placeable(mut self, id: &str, footprint: UVec2, count: u32) -> Self {
        self.app
            .world_mut()
            .resource_mut::<Inventory>()
            .add(PlaceableDefinition::new(id, footprint, count));
        self
    }

    // -----------------------------------------------------------------------
    // Requests (go through events, like the UI does)
    // -----------------------------------------------------------------------

    pub fn activate(&mut self) -> &mut Self {
        self.app.world_mut().send_event(SetEditorActive(true));
        self.tick()
    }

    pub fn deactivate(&mut self) -> &mut Self {
        self.app.world_mut().send_event(SetEditorActive(false));
        self.tick()
    }

    pub fn select(&mut self, id: &str) -> &mut Self {
        self.app
            .world_mut()
            .send_event(SelectPlaceable(Some(PlaceableId::new(id))));
        self.tick()
    }

    pub fn set_mode(&mut self, mode: BuildMode) -> &mut Self {
        self.app.world_mut().send_event(SetEditorMode(mode));
        self.tick()
    }

    /// Hand a definition straight to the controller, bypassing the
    /// inventory's own selection.
    pub fn select_directly(&mut self, definition: PlaceableDefinition) -> &mut Self {
        self.app
            .world_mut()
            .resource_mut::<PlacementController>()
            .set_selected_definition(definition);
        self
    }

    pub fn take_from_inventory(&mut self, id: &str, amount: u32) -> &mut Self {
        self.app
            .world_mut()
            .resource_mut::<Inventory>()
            .remove(&PlaceableId::new(id), amount);
        self
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    /// Point straight down at the centre of cell `(x, y)`.
    pub fn aim_at_cell(&mut self, x: u32, y: u32) -> &mut Self {
        let grid = self.grid();
        let half = grid.cell_size() * 0.5;
        let target = grid.cell_to_world(x, y) + Vec3::new(half, 0.0, half);
        let ray = Ray3d::new(target + Vec3::Y * 50.0, Dir3::NEG_Y);
        self.app.world_mut().resource_mut::<PickRay>().0 = Some(ray);
        self
    }

    /// Point at nothing at all.
    pub fn aim_away(&mut self) -> &mut Self {
        self.app.world_mut().resource_mut::<PickRay>().0 = None;
        self
    }

    pub fn set_pointer_over_ui(&mut self, over: bool) -> &mut Self {
        self.app.world_mut().resource_mut::<PointerOverUi>().0 = over;
        self
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    pub fn tick(&mut self) -> &mut Self {
        self.app.update();
        self
    }

    /// Press confirm for exactly one frame.
    pub fn click(&mut self) -> &mut Self {
        self.app.world_mut().resource_mut::<ConfirmInput>().0 = true;
        self.tick()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn app_world(&self) -> &World {
        self.app.world()
    }

    pub fn controller(&self) -> &PlacementController {
        self.app.world().resource::<PlacementController>()
    }

    pub fn grid(&self) -> &Grid {
        self.app.world().resource::<Grid>()
    }

    pub fn inventory(&self) -> &Inventory {
        self.app.world().resource::<Inventory>()
    }

    pub fn count_of(&self, id: &str) -> u32 {
        use grid::inventory::PlaceableInventory;
        self.inventory().count_of(&PlaceableId::new(id))
    }

    pub fn placed_objects(&mut self) -> Vec<(Entity, PlacedObject)> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &PlacedObject)>();
        let mut objects: Vec<_> = query
            .iter(world)
            .map(|(entity, obj)| (entity, obj.clone()))
            .collect();
        objects.sort_by_key(|(_, obj)| obj.id);
        objects
    }

    pub fn placement_events(&self) -> &[PlacementEvent] {
        &self.app.world().resource::<PlacementLog>().0
    }

    pub fn confirm_pending(&self) -> bool {
        self.app.world().resource::<ConfirmInput>().0
    }
}
