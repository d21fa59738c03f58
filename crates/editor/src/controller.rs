//! Placement controller: the Build/Demolish state machine that turns picks
//! and confirm presses into grid mutations.

use bevy::prelude::*;

use grid::footprint::Footprint;
use grid::inventory::{PlaceableDefinition, PlaceableInventory};
use grid::occupancy::Grid;
use grid::placed::PlacedObject;

use crate::events::PlacementEvent;
use crate::mode::BuildMode;
use crate::pick::{PickLayer, PickSource, PickTarget};

/// Where placed-object records live. The controller spawns, reads and
/// despawns them only through this trait.
pub trait PlacementWorld {
    fn spawn_placed(
        &mut self,
        record: PlacedObject,
        definition: &PlaceableDefinition,
        at: Vec3,
    ) -> Entity;
    fn placed_object(&self, entity: Entity) -> Option<PlacedObject>;
    fn despawn_placed(&mut self, entity: Entity);
}

/// Transient editing state. Visuals are recomputed whenever `revision`
/// changes.
#[derive(Resource, Debug, Default)]
pub struct PlacementController {
    mode: BuildMode,
    active: bool,
    selected: Option<PlaceableDefinition>,
    hovered_cell: Option<UVec2>,
    hovered_object: Option<Entity>,
    revision: u64,
}

impl PlacementController {
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> Option<&PlaceableDefinition> {
        self.selected.as_ref()
    }

    pub fn hovered_cell(&self) -> Option<UVec2> {
        self.hovered_cell
    }

    pub fn hovered_object(&self) -> Option<Entity> {
        self.hovered_object
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn clear_hover(&mut self) {
        self.hovered_cell = None;
        self.hovered_object = None;
    }

    fn set_hovered_cell(&mut self, cell: Option<UVec2>) {
        if self.hovered_cell != cell {
            self.hovered_cell = cell;
            self.bump();
        }
    }

    fn set_hovered_object(&mut self, object: Option<Entity>) {
        if self.hovered_object != object {
            self.hovered_object = object;
            self.bump();
        }
    }

    pub fn set_mode(&mut self, mode: BuildMode) {
        self.mode = mode;
        self.clear_hover();
        self.bump();
    }

    /// `0 = Build`, `1 = Demolish`; anything else is ignored.
    pub fn change_mode(&mut self, index: usize) {
        match BuildMode::from_index(index) {
            Some(mode) => self.set_mode(mode),
            None => warn!("Ignoring unknown build mode index {index}"),
        }
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        self.clear_hover();
        self.bump();
    }

    pub fn set_selected_definition(&mut self, definition: PlaceableDefinition) {
        self.selected = Some(definition);
        self.bump();
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.bump();
        }
    }

    /// Reconcile the held definition with the inventory by id: drop it once
    /// nothing of it is left, otherwise keep its count current.
    pub fn sync_selection<I>(&mut self, inventory: &I)
    where
        I: PlaceableInventory + ?Sized,
    {
        let Some(remaining) = self
            .selected
            .as_ref()
            .map(|def| inventory.count_of(&def.id))
        else {
            return;
        };
        if remaining == 0 {
            self.clear_selection();
            return;
        }
        let mut changed = false;
        if let Some(selected) = self.selected.as_mut() {
            changed = selected.count != remaining;
            selected.count = remaining;
        }
        if changed {
            self.bump();
        }
    }

    pub fn check_space(&self, grid: &Grid, origin: IVec2, size: UVec2) -> bool {
        grid.is_region_free(origin, size)
    }

    pub fn cell_to_world(&self, grid: &Grid, cell: UVec2) -> Vec3 {
        grid.cell_to_world(cell.x, cell.y)
    }

    /// Footprint the selected definition would cover at the hovered cell.
    /// `None` unless active in Build mode with both a selection and a hover.
    pub fn hovered_footprint(&self) -> Option<Footprint> {
        if !self.active || self.mode != BuildMode::Build {
            return None;
        }
        let cell = self.hovered_cell?;
        let definition = self.selected.as_ref()?;
        Some(Footprint::new(cell.as_ivec2(), definition.footprint))
    }

    /// Run one input tick. Returns the committed change, if any.
    pub fn tick<P, I, W>(
        &mut self,
        pick: &P,
        confirm: bool,
        grid: &mut Grid,
        inventory: &mut I,
        world: &mut W,
    ) -> Option<PlacementEvent>
    where
        P: PickSource + ?Sized,
        I: PlaceableInventory + ?Sized,
        W: PlacementWorld + ?Sized,
    {
        if !self.active {
            return None;
        }
        if pick.pick(PickLayer::Ui).is_some() {
            return None;
        }
        match self.mode {
            BuildMode::Build => self.tick_build(pick, confirm, grid, inventory, world),
            BuildMode::Demolish => self.tick_demolish(pick, confirm, grid, world),
        }
    }

    fn tick_build<P, I, W>(
        &mut self,
        pick: &P,
        confirm: bool,
        grid: &mut Grid,
        inventory: &mut I,
        world: &mut W,
    ) -> Option<PlacementEvent>
    where
        P: PickSource + ?Sized,
        I: PlaceableInventory + ?Sized,
        W: PlacementWorld + ?Sized,
    {
        let cell = pick
            .pick(PickLayer::BuildSurface)
            .and_then(|hit| match hit.target {
                PickTarget::Cell { index } => grid.geometry().cell_from_index(index),
                _ => None,
            });
        self.set_hovered_cell(cell);

        let cell = cell?;
        if !confirm {
            return None;
        }
        let Some(definition) = self.selected.clone() else {
            debug!("Confirm at ({}, {}) ignored: nothing selected", cell.x, cell.y);
            return None;
        };

        let origin = cell.as_ivec2();
        let Some(id) = grid.occupy(origin, definition.footprint) else {
            debug!(
                "Cannot place {} at ({}, {}): region blocked or out of bounds",
                definition.id, cell.x, cell.y
            );
            return None;
        };

        let footprint = Footprint::new(origin, definition.footprint);
        let record = PlacedObject {
            id,
            footprint,
            definition: definition.id.clone(),
            height: definition.height,
        };
        let entity = world.spawn_placed(record, &definition, grid.cell_to_world(cell.x, cell.y));

        inventory.decrement_count(&definition.id, 1);
        let remaining = inventory.count_of(&definition.id);
        if remaining == 0 {
            self.selected = None;
        } else if let Some(selected) = self.selected.as_mut() {
            selected.count = remaining;
        }
        self.bump();

        info!(
            "Placed {} {id} at ({}, {}), {remaining} left",
            definition.id, cell.x, cell.y
        );
        Some(PlacementEvent::Placed {
            entity,
            id,
            definition: definition.id,
            footprint,
        })
    }

    fn tick_demolish<P, W>(
        &mut self,
        pick: &P,
        confirm: bool,
        grid: &mut Grid,
        world: &mut W,
    ) -> Option<PlacementEvent>
    where
        P: PickSource + ?Sized,
        W: PlacementWorld + ?Sized,
    {
        let target = pick
            .pick(PickLayer::PlacedObjects)
            .and_then(|hit| match hit.target {
                PickTarget::Object(entity) => Some(entity),
                _ => None,
            });
        self.set_hovered_object(target);

        let entity = target?;
        if !confirm {
            return None;
        }
        let Some(record) = world.placed_object(entity) else {
            debug!("Confirm on {entity:?} ignored: not a placed object");
            self.set_hovered_object(None);
            return None;
        };

        grid.release(record.id, &record.footprint);
        world.despawn_placed(entity);
        self.hovered_object = None;
        self.bump();

        info!(
            "Removed {} {} from ({}, {})",
            record.definition, record.id, record.footprint.origin.x, record.footprint.origin.y
        );
        Some(PlacementEvent::Removed {
            entity,
            id: record.id,
            footprint: record.footprint,
        })
    }
}

/// Appearance data for a placed object's model.
#[derive(Component, Debug, Clone, Copy)]
pub struct ObjectAppearance {
    pub color: Color,
}

/// [`PlacementWorld`] backed by the ECS: records are entities.
pub struct EcsPlacementWorld<'a, 'w, 's, 'q> {
    pub commands: &'a mut Commands<'w, 's>,
    pub objects: &'a Query<'a, 'a, (Entity, &'q PlacedObject)>,
}

impl PlacementWorld for EcsPlacementWorld<'_, '_, '_, '_> {
    fn spawn_placed(
        &mut self,
        record: PlacedObject,
        definition: &PlaceableDefinition,
        at: Vec3,
    ) -> Entity {
        let [r, g, b, a] = definition.color;
        self.commands
            .spawn((
                Name::new(format!("{} {}", definition.name, record.id)),
                record,
                ObjectAppearance {
                    color: Color::srgba(r, g, b, a),
                },
                Transform::from_translation(at),
                Visibility::default(),
            ))
            .id()
    }

    fn placed_object(&self, entity: Entity) -> Option<PlacedObject> {
        self.objects.get(entity).ok().map(|(_, obj)| obj.clone())
    }

    fn despawn_placed(&mut self, entity: Entity) {
        self.commands.entity(entity).despawn_recursive();
    }
}
