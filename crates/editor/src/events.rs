use bevy::prelude::*;

use grid::footprint::{Footprint, PlacementId};
use grid::inventory::PlaceableId;

use crate::mode::BuildMode;

/// A committed change to the grid.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    Placed {
        entity: Entity,
        id: PlacementId,
        definition: PlaceableId,
        footprint: Footprint,
    },
    Removed {
        entity: Entity,
        id: PlacementId,
        footprint: Footprint,
    },
}

/// Pick a placeable from the inventory for building. `None` clears the
/// selection.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SelectPlaceable(pub Option<PlaceableId>);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetEditorMode(pub BuildMode);

/// Switch the editing session on or off.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetEditorActive(pub bool);
