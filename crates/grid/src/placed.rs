use bevy::prelude::*;

use crate::footprint::{Footprint, PlacementId};
use crate::inventory::PlaceableId;
use crate::occupancy::GridGeometry;

/// Record of something standing on the grid. The entity holding it is the
/// record's slot; the grid cells only carry its `id`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: PlacementId,
    pub footprint: Footprint,
    pub definition: PlaceableId,
    pub height: f32,
}

impl PlacedObject {
    /// World-space box used for picking.
    pub fn world_bounds(&self, geometry: &GridGeometry) -> (Vec3, Vec3) {
        geometry.footprint_bounds(&self.footprint, self.height)
    }
}
