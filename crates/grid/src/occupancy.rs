use bevy::prelude::*;

use crate::config::{GridSettings, DEFAULT_CELL_SIZE, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
use crate::error::GridError;
use crate::footprint::{assert_footprint_size, Footprint, PlacementId};

/// Row-major index of cell `(x, y)` in a grid `width` cells wide.
#[inline]
pub fn linear_index(width: usize, x: usize, y: usize) -> usize {
    y * width + x
}

/// Inverse of [`linear_index`]. Needs only the width.
#[inline]
pub fn cell_from_linear_index(width: usize, index: usize) -> (usize, usize) {
    (index % width, index / width)
}

/// Fixed shape of the build area: where it sits, how big a cell is, how many
/// cells it has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub origin: Vec3,
    pub cell_size: f32,
    pub width: usize,
    pub height: usize,
}

impl GridGeometry {
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// True when the whole rectangle `[origin, origin + size)` lies inside the
    /// grid. Computed in i64 so huge sizes cannot wrap around.
    pub fn contains_region(&self, origin: IVec2, size: UVec2) -> bool {
        let (x0, y0) = (origin.x as i64, origin.y as i64);
        let (x1, y1) = (x0 + size.x as i64, y0 + size.y as i64);
        x0 >= 0 && y0 >= 0 && x1 <= self.width as i64 && y1 <= self.height as i64
    }

    pub fn index_of(&self, cell: UVec2) -> Option<usize> {
        let (x, y) = (cell.x as usize, cell.y as usize);
        (x < self.width && y < self.height).then(|| linear_index(self.width, x, y))
    }

    pub fn cell_from_index(&self, index: usize) -> Option<UVec2> {
        if index >= self.len() {
            return None;
        }
        let (x, y) = cell_from_linear_index(self.width, index);
        Some(UVec2::new(x as u32, y as u32))
    }

    /// World position of a cell's minimum corner on the ground plane.
    pub fn cell_to_world(&self, x: u32, y: u32) -> Vec3 {
        self.origin + Vec3::new(x as f32 * self.cell_size, 0.0, y as f32 * self.cell_size)
    }

    /// Cell under a ground-plane point, if any.
    pub fn world_to_cell(&self, point: Vec3) -> Option<UVec2> {
        let local = point - self.origin;
        let gx = (local.x / self.cell_size).floor();
        let gy = (local.z / self.cell_size).floor();
        if !gx.is_finite() || !gy.is_finite() {
            return None;
        }
        let (gx, gy) = (gx as i64, gy as i64);
        self.in_bounds(gx, gy).then(|| UVec2::new(gx as u32, gy as u32))
    }

    /// Axis-aligned box `(min, max)` around a footprint standing `height` tall.
    pub fn footprint_bounds(&self, footprint: &Footprint, height: f32) -> (Vec3, Vec3) {
        let min = self.origin
            + Vec3::new(
                footprint.origin.x as f32 * self.cell_size,
                0.0,
                footprint.origin.y as f32 * self.cell_size,
            );
        let extent = Vec3::new(
            footprint.size.x as f32 * self.cell_size,
            height,
            footprint.size.y as f32 * self.cell_size,
        );
        (min, min + extent)
    }

    /// World-space size of the whole grid on the ground plane.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
        )
    }
}

/// Occupancy matrix for the build area.
///
/// Every cell is either free or holds the [`PlacementId`] of the placed object
/// covering it. Cells only become occupied through [`Grid::occupy`] and only
/// become free through [`Grid::vacate`] or [`Grid::release`].
#[derive(Resource, Debug, Clone)]
pub struct Grid {
    geometry: GridGeometry,
    cells: Vec<Option<PlacementId>>,
    next_id: u64,
}

impl Default for Grid {
    fn default() -> Self {
        let geometry = GridGeometry {
            origin: Vec3::ZERO,
            cell_size: DEFAULT_CELL_SIZE,
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        };
        Self {
            cells: vec![None; geometry.len()],
            geometry,
            next_id: 1,
        }
    }
}

impl Grid {
    pub fn new(origin: Vec3, cell_size: f32, width: usize, height: usize) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        let dims_err = || GridError::InvalidDimensions { width, height };
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(dims_err());
        }
        let len = width.checked_mul(height).ok_or_else(dims_err)?;
        Ok(Self {
            geometry: GridGeometry {
                origin,
                cell_size,
                width,
                height,
            },
            cells: vec![None; len],
            next_id: 1,
        })
    }

    pub fn from_settings(settings: &GridSettings) -> Result<Self, GridError> {
        Self::new(
            settings.origin(),
            settings.cell_size,
            settings.width,
            settings.height,
        )
    }

    #[inline]
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.geometry.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.geometry.origin
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.geometry.in_bounds(x as i64, y as i64)
    }

    /// Placement covering `(x, y)`; `None` for free or out-of-bounds cells.
    pub fn occupant(&self, x: i32, y: i32) -> Option<PlacementId> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells[linear_index(self.width(), x as usize, y as usize)]
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.occupant(x, y).is_some()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of cells currently holding `id`.
    pub fn cells_held_by(&self, id: PlacementId) -> usize {
        self.cells.iter().filter(|c| **c == Some(id)).count()
    }

    /// Whether a footprint of this size fits inside the grid at all,
    /// ignoring occupancy.
    pub fn footprint_fits_anywhere(&self, size: UVec2) -> bool {
        assert_footprint_size(size);
        (size.x as usize) <= self.width() && (size.y as usize) <= self.height()
    }

    /// True iff every cell of `[origin, origin + size)` is in bounds and free.
    ///
    /// # Panics
    /// If either axis of `size` is zero.
    pub fn is_region_free(&self, origin: IVec2, size: UVec2) -> bool {
        assert_footprint_size(size);
        if !self.geometry.contains_region(origin, size) {
            return false;
        }
        self.region_indices(origin, size)
            .all(|i| self.cells[i].is_none())
    }

    /// Mark the region with a fresh id if it is in bounds and free.
    ///
    /// Returns `None` with no mutation otherwise.
    ///
    /// # Panics
    /// If either axis of `size` is zero.
    pub fn occupy(&mut self, origin: IVec2, size: UVec2) -> Option<PlacementId> {
        if !self.is_region_free(origin, size) {
            return None;
        }
        let id = PlacementId(self.next_id);
        self.next_id += 1;
        for i in self.region_indices(origin, size).collect::<Vec<_>>() {
            self.cells[i] = Some(id);
        }
        Some(id)
    }

    /// Clear every in-bounds cell of the region, whoever holds it.
    ///
    /// # Panics
    /// If either axis of `size` is zero.
    pub fn vacate(&mut self, origin: IVec2, size: UVec2) {
        assert_footprint_size(size);
        for i in self.region_indices(origin, size).collect::<Vec<_>>() {
            self.cells[i] = None;
        }
    }

    /// Clear the cells of `footprint` that hold `id` and return how many were
    /// cleared. Cells held by other placements are left alone.
    ///
    /// If the footprint and the matrix disagree, any stray cells still holding
    /// `id` elsewhere are cleared as well so the id never outlives its record.
    pub fn release(&mut self, id: PlacementId, footprint: &Footprint) -> usize {
        assert_footprint_size(footprint.size);
        let mut cleared = 0;
        for i in self
            .region_indices(footprint.origin, footprint.size)
            .collect::<Vec<_>>()
        {
            if self.cells[i] == Some(id) {
                self.cells[i] = None;
                cleared += 1;
            }
        }
        if cleared != footprint.area() {
            warn!(
                "Placement {id} held {cleared} of {} cells in its recorded footprint",
                footprint.area()
            );
            for cell in self.cells.iter_mut().filter(|c| **c == Some(id)) {
                *cell = None;
                cleared += 1;
            }
        }
        cleared
    }

    #[inline]
    pub fn cell_to_world(&self, x: u32, y: u32) -> Vec3 {
        self.geometry.cell_to_world(x, y)
    }

    pub fn world_to_cell(&self, point: Vec3) -> Option<UVec2> {
        self.geometry.world_to_cell(point)
    }

    /// Indices of the in-bounds part of a region.
    fn region_indices(&self, origin: IVec2, size: UVec2) -> impl Iterator<Item = usize> {
        let width = self.width();
        let clip = |lo: i64, len: u32, max: usize| {
            let start = lo.clamp(0, max as i64) as usize;
            let end = (lo + len as i64).clamp(0, max as i64) as usize;
            start..end
        };
        let xs = clip(origin.x as i64, size.x, width);
        let ys = clip(origin.y as i64, size.y, self.height());
        ys.flat_map(move |y| xs.clone().map(move |x| linear_index(width, x, y)))
    }
}
