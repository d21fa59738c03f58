use std::fmt;

use bevy::prelude::*;

/// Handle stored in every occupied cell, naming the placement that covers it.
///
/// Issued by [`Grid::occupy`](crate::occupancy::Grid::occupy); never reused
/// within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacementId(pub u64);

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Panics unless both axes of `size` are at least one cell.
///
/// A zero-sized footprint is a caller bug, not an interactive outcome.
#[inline]
#[track_caller]
pub fn assert_footprint_size(size: UVec2) {
    assert!(
        size.x > 0 && size.y > 0,
        "footprint size must be positive on both axes, got {}x{}",
        size.x,
        size.y
    );
}

/// Rectangle of cells: `origin` is the bottom-left cell, `size` the extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub origin: IVec2,
    pub size: UVec2,
}

impl Footprint {
    #[track_caller]
    pub fn new(origin: IVec2, size: UVec2) -> Self {
        assert_footprint_size(size);
        Self { origin, size }
    }

    pub fn area(&self) -> usize {
        self.size.x as usize * self.size.y as usize
    }

    /// Exclusive upper corner.
    pub fn end(&self) -> IVec2 {
        self.origin + self.size.as_ivec2()
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        let end = self.end();
        cell.x >= self.origin.x && cell.y >= self.origin.y && cell.x < end.x && cell.y < end.y
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        let (a_end, b_end) = (self.end(), other.end());
        self.origin.x < b_end.x
            && other.origin.x < a_end.x
            && self.origin.y < b_end.y
            && other.origin.y < a_end.y
    }

    pub fn cells(&self) -> impl Iterator<Item = IVec2> {
        let Footprint { origin, size } = *self;
        (0..size.y as i32)
            .flat_map(move |dy| (0..size.x as i32).map(move |dx| origin + IVec2::new(dx, dy)))
    }
}
