//! Randomized place/remove interleavings checked against a shadow model.

use std::collections::HashMap;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::footprint::{Footprint, PlacementId};
use crate::occupancy::Grid;

const SEEDS: [u64; 4] = [1, 7, 42, 1234];
const STEPS: usize = 400;

fn random_footprint(rng: &mut ChaCha8Rng) -> Footprint {
    // Origins range a little past the edges so out-of-bounds requests happen.
    let origin = IVec2::new(rng.gen_range(-1..5), rng.gen_range(-1..5));
    let size = UVec2::new(rng.gen_range(1..=3), rng.gen_range(1..=3));
    Footprint::new(origin, size)
}

/// Every occupied cell belongs to exactly one live record and every record's
/// cells hold its id.
fn assert_consistent(grid: &Grid, live: &HashMap<PlacementId, Footprint>) {
    let mut expected = 0;
    for (id, fp) in live {
        for cell in fp.cells() {
            assert_eq!(grid.occupant(cell.x, cell.y), Some(*id));
        }
        assert_eq!(grid.cells_held_by(*id), fp.area());
        expected += fp.area();
    }
    assert_eq!(grid.occupied_count(), expected);
}

#[test]
fn test_random_place_remove_keeps_matrix_consistent() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = Grid::new(Vec3::ZERO, 1.0, 4, 4).unwrap();
        let mut live: HashMap<PlacementId, Footprint> = HashMap::new();

        for _ in 0..STEPS {
            if live.is_empty() || rng.gen_bool(0.6) {
                let fp = random_footprint(&mut rng);
                let fits = grid.geometry().contains_region(fp.origin, fp.size)
                    && live.values().all(|other| !other.overlaps(&fp));
                assert_eq!(grid.is_region_free(fp.origin, fp.size), fits);
                match grid.occupy(fp.origin, fp.size) {
                    Some(id) => {
                        assert!(fits, "seed {seed}: occupied an unfit region {fp:?}");
                        assert!(!live.contains_key(&id));
                        live.insert(id, fp);
                    }
                    None => assert!(!fits, "seed {seed}: refused a free region {fp:?}"),
                }
            } else {
                let pick = rng.gen_range(0..live.len());
                let id = *live.keys().nth(pick).unwrap();
                let fp = live.remove(&id).unwrap();
                assert_eq!(grid.release(id, &fp), fp.area());
            }
            assert_consistent(&grid, &live);
        }
    }
}

#[test]
fn test_removing_everything_returns_to_empty() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut grid = Grid::new(Vec3::ZERO, 1.0, 4, 4).unwrap();
    let mut live = Vec::new();
    for _ in 0..64 {
        let fp = random_footprint(&mut rng);
        if let Some(id) = grid.occupy(fp.origin, fp.size) {
            live.push((id, fp));
        }
    }
    assert!(!live.is_empty());
    for (_, fp) in &live {
        grid.vacate(fp.origin, fp.size);
    }
    assert_eq!(grid.occupied_count(), 0);
    assert!(grid.is_region_free(IVec2::ZERO, UVec2::new(4, 4)));
}
