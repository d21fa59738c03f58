use bevy::prelude::*;

pub mod config;
pub mod error;
pub mod footprint;
pub mod inventory;
pub mod occupancy;
pub mod placed;

#[cfg(test)]
mod occupancy_tests;

use config::GridSettings;
use inventory::{Inventory, Pager};
use occupancy::Grid;

/// Builds the [`Grid`] and [`Inventory`] resources from [`GridSettings`].
///
/// Insert `GridSettings` before adding the plugin to override the defaults.
pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<GridSettings>()
            .cloned()
            .unwrap_or_default();

        let grid = match Grid::from_settings(&settings) {
            Ok(grid) => grid,
            Err(e) => {
                error!("Invalid grid settings, using defaults: {e}");
                Grid::default()
            }
        };
        info!(
            "Grid {}x{} cells of {} at {}",
            grid.width(),
            grid.height(),
            grid.cell_size(),
            grid.origin()
        );

        let inventory = Inventory::from_definitions(settings.valid_placeables());
        for def in inventory.entries() {
            if !grid.footprint_fits_anywhere(def.footprint) {
                warn!(
                    "Placeable '{}' ({}x{}) is larger than the grid and can never be placed",
                    def.id, def.footprint.x, def.footprint.y
                );
            }
        }

        app.insert_resource(settings)
            .insert_resource(grid)
            .insert_resource(inventory)
            .init_resource::<Pager>();
    }
}
