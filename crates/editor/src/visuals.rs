//! Tile and object appearance, derived from the grid and controller state.
//!
//! Nothing here is stored state: every refresh recomputes the visual of each
//! tile and object from the occupancy matrix and the controller, and only
//! runs when the controller's revision moved.

use bevy::prelude::*;

use grid::config::TILE_THICKNESS;
use grid::occupancy::Grid;
use grid::placed::PlacedObject;

use crate::controller::{ObjectAppearance, PlacementController};
use crate::mode::BuildMode;

const NORMAL_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
const OCCUPIED_COLOR: Color = Color::srgba(0.35, 0.35, 0.35, 0.5);
const VACANT_COLOR: Color = Color::srgba(0.2, 0.85, 0.3, 0.6);
const OBSTRUCTED_COLOR: Color = Color::srgba(0.9, 0.2, 0.15, 0.6);
const SELECTED_COLOR: Color = Color::srgb(0.2, 0.7, 1.0);

/// Gap left between neighbouring tiles, as a fraction of the cell size.
const TILE_GAP: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVisual {
    Normal,
    Occupied,
    Vacant,
    Obstructed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectVisual {
    Normal,
    Selected,
}

/// Appearance of cell `(x, y)`.
///
/// Cells under the hovered footprint show whether the whole footprint is free;
/// everything else shows plain occupancy.
pub fn cell_visual(grid: &Grid, controller: &PlacementController, x: u32, y: u32) -> CellVisual {
    let cell = IVec2::new(x as i32, y as i32);
    if let Some(footprint) = controller.hovered_footprint() {
        if footprint.contains(cell) {
            return if grid.is_region_free(footprint.origin, footprint.size) {
                CellVisual::Vacant
            } else {
                CellVisual::Obstructed
            };
        }
    }
    if grid.is_occupied(cell.x, cell.y) {
        CellVisual::Occupied
    } else {
        CellVisual::Normal
    }
}

pub fn object_visual(controller: &PlacementController, entity: Entity) -> ObjectVisual {
    let selected = controller.is_active()
        && controller.mode() == BuildMode::Demolish
        && controller.hovered_object() == Some(entity);
    if selected {
        ObjectVisual::Selected
    } else {
        ObjectVisual::Normal
    }
}

// ---------------------------------------------------------------------------
// Render-side components and assets
// ---------------------------------------------------------------------------

/// Parent of every cell tile; hidden while the editor is off.
#[derive(Component)]
pub struct GridTiles;

#[derive(Component)]
pub struct CellTile {
    pub index: usize,
}

/// Mesh child of a placed object, with the material it shows when not
/// highlighted.
#[derive(Component)]
pub struct ObjectBody {
    pub base: Handle<StandardMaterial>,
}

#[derive(Resource)]
pub struct EditorMaterials {
    pub normal: Handle<StandardMaterial>,
    pub occupied: Handle<StandardMaterial>,
    pub vacant: Handle<StandardMaterial>,
    pub obstructed: Handle<StandardMaterial>,
    pub selected: Handle<StandardMaterial>,
}

impl EditorMaterials {
    pub fn cell(&self, visual: CellVisual) -> &Handle<StandardMaterial> {
        match visual {
            CellVisual::Normal => &self.normal,
            CellVisual::Occupied => &self.occupied,
            CellVisual::Vacant => &self.vacant,
            CellVisual::Obstructed => &self.obstructed,
        }
    }
}

fn overlay_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    }
}

pub fn spawn_grid_tiles(
    mut commands: Commands,
    grid: Res<Grid>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let editor_materials = EditorMaterials {
        normal: materials.add(overlay_material(NORMAL_COLOR)),
        occupied: materials.add(overlay_material(OCCUPIED_COLOR)),
        vacant: materials.add(overlay_material(VACANT_COLOR)),
        obstructed: materials.add(overlay_material(OBSTRUCTED_COLOR)),
        selected: materials.add(StandardMaterial {
            base_color: SELECTED_COLOR,
            emissive: LinearRgba::rgb(0.1, 0.35, 0.5),
            ..default()
        }),
    };

    let geometry = grid.geometry();
    let side = geometry.cell_size * (1.0 - TILE_GAP);
    let tile_mesh = meshes.add(Cuboid::new(side, TILE_THICKNESS, side));
    let half = Vec3::new(
        geometry.cell_size * 0.5,
        TILE_THICKNESS * 0.5,
        geometry.cell_size * 0.5,
    );

    commands
        .spawn((
            GridTiles,
            Name::new("Grid tiles"),
            Transform::default(),
            Visibility::Hidden,
        ))
        .with_children(|parent| {
            for index in 0..geometry.len() {
                let Some(cell) = geometry.cell_from_index(index) else {
                    continue;
                };
                parent.spawn((
                    CellTile { index },
                    Mesh3d(tile_mesh.clone()),
                    MeshMaterial3d(editor_materials.normal.clone()),
                    Transform::from_translation(geometry.cell_to_world(cell.x, cell.y) + half),
                ));
            }
        });

    commands.insert_resource(editor_materials);
}

/// Give newly placed objects a box mesh covering their footprint.
pub fn attach_object_meshes(
    mut commands: Commands,
    grid: Res<Grid>,
    added: Query<(Entity, &PlacedObject, &ObjectAppearance), Added<PlacedObject>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let cell_size = grid.cell_size();
    for (entity, object, appearance) in &added {
        let size = Vec3::new(
            object.footprint.size.x as f32 * cell_size,
            object.height,
            object.footprint.size.y as f32 * cell_size,
        );
        let base = materials.add(StandardMaterial {
            base_color: appearance.color,
            ..default()
        });
        let mesh = meshes.add(Cuboid::from_size(size));
        commands.entity(entity).with_children(|parent| {
            parent.spawn((
                ObjectBody { base: base.clone() },
                Mesh3d(mesh),
                MeshMaterial3d(base),
                Transform::from_translation(size * 0.5),
            ));
        });
    }
}

pub fn refresh_cell_visuals(
    controller: Res<PlacementController>,
    grid: Res<Grid>,
    materials: Option<Res<EditorMaterials>>,
    mut last_revision: Local<Option<u64>>,
    mut roots: Query<&mut Visibility, With<GridTiles>>,
    mut tiles: Query<(&CellTile, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let Some(materials) = materials else {
        return;
    };
    if *last_revision == Some(controller.revision()) {
        return;
    }
    *last_revision = Some(controller.revision());

    for mut visibility in &mut roots {
        *visibility = if controller.is_active() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    let geometry = grid.geometry();
    for (tile, mut material) in &mut tiles {
        let Some(cell) = geometry.cell_from_index(tile.index) else {
            continue;
        };
        let wanted = materials.cell(cell_visual(&grid, &controller, cell.x, cell.y));
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

pub fn refresh_object_visuals(
    controller: Res<PlacementController>,
    materials: Option<Res<EditorMaterials>>,
    mut last_revision: Local<Option<u64>>,
    mut bodies: Query<(&Parent, &ObjectBody, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let Some(materials) = materials else {
        return;
    };
    if *last_revision == Some(controller.revision()) {
        return;
    }
    *last_revision = Some(controller.revision());

    for (parent, body, mut material) in &mut bodies {
        let wanted = match object_visual(&controller, parent.get()) {
            ObjectVisual::Normal => &body.base,
            ObjectVisual::Selected => &materials.selected,
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}
