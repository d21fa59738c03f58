//! Pick queries: which UI, grid cell or placed object lies under the pointer.
//!
//! The controller only sees the [`PickSource`] trait. [`WorldPicker`] answers
//! it analytically from one ray per frame: the ground plane for cells and a
//! slab test against each placed object's box.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use grid::config::{GridSettings, PickOrigin};
use grid::occupancy::GridGeometry;

/// Layers a pick can be made against, in the order the controller asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickLayer {
    Ui,
    BuildSurface,
    PlacedObjects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    Ui,
    /// Linear (row-major) index of the grid cell.
    Cell {
        index: usize,
    },
    Object(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub point: Vec3,
    pub target: PickTarget,
}

pub trait PickSource {
    fn pick(&self, layer: PickLayer) -> Option<PickHit>;
}

/// World-space ray for this frame, if the pointer is over the window.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PickRay(pub Option<Ray3d>);

/// Whether a UI panel owns the pointer this frame.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PointerOverUi(pub bool);

pub struct WorldPicker {
    pub ray: Option<Ray3d>,
    pub pointer_over_ui: bool,
    pub geometry: GridGeometry,
    /// `(entity, min, max)` box of every placed object.
    pub objects: Vec<(Entity, Vec3, Vec3)>,
}

impl WorldPicker {
    pub fn new(ray: Option<Ray3d>, pointer_over_ui: bool, geometry: GridGeometry) -> Self {
        Self {
            ray,
            pointer_over_ui,
            geometry,
            objects: Vec::new(),
        }
    }

    pub fn with_objects(mut self, objects: impl IntoIterator<Item = (Entity, Vec3, Vec3)>) -> Self {
        self.objects.extend(objects);
        self
    }

    fn pick_cell(&self, ray: &Ray3d) -> Option<PickHit> {
        let point = ray_plane_hit(ray, self.geometry.origin.y)?;
        let cell = self.geometry.world_to_cell(point)?;
        let index = self.geometry.index_of(cell)?;
        Some(PickHit {
            point,
            target: PickTarget::Cell { index },
        })
    }

    fn pick_object(&self, ray: &Ray3d) -> Option<PickHit> {
        self.objects
            .iter()
            .filter_map(|&(entity, min, max)| ray_aabb_hit(ray, min, max).map(|t| (t, entity)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, entity)| PickHit {
                point: ray.get_point(t),
                target: PickTarget::Object(entity),
            })
    }
}

impl PickSource for WorldPicker {
    fn pick(&self, layer: PickLayer) -> Option<PickHit> {
        match layer {
            PickLayer::Ui => self.pointer_over_ui.then(|| PickHit {
                point: self.ray.map_or(Vec3::ZERO, |r| r.origin),
                target: PickTarget::Ui,
            }),
            PickLayer::BuildSurface => self.pick_cell(self.ray.as_ref()?),
            PickLayer::PlacedObjects => self.pick_object(self.ray.as_ref()?),
        }
    }
}

/// Where `ray` crosses the horizontal plane `y = height`, in front of it.
pub fn ray_plane_hit(ray: &Ray3d, height: f32) -> Option<Vec3> {
    if ray.direction.y.abs() <= 0.001 {
        return None;
    }
    let t = (height - ray.origin.y) / ray.direction.y;
    (t > 0.0).then(|| ray.get_point(t))
}

/// Distance along `ray` to the box `[min, max]`, or `None` on a miss.
/// A ray starting inside the box hits at 0. Faces count as part of the box,
/// so a ray running along a face shared by two boxes hits both.
pub fn ray_aabb_hit(ray: &Ray3d, min: Vec3, max: Vec3) -> Option<f32> {
    let origin = ray.origin;
    let dir: Vec3 = *ray.direction;
    let mut near = f32::NEG_INFINITY;
    let mut far = f32::INFINITY;

    for axis in 0..3 {
        if dir[axis] == 0.0 {
            // Parallel to this slab: the origin alone decides.
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = dir[axis].recip();
        let t1 = (min[axis] - origin[axis]) * inv;
        let t2 = (max[axis] - origin[axis]) * inv;
        near = near.max(t1.min(t2));
        far = far.min(t1.max(t2));
    }

    if far < 0.0 || near > far {
        return None;
    }
    Some(near.max(0.0))
}

/// Rebuild [`PickRay`] from the camera, through the cursor or straight ahead
/// depending on [`GridSettings::pick_origin`].
pub fn update_pick_ray(
    settings: Res<GridSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut pick_ray: ResMut<PickRay>,
) {
    pick_ray.0 = None;
    let Ok((camera, cam_transform)) = camera_q.get_single() else {
        return;
    };

    pick_ray.0 = match settings.pick_origin {
        PickOrigin::CameraForward => Some(Ray3d::new(
            cam_transform.translation(),
            cam_transform.forward(),
        )),
        PickOrigin::Cursor => {
            let Ok(window) = windows.get_single() else {
                return;
            };
            window
                .cursor_position()
                .and_then(|pos| camera.viewport_to_world(cam_transform, pos).ok())
        }
    };
}
