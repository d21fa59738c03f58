//! Orbit camera around the build area.
//!
//! Middle drag pans, right drag orbits, the wheel zooms and WASD/arrows pan.
//! Mouse controls are ignored while a UI panel owns the pointer.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;

use grid::occupancy::{Grid, GridGeometry};

use crate::pick::PointerOverUi;

const KEY_PAN_SPEED: f32 = 0.75;
const DRAG_PAN_SPEED: f32 = 0.002;
const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_STEP: f32 = 0.15;
const MIN_DISTANCE: f32 = 3.0;
const MIN_PITCH: f32 = 10.0 * std::f32::consts::PI / 180.0;
const MAX_PITCH: f32 = 85.0 * std::f32::consts::PI / 180.0;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Ground point the camera looks at
    pub focus: Vec3,
    pub yaw: f32,
    /// Elevation above the ground plane, in radians
    pub pitch: f32,
    pub distance: f32,
    /// Zoom-out limit, scaled to the grid
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Looking down at the middle of the grid from far enough to see all of it.
    pub fn framing(geometry: &GridGeometry) -> Self {
        let extent = geometry.extent();
        let max_distance = (extent.max_element() * 4.0).max(MIN_DISTANCE * 2.0);
        Self {
            focus: geometry.origin + Vec3::new(extent.x * 0.5, 0.0, extent.y * 0.5),
            yaw: 0.0,
            pitch: 55.0_f32.to_radians(),
            distance: (extent.max_element() * 1.2).clamp(MIN_DISTANCE, max_distance),
            max_distance,
        }
    }

    /// Camera position and look-at target.
    pub fn eye(&self) -> (Vec3, Vec3) {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let offset = Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
        (self.focus + offset * self.distance, self.focus)
    }

    pub fn transform(&self) -> Transform {
        let (eye, target) = self.eye();
        Transform::from_translation(eye).looking_at(target, Vec3::Y)
    }

    /// Move the focus by a screen-space offset, measured in focus distances,
    /// and keep it within half a grid of the build area.
    pub fn pan(&mut self, screen: Vec2, geometry: &GridGeometry) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let ground = Vec2::new(
            screen.x * cos_yaw + screen.y * sin_yaw,
            -screen.x * sin_yaw + screen.y * cos_yaw,
        ) * self.distance;

        let extent = geometry.extent();
        let start = Vec2::new(geometry.origin.x, geometry.origin.z) - extent * 0.5;
        let end = start + extent * 2.0;
        self.focus.x = (self.focus.x + ground.x).clamp(start.x, end.x);
        self.focus.z = (self.focus.z + ground.y).clamp(start.y, end.y);
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw += delta.x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Positive steps zoom in.
    pub fn zoom(&mut self, steps: f32) {
        self.distance =
            (self.distance * (1.0 - steps * ZOOM_STEP)).clamp(MIN_DISTANCE, self.max_distance);
    }
}

/// Screen-space direction held on the keyboard, `-y` being away from the viewer.
fn held_pan_direction(keys: &ButtonInput<KeyCode>) -> Vec2 {
    let axis = |neg: [KeyCode; 2], pos: [KeyCode; 2]| {
        let held = |pair: [KeyCode; 2]| keys.any_pressed(pair) as i8 as f32;
        held(pos) - held(neg)
    };
    Vec2::new(
        axis(
            [KeyCode::KeyA, KeyCode::ArrowLeft],
            [KeyCode::KeyD, KeyCode::ArrowRight],
        ),
        axis(
            [KeyCode::KeyW, KeyCode::ArrowUp],
            [KeyCode::KeyS, KeyCode::ArrowDown],
        ),
    )
    .normalize_or_zero()
}

pub fn setup_camera(mut commands: Commands, grid: Res<Grid>) {
    let orbit = OrbitCamera::framing(&grid.geometry());
    commands.spawn((Camera3d::default(), orbit.transform()));
    commands.insert_resource(orbit);
}

pub fn camera_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    grid: Res<Grid>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let dir = held_pan_direction(&keys);
    if dir != Vec2::ZERO {
        orbit.pan(dir * KEY_PAN_SPEED * time.delta_secs(), &grid.geometry());
    }
}

pub fn camera_mouse(
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    over_ui: Res<PointerOverUi>,
    grid: Res<Grid>,
    mut orbit: ResMut<OrbitCamera>,
) {
    if over_ui.0 {
        return;
    }
    if motion.delta != Vec2::ZERO {
        if buttons.pressed(MouseButton::Middle) {
            orbit.pan(-motion.delta * DRAG_PAN_SPEED, &grid.geometry());
        } else if buttons.pressed(MouseButton::Right) {
            orbit.orbit(motion.delta);
        }
    }
    if scroll.delta.y != 0.0 {
        let steps = match scroll.unit {
            MouseScrollUnit::Line => scroll.delta.y,
            MouseScrollUnit::Pixel => scroll.delta.y / 100.0,
        };
        orbit.zoom(steps);
    }
}

pub fn sync_camera_transform(
    orbit: Res<OrbitCamera>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    for mut transform in &mut cameras {
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> GridGeometry {
        GridGeometry {
            origin: Vec3::ZERO,
            cell_size: 2.0,
            width: 10,
            height: 10,
        }
    }

    #[test]
    fn test_framing_centers_on_grid() {
        let orbit = OrbitCamera::framing(&geometry());
        assert_eq!(orbit.focus, Vec3::new(10.0, 0.0, 10.0));
        assert!(orbit.distance >= MIN_DISTANCE && orbit.distance <= orbit.max_distance);
    }

    #[test]
    fn test_eye_sits_above_focus_at_distance() {
        let orbit = OrbitCamera::framing(&geometry());
        let (eye, target) = orbit.eye();
        assert_eq!(target, orbit.focus);
        assert!(eye.y > 0.0);
        assert!(((eye - target).length() - orbit.distance).abs() < 1e-3);
    }

    #[test]
    fn test_pan_is_clamped_near_grid() {
        let mut orbit = OrbitCamera::framing(&geometry());
        orbit.pan(Vec2::new(-100.0, 100.0), &geometry());
        assert_eq!(orbit.focus, Vec3::new(-10.0, 0.0, 30.0));
    }

    #[test]
    fn test_pan_follows_yaw() {
        let mut orbit = OrbitCamera::framing(&geometry());
        orbit.distance = 1.0;
        orbit.yaw = std::f32::consts::FRAC_PI_2;
        orbit.pan(Vec2::new(1.0, 0.0), &geometry());
        assert!((orbit.focus.x - 10.0).abs() < 1e-4);
        assert!((orbit.focus.z - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_and_zoom_respect_limits() {
        let mut orbit = OrbitCamera::framing(&geometry());
        orbit.orbit(Vec2::new(0.0, -10_000.0));
        assert_eq!(orbit.pitch, MAX_PITCH);
        orbit.zoom(100.0);
        assert_eq!(orbit.distance, MIN_DISTANCE);
        orbit.zoom(-100.0);
        assert_eq!(orbit.distance, orbit.max_distance);
    }

    #[test]
    fn test_held_keys_give_unit_direction() {
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(held_pan_direction(&keys), Vec2::ZERO);
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::ArrowRight);
        let dir = held_pan_direction(&keys);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x > 0.0 && dir.y < 0.0);
    }
}
