//! Build-area configuration.
//!
//! The constants are the defaults used when no settings file is supplied. A
//! [`GridSettings`] resource carries the values actually used for the session;
//! the app can load it from JSON before the grid is built.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::inventory::{PlaceableDefinition, PlaceableId};

pub const DEFAULT_GRID_WIDTH: usize = 10;
pub const DEFAULT_GRID_HEIGHT: usize = 10;
pub const DEFAULT_CELL_SIZE: f32 = 2.0;

/// Height of the box used to pick and draw a placed object when its
/// definition does not give one.
pub const DEFAULT_OBJECT_HEIGHT: f32 = 1.0;

/// Thickness of the per-cell tiles drawn on the ground plane.
pub const TILE_THICKNESS: f32 = 0.05;

/// Where the pick ray comes from each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickOrigin {
    /// Straight out of the camera's forward vector (screen center).
    CameraForward,
    /// Through the mouse cursor.
    #[default]
    Cursor,
}

fn default_color() -> [f32; 4] {
    [0.8, 0.8, 0.8, 1.0]
}

fn default_height() -> f32 {
    DEFAULT_OBJECT_HEIGHT
}

/// Serialized form of a placeable granted at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceableSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brief: String,
    #[serde(default)]
    pub description: String,
    /// Footprint in cells, `[width, height]`.
    pub footprint: [u32; 2],
    #[serde(default)]
    pub cost: u32,
    pub count: u32,
    /// sRGBA tint of the spawned model.
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default = "default_height")]
    pub height: f32,
}

impl PlaceableSpec {
    pub fn to_definition(&self) -> PlaceableDefinition {
        PlaceableDefinition {
            id: PlaceableId::new(self.id.clone()),
            name: self.name.clone(),
            brief: self.brief.clone(),
            description: self.description.clone(),
            footprint: UVec2::new(self.footprint[0], self.footprint[1]),
            cost: self.cost,
            count: self.count,
            color: self.color,
            height: self.height,
        }
    }

    fn validate(&self) -> Result<(), GridError> {
        let invalid = |reason: &'static str| GridError::InvalidPlaceable {
            id: self.id.clone(),
            reason,
        };
        if self.id.is_empty() {
            return Err(invalid("empty id"));
        }
        if self.footprint[0] == 0 || self.footprint[1] == 0 {
            return Err(invalid("footprint must be at least 1x1"));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(invalid("height must be positive"));
        }
        Ok(())
    }
}

/// Session configuration for the build area.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// World position of the grid's minimum corner.
    pub origin: [f32; 3],
    pub cell_size: f32,
    pub width: usize,
    pub height: usize,
    pub pick_origin: PickOrigin,
    pub starting_placeables: Vec<PlaceableSpec>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0, 0.0],
            cell_size: DEFAULT_CELL_SIZE,
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            pick_origin: PickOrigin::default(),
            starting_placeables: starter_placeables(),
        }
    }
}

impl GridSettings {
    pub fn origin(&self) -> Vec3 {
        Vec3::from_array(self.origin)
    }

    /// Check every value the grid and the inventory rely on.
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(self.cell_size));
        }
        if self.width == 0 || self.height == 0 {
            return Err(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        for spec in &self.starting_placeables {
            spec.validate()?;
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, GridError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Starting placeables that pass validation, in file order.
    pub fn valid_placeables(&self) -> impl Iterator<Item = PlaceableDefinition> + '_ {
        self.starting_placeables.iter().filter_map(|spec| match spec.validate() {
            Ok(()) => Some(spec.to_definition()),
            Err(e) => {
                warn!("Skipping starting placeable: {e}");
                None
            }
        })
    }
}

fn starter_placeables() -> Vec<PlaceableSpec> {
    let spec = |id: &str, name: &str, brief: &str, footprint, cost, count, color, height| PlaceableSpec {
        id: id.to_string(),
        name: name.to_string(),
        brief: brief.to_string(),
        description: String::new(),
        footprint,
        cost,
        count,
        color,
        height,
    };
    vec![
        spec("fence", "Fence", "Single post", [1, 1], 5, 8, [0.55, 0.4, 0.25, 1.0], 0.6),
        spec("shed", "Shed", "Small storage", [2, 1], 40, 3, [0.7, 0.3, 0.2, 1.0], 1.2),
        spec("greenhouse", "Greenhouse", "Grows seedlings", [2, 2], 60, 2, [0.5, 0.8, 0.6, 1.0], 1.5),
        spec("barn", "Barn", "Large storage", [3, 2], 120, 1, [0.6, 0.15, 0.1, 1.0], 2.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = GridSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.valid_placeables().count(), 4);
    }

    #[test]
    fn test_cost_carries_into_definitions() {
        let barn = GridSettings::default()
            .valid_placeables()
            .find(|def| def.id.as_str() == "barn")
            .unwrap();
        assert_eq!(barn.cost, 120);
    }

    #[test]
    fn test_json_fills_missing_fields_from_defaults() {
        let settings = GridSettings::from_json(r#"{ "width": 4, "height": 6 }"#).unwrap();
        assert_eq!(settings.width, 4);
        assert_eq!(settings.height, 6);
        assert!((settings.cell_size - DEFAULT_CELL_SIZE).abs() < f32::EPSILON);
        assert_eq!(settings.pick_origin, PickOrigin::Cursor);
    }

    #[test]
    fn test_json_pick_origin_is_snake_case() {
        let settings =
            GridSettings::from_json(r#"{ "pick_origin": "camera_forward" }"#).unwrap();
        assert_eq!(settings.pick_origin, PickOrigin::CameraForward);
    }

    #[test]
    fn test_json_rejects_zero_dimensions() {
        let err = GridSettings::from_json(r#"{ "width": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            GridError::InvalidDimensions {
                width: 0,
                height: DEFAULT_GRID_HEIGHT
            }
        ));
    }

    #[test]
    fn test_json_rejects_bad_cell_size() {
        let err = GridSettings::from_json(r#"{ "cell_size": -1.0 }"#).unwrap_err();
        assert!(matches!(err, GridError::InvalidCellSize(_)));
    }

    #[test]
    fn test_json_rejects_zero_footprint() {
        let text = r#"{ "starting_placeables": [
            { "id": "bad", "name": "Bad", "footprint": [0, 2], "count": 1 }
        ] }"#;
        let err = GridSettings::from_json(text).unwrap_err();
        assert!(matches!(err, GridError::InvalidPlaceable { .. }));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = GridSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, GridError::Parse(_)));
    }

    #[test]
    fn test_valid_placeables_skips_broken_specs() {
        let mut settings = GridSettings::default();
        settings.starting_placeables[0].footprint = [0, 1];
        let ids: Vec<_> = settings
            .valid_placeables()
            .map(|def| def.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["shed", "greenhouse", "barn"]);
    }

    #[test]
    fn test_spec_to_definition_copies_fields() {
        let def = GridSettings::default().starting_placeables[2].to_definition();
        assert_eq!(def.id.as_str(), "greenhouse");
        assert_eq!(def.footprint, UVec2::new(2, 2));
        assert_eq!(def.count, 2);
    }
}
