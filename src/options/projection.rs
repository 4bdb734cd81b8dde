use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::projection::ProjectionKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Projection", inline)]
#[serde(default)]
/// Projection kind and parameters.
pub struct ProjectionOptions {
    /// Orthographic or perspective.
    #[schemars(title = "Kind")]
    pub kind: ProjectionKind,
    /// Orthographic half-extent.
    #[schemars(title = "Size", range(min = 1.0, max = 1000.0), extend("step" = 1.0))]
    pub size: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub near: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub far: f32,
    /// Horizontal field of view in degrees.
    #[schemars(title = "Horizontal FOV", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub x_fov: f32,
    /// Vertical field of view in degrees.
    #[schemars(title = "Vertical FOV", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub y_fov: f32,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::Orthographic,
            size: 100.0,
            near: 1.0,
            far: 1000.0,
            x_fov: 60.0,
            y_fov: 45.0,
        }
    }
}
