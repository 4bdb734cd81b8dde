use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
/// Orbit control sensitivity and zoom limits.
pub struct ControllerOptions {
    /// Radians of rotation per pixel of drag.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.05), extend("step" = 0.001))]
    pub rotate_speed: f32,
    /// Fraction of the distance covered per wheel step.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Closest allowed eye distance.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest allowed eye distance.
    #[schemars(skip)]
    pub max_distance: f32,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            rotate_speed: 0.01,
            zoom_speed: 0.05,
            min_distance: 1.0,
            max_distance: 5000.0,
        }
    }
}
