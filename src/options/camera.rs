use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Initial orbital camera placement.
pub struct CameraOptions {
    /// Angle around the vertical axis, in degrees.
    #[schemars(title = "Longitude", range(min = -180.0, max = 180.0), extend("step" = 1.0))]
    pub longitude: f32,
    /// Angle from the +Y pole, in degrees. 90 is the equator.
    #[schemars(title = "Latitude", range(min = 0.0, max = 180.0), extend("step" = 1.0))]
    pub latitude: f32,
    /// Eye distance from the origin.
    #[schemars(title = "Distance", range(min = 1.0, max = 5000.0), extend("step" = 10.0))]
    pub distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            longitude: 0.0,
            latitude: 90.0,
            distance: 300.0,
        }
    }
}
