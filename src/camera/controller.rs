use std::f32::consts::PI;

use glam::Vec2;

use super::{Camera, OrbitalCamera};
use crate::error::Result;
use crate::options::ControllerOptions;
use crate::projection::PROJECTION_EPSILON;

/// Translates pointer drags and wheel steps into orbital parameter edits.
///
/// Works on any camera whose graph carries the orbital `Longitude`,
/// `Latitude` and `Distance` properties.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitController {
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(&ControllerOptions::default())
    }
}

impl OrbitController {
    /// Controller configured from options.
    #[must_use]
    pub fn new(options: &ControllerOptions) -> Self {
        Self {
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
            min_distance: options.min_distance,
            max_distance: options.max_distance,
        }
    }

    /// Orbit by a pointer delta in pixels. Horizontal motion changes
    /// longitude; vertical motion changes latitude, which stays off the
    /// poles.
    pub fn rotate(&self, camera: &dyn Camera, delta: Vec2) -> Result<()> {
        let graph = camera.property_graph();
        let longitude = graph.get_scalar(OrbitalCamera::LONGITUDE)?;
        let latitude = graph.get_scalar(OrbitalCamera::LATITUDE)?;

        let latitude = (latitude - delta.y * self.rotate_speed)
            .clamp(PROJECTION_EPSILON, PI - PROJECTION_EPSILON);
        graph.set(OrbitalCamera::LONGITUDE, longitude - delta.x * self.rotate_speed)?;
        graph.set(OrbitalCamera::LATITUDE, latitude)
    }

    /// Zoom by a wheel delta. Positive values move the eye closer.
    pub fn zoom(&self, camera: &dyn Camera, delta: f32) -> Result<()> {
        let graph = camera.property_graph();
        let distance = graph.get_scalar(OrbitalCamera::DISTANCE)?;
        let distance = (distance * (1.0 - delta * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);
        graph.set(OrbitalCamera::DISTANCE, distance)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::compositor::Compositor;
    use crate::projection::OrthographicProjection;

    fn camera(compositor: &Compositor) -> OrbitalCamera {
        let projection = OrthographicProjection::new(
            &compositor.handle(),
            100.0,
            1.0,
            1000.0,
        )
        .unwrap();
        OrbitalCamera::new(
            &compositor.handle(),
            Box::new(projection),
            0.0,
            FRAC_PI_2,
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn rotate_moves_angles_against_drag() {
        let compositor = Compositor::new();
        let camera = camera(&compositor);
        let controller = OrbitController::default();
        controller.rotate(&camera, Vec2::new(10.0, 0.0)).unwrap();
        assert!(camera.longitude().unwrap() < 0.0);
        assert!((camera.latitude().unwrap() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn rotate_keeps_latitude_off_the_poles() {
        let compositor = Compositor::new();
        let camera = camera(&compositor);
        let controller = OrbitController::default();
        controller.rotate(&camera, Vec2::new(0.0, 1.0e6)).unwrap();
        assert_eq!(camera.latitude().unwrap(), PROJECTION_EPSILON);
        controller.rotate(&camera, Vec2::new(0.0, -1.0e6)).unwrap();
        assert_eq!(camera.latitude().unwrap(), PI - PROJECTION_EPSILON);
    }

    #[test]
    fn zoom_is_clamped() {
        let compositor = Compositor::new();
        let camera = camera(&compositor);
        let options = ControllerOptions::default();
        let controller = OrbitController::new(&options);

        controller.zoom(&camera, 1.0).unwrap();
        assert!(camera.distance().unwrap() < 100.0);

        for _ in 0..200 {
            controller.zoom(&camera, 1.0).unwrap();
        }
        assert_eq!(camera.distance().unwrap(), options.min_distance);

        for _ in 0..200 {
            controller.zoom(&camera, -1.0).unwrap();
        }
        assert_eq!(camera.distance().unwrap(), options.max_distance);
    }
}
