use glam::{Mat4, Vec3};

use super::{bind_combined, Camera, COMBINED_PROPERTY, VIEW_PROPERTY};
use crate::compositor::CompositorHandle;
use crate::error::Result;
use crate::options::CameraOptions;
use crate::projection::{Projection, PROJECTION_EPSILON};
use crate::property::{
    Expression, Parameter, PropertyGraph, ScalarBounds, Value,
};

/// Below this `|sin(latitude)|` the eye is treated as sitting on a pole.
const POLE_EPSILON: f32 = 1e-4;

/// Camera orbiting the origin on a sphere of radius `Distance`.
///
/// `Latitude` is measured from the +Y pole, `Longitude` around +Y starting
/// at +X. Longitude is unclamped; `Distance` is floored at
/// [`PROJECTION_EPSILON`].
#[derive(Debug)]
pub struct OrbitalCamera {
    graph: PropertyGraph,
    projection: Box<dyn Projection>,
}

impl OrbitalCamera {
    /// Longitude property name (radians).
    pub const LONGITUDE: &'static str = "Longitude";
    /// Latitude property name (radians).
    pub const LATITUDE: &'static str = "Latitude";
    /// Distance property name.
    pub const DISTANCE: &'static str = "Distance";

    /// Create the camera, taking ownership of `projection`.
    pub fn new(
        compositor: &CompositorHandle,
        projection: Box<dyn Projection>,
        longitude: f32,
        latitude: f32,
        distance: f32,
    ) -> Result<Self> {
        let graph = PropertyGraph::new(compositor, "orbital camera")?;
        let longitude = graph.create_scalar(Self::LONGITUDE, longitude)?;
        let latitude = graph.create_scalar(Self::LATITUDE, latitude)?;
        let distance = graph.create_bounded_scalar(
            Self::DISTANCE,
            distance,
            ScalarBounds::at_least(PROJECTION_EPSILON),
        )?;
        let _ = graph.create_matrix4(VIEW_PROPERTY, Mat4::IDENTITY)?;
        let _ = graph.create_matrix4(COMBINED_PROPERTY, Mat4::IDENTITY)?;

        graph.bind(
            VIEW_PROPERTY,
            Expression::new("orbital view", |args| {
                Ok(Value::Matrix4(orbital_view_matrix(
                    args.scalar("longitude")?,
                    args.scalar("latitude")?,
                    args.scalar("distance")?,
                )))
            }),
            [
                ("longitude", Parameter::from(longitude)),
                ("latitude", Parameter::from(latitude)),
                ("distance", Parameter::from(distance)),
            ],
        )?;
        bind_combined(&graph, projection.as_ref())?;

        Ok(Self { graph, projection })
    }

    /// Create the camera from configured angles (degrees) and distance.
    pub fn from_options(
        compositor: &CompositorHandle,
        options: &CameraOptions,
        projection: Box<dyn Projection>,
    ) -> Result<Self> {
        Self::new(
            compositor,
            projection,
            options.longitude.to_radians(),
            options.latitude.to_radians(),
            options.distance,
        )
    }

    /// Longitude, radians.
    pub fn longitude(&self) -> Result<f32> {
        self.graph.get_scalar(Self::LONGITUDE)
    }

    /// Set the longitude, radians.
    pub fn set_longitude(&self, longitude: f32) -> Result<()> {
        self.graph.set(Self::LONGITUDE, longitude)
    }

    /// Latitude, radians.
    pub fn latitude(&self) -> Result<f32> {
        self.graph.get_scalar(Self::LATITUDE)
    }

    /// Set the latitude, radians.
    pub fn set_latitude(&self, latitude: f32) -> Result<()> {
        self.graph.set(Self::LATITUDE, latitude)
    }

    /// Distance from the origin.
    pub fn distance(&self) -> Result<f32> {
        self.graph.get_scalar(Self::DISTANCE)
    }

    /// Set the distance (clamped to [`PROJECTION_EPSILON`]).
    pub fn set_distance(&self, distance: f32) -> Result<()> {
        self.graph.set(Self::DISTANCE, distance)
    }

    /// World-space eye position.
    pub fn eye_position(&self) -> Result<Vec3> {
        Ok(orbital_eye(
            self.longitude()?,
            self.latitude()?,
            self.distance()?,
        ))
    }
}

impl Camera for OrbitalCamera {
    fn property_graph(&self) -> &PropertyGraph {
        &self.graph
    }

    fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    fn set_projection(&mut self, projection: Box<dyn Projection>) -> Result<()> {
        bind_combined(&self.graph, projection.as_ref())?;
        log::debug!(
            "camera projection {} -> {}",
            self.projection.kind(),
            projection.kind()
        );
        self.projection = projection;
        Ok(())
    }
}

/// Eye position for the given spherical coordinates:
/// `distance · (sin(lat)·cos(lon), cos(lat), sin(lat)·sin(lon))`.
#[must_use]
pub fn orbital_eye(longitude: f32, latitude: f32, distance: f32) -> Vec3 {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    distance * Vec3::new(sin_lat * cos_lon, cos_lat, sin_lat * sin_lon)
}

/// Look-at matrix from the orbital eye toward the origin.
///
/// Up is +Y. On a pole, where +Y is parallel to the view direction, up
/// falls back to the direction of decreasing latitude, which is always
/// perpendicular to the view direction and matches +Y's projection as the
/// pole is approached.
#[must_use]
pub fn orbital_view_matrix(longitude: f32, latitude: f32, distance: f32) -> Mat4 {
    let distance = distance.max(PROJECTION_EPSILON);
    let eye = orbital_eye(longitude, latitude, distance);
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let up = if sin_lat.abs() < POLE_EPSILON {
        let (sin_lon, cos_lon) = longitude.sin_cos();
        Vec3::new(-cos_lat * cos_lon, sin_lat, -cos_lat * sin_lon)
    } else {
        Vec3::Y
    };
    Mat4::look_at_rh(eye, Vec3::ZERO, up)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

    use super::*;
    use crate::compositor::Compositor;
    use crate::projection::{OrthographicProjection, PerspectiveProjection};

    fn ortho(compositor: &Compositor, size: f32) -> Box<dyn Projection> {
        Box::new(
            OrthographicProjection::new(&compositor.handle(), size, 1.0, 1000.0)
                .unwrap(),
        )
    }

    #[test]
    fn eye_on_xz_plane() {
        let compositor = Compositor::new();
        let camera = OrbitalCamera::new(
            &compositor.handle(),
            ortho(&compositor, 100.0),
            FRAC_PI_2,
            FRAC_PI_2,
            300.0,
        )
        .unwrap();
        let eye = camera.eye_position().unwrap();
        assert!(eye.abs_diff_eq(Vec3::new(0.0, 0.0, 300.0), 1e-3));
        assert!(eye.y.abs() < 1e-3);
        assert!((eye.length() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn view_maps_origin_to_negative_z() {
        let view = orbital_view_matrix(0.3, 1.1, 50.0);
        let origin = view.transform_point3(Vec3::ZERO);
        assert!(origin.truncate().length() < 1e-3);
        assert!((origin.z + 50.0).abs() < 1e-3);
    }

    #[test]
    fn longitude_is_periodic() {
        for &lon in &[0.0, 0.7, FRAC_PI_2, 2.5] {
            let a = orbital_view_matrix(lon, FRAC_PI_4, 300.0);
            let b = orbital_view_matrix(lon + TAU, FRAC_PI_4, 300.0);
            assert!(a.abs_diff_eq(b, 1e-3), "lon = {lon}");
        }
    }

    #[test]
    fn poles_give_finite_view() {
        for &lat in &[0.0, PI, 1e-6] {
            let view = orbital_view_matrix(0.4, lat, 10.0);
            assert!(view.is_finite(), "lat = {lat}");
            let origin = view.transform_point3(Vec3::ZERO);
            assert!((origin.z + 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn pole_fallback_is_continuous() {
        let on_pole = orbital_view_matrix(0.4, 0.0, 10.0);
        let near_pole = orbital_view_matrix(0.4, 1e-3, 10.0);
        assert!(on_pole.abs_diff_eq(near_pole, 1e-2));
    }

    #[test]
    fn distance_is_clamped() {
        let compositor = Compositor::new();
        let camera = OrbitalCamera::new(
            &compositor.handle(),
            ortho(&compositor, 1.0),
            0.0,
            1.0,
            -4.0,
        )
        .unwrap();
        assert_eq!(camera.distance().unwrap(), PROJECTION_EPSILON);
        assert!(camera.view_matrix().unwrap().is_finite());
    }

    #[test]
    fn setters_take_effect_on_next_read() {
        let compositor = Compositor::new();
        let camera = OrbitalCamera::new(
            &compositor.handle(),
            ortho(&compositor, 1.0),
            0.0,
            FRAC_PI_2,
            10.0,
        )
        .unwrap();
        let before = camera.view_matrix().unwrap();
        camera.set_longitude(FRAC_PI_2).unwrap();
        let after = camera.view_matrix().unwrap();
        assert!(!before.abs_diff_eq(after, 1e-3));
        assert!(after.abs_diff_eq(orbital_view_matrix(FRAC_PI_2, FRAC_PI_2, 10.0), 1e-6));
    }

    #[test]
    fn combined_is_projection_times_view() {
        let compositor = Compositor::new();
        let camera = OrbitalCamera::new(
            &compositor.handle(),
            ortho(&compositor, 100.0),
            0.2,
            0.9,
            300.0,
        )
        .unwrap();
        let expected =
            camera.projection().matrix().unwrap() * camera.view_matrix().unwrap();
        assert!(camera.combined_matrix().unwrap().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn replacing_projection_is_reflected_immediately() {
        let compositor = Compositor::new();
        let mut camera = OrbitalCamera::new(
            &compositor.handle(),
            ortho(&compositor, 100.0),
            0.0,
            FRAC_PI_2,
            300.0,
        )
        .unwrap();
        let graphs_before = compositor.graph_count();
        let view = camera.view_matrix().unwrap();

        camera.set_projection(ortho(&compositor, 50.0)).unwrap();
        let expected = orthographic_half(50.0) * view;
        assert!(camera.combined_matrix().unwrap().abs_diff_eq(expected, 1e-6));
        // The old projection's graph is gone.
        assert_eq!(compositor.graph_count(), graphs_before);

        let perspective = PerspectiveProjection::new(
            &compositor.handle(),
            FRAC_PI_2,
            FRAC_PI_2,
            1.0,
            1000.0,
        )
        .unwrap();
        let persp_matrix = perspective.matrix().unwrap();
        camera.set_projection(Box::new(perspective)).unwrap();
        assert!(camera
            .combined_matrix()
            .unwrap()
            .abs_diff_eq(persp_matrix * view, 1e-5));
        assert_eq!(
            camera.property_graph().binding_sources(COMBINED_PROPERTY).unwrap()[1],
            camera.projection().matrix_property()
        );
    }

    fn orthographic_half(size: f32) -> Mat4 {
        crate::projection::orthographic_matrix(size, 1.0, 1000.0)
    }
}
