//! Box-shaped parallel projection.

use glam::{Mat4, Vec4};

use super::{
    Projection, ProjectionKind, FAR, MATRIX_PROPERTY, NEAR, PROJECTION_EPSILON,
};
use crate::compositor::CompositorHandle;
use crate::error::Result;
use crate::property::{
    Expression, Parameter, PropertyGraph, ScalarBounds, Value,
};

/// Half-width of the projection box.
pub const SIZE: &str = "Size";

/// Orthographic projection parameterized by `Size`, `Near` and `Far`.
///
/// `Size` and `Near` never store values below [`PROJECTION_EPSILON`]; `Far`
/// is unclamped. `Far == Near` is not rejected and yields a non-finite
/// depth term.
#[derive(Debug)]
pub struct OrthographicProjection {
    graph: PropertyGraph,
}

impl OrthographicProjection {
    /// Create the projection and bind its matrix.
    pub fn new(
        compositor: &CompositorHandle,
        size: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        let graph = PropertyGraph::new(compositor, "orthographic")?;
        let floor = ScalarBounds::at_least(PROJECTION_EPSILON);
        let size = graph.create_bounded_scalar(SIZE, size, floor)?;
        let near = graph.create_bounded_scalar(NEAR, near, floor)?;
        let far = graph.create_scalar(FAR, far)?;
        let _ = graph.create_matrix4(MATRIX_PROPERTY, Mat4::IDENTITY)?;

        graph.bind(
            MATRIX_PROPERTY,
            Expression::new("orthographic", |args| {
                Ok(Value::Matrix4(orthographic_matrix(
                    args.scalar("size")?,
                    args.scalar("near")?,
                    args.scalar("far")?,
                )))
            }),
            [
                ("size", Parameter::from(size)),
                ("near", Parameter::from(near)),
                ("far", Parameter::from(far)),
            ],
        )?;
        Ok(Self { graph })
    }

    /// Current half-width.
    pub fn size(&self) -> Result<f32> {
        self.graph.get_scalar(SIZE)
    }

    /// Set the half-width (clamped to [`PROJECTION_EPSILON`]).
    pub fn set_size(&self, size: f32) -> Result<()> {
        self.graph.set(SIZE, size)
    }

    /// Set the near plane (clamped to [`PROJECTION_EPSILON`]).
    pub fn set_near(&self, near: f32) -> Result<()> {
        self.graph.set(NEAR, near)
    }

    /// Set the far plane.
    pub fn set_far(&self, far: f32) -> Result<()> {
        self.graph.set(FAR, far)
    }
}

impl Projection for OrthographicProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Orthographic
    }

    fn property_graph(&self) -> &PropertyGraph {
        &self.graph
    }
}

/// `diag(1/s, 1/s, 1/(f - n), 1)` with `s` and `n` floored at
/// [`PROJECTION_EPSILON`]. No translation term.
#[must_use]
pub fn orthographic_matrix(size: f32, near: f32, far: f32) -> Mat4 {
    let s = size.max(PROJECTION_EPSILON);
    let n = near.max(PROJECTION_EPSILON);
    Mat4::from_diagonal(Vec4::new(1.0 / s, 1.0 / s, 1.0 / (far - n), 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::Compositor;
    use crate::error::VistaError;

    fn off_diagonal_is_zero(m: &Mat4) -> bool {
        let cols = m.to_cols_array_2d();
        (0..4).all(|c| (0..4).all(|r| c == r || cols[c][r] == 0.0))
    }

    #[test]
    fn reference_parameters() {
        let compositor = Compositor::new();
        let p = OrthographicProjection::new(&compositor.handle(), 100.0, 1.0, 1000.0)
            .unwrap();
        let m = p.matrix().unwrap();
        assert!((m.x_axis.x - 0.01).abs() < 1e-7);
        assert!((m.y_axis.y - 0.01).abs() < 1e-7);
        assert!((m.z_axis.z - 1.0 / 999.0).abs() < 1e-9);
        assert_eq!(m.w_axis.w, 1.0);
        assert!(off_diagonal_is_zero(&m));
    }

    #[test]
    fn diagonal_for_a_range_of_parameters() {
        let compositor = Compositor::new();
        let p = OrthographicProjection::new(&compositor.handle(), 1.0, 1.0, 2.0)
            .unwrap();
        for &(s, n, f) in &[(0.5, 0.1, 10.0), (250.0, 3.0, 7.0), (2.0, 9.0, 4.0)] {
            p.set_size(s).unwrap();
            p.set_near(n).unwrap();
            p.set_far(f).unwrap();
            let m = p.matrix().unwrap();
            assert!((m.x_axis.x - 1.0 / s).abs() < 1e-6);
            assert_eq!(m.x_axis.x, m.y_axis.y);
            assert!((m.z_axis.z - 1.0 / (f - n)).abs() < 1e-6);
            assert!(off_diagonal_is_zero(&m));
        }
    }

    #[test]
    fn negative_size_is_clamped() {
        let compositor = Compositor::new();
        let p = OrthographicProjection::new(&compositor.handle(), 100.0, 1.0, 1000.0)
            .unwrap();
        p.set_size(-5.0).unwrap();
        assert_eq!(p.size().unwrap(), 0.0001);
        p.set_near(0.0).unwrap();
        assert_eq!(p.near().unwrap(), 0.0001);
        p.set_far(-3.0).unwrap();
        assert_eq!(p.far().unwrap(), -3.0);
    }

    #[test]
    fn graph_writes_are_clamped_too() {
        let compositor = Compositor::new();
        let p = OrthographicProjection::new(&compositor.handle(), 10.0, 1.0, 100.0)
            .unwrap();
        p.property_graph().set(SIZE, -1.0_f32).unwrap();
        assert_eq!(p.size().unwrap(), PROJECTION_EPSILON);
        assert_eq!(p.matrix().unwrap().x_axis.x, 1.0 / PROJECTION_EPSILON);
    }

    #[test]
    fn matrix_follows_writes_immediately() {
        let compositor = Compositor::new();
        let p = OrthographicProjection::new(&compositor.handle(), 10.0, 1.0, 100.0)
            .unwrap();
        assert!((p.matrix().unwrap().x_axis.x - 0.1).abs() < 1e-7);
        p.set_size(20.0).unwrap();
        assert!((p.matrix().unwrap().x_axis.x - 0.05).abs() < 1e-7);
    }

    #[test]
    fn derived_matrix_is_read_only() {
        let compositor = Compositor::new();
        let p = OrthographicProjection::new(&compositor.handle(), 10.0, 1.0, 100.0)
            .unwrap();
        assert!(matches!(
            p.property_graph().set(MATRIX_PROPERTY, Mat4::IDENTITY),
            Err(VistaError::PropertyIsBound(_))
        ));
    }

    #[test]
    fn equal_near_and_far_is_not_finite() {
        let m = orthographic_matrix(1.0, 5.0, 5.0);
        assert!(!m.z_axis.z.is_finite());
    }

    #[test]
    fn nan_far_is_stored_and_breaks_the_matrix() {
        let compositor = Compositor::new();
        let p = OrthographicProjection::new(&compositor.handle(), 10.0, 1.0, 100.0)
            .unwrap();
        p.set_far(f32::NAN).unwrap();
        assert!(p.far().unwrap().is_nan());
        assert!(p.matrix().unwrap().z_axis.z.is_nan());
    }

    #[test]
    fn shut_down_compositor_is_invalid_argument() {
        let handle = Compositor::new().handle();
        assert!(matches!(
            OrthographicProjection::new(&handle, 1.0, 1.0, 2.0),
            Err(VistaError::InvalidArgument(_))
        ));
    }
}
