//! Field-of-view perspective projection.

use std::f32::consts::PI;

use glam::{Mat4, Vec4};

use super::{
    Projection, ProjectionKind, FAR, MATRIX_PROPERTY, NEAR, PROJECTION_EPSILON,
};
use crate::compositor::CompositorHandle;
use crate::error::Result;
use crate::property::{
    Expression, Parameter, PropertyGraph, ScalarBounds, Value,
};

/// Horizontal field of view, radians.
pub const X_FOV: &str = "XFov";

/// Vertical field of view, radians.
pub const Y_FOV: &str = "YFov";

/// Perspective projection with independent horizontal and vertical fields
/// of view.
///
/// Right-handed, depth mapped to `[0, 1]`, matching the convention of
/// [`Mat4::perspective_rh`].
#[derive(Debug)]
pub struct PerspectiveProjection {
    graph: PropertyGraph,
}

impl PerspectiveProjection {
    /// Create the projection and bind its matrix. Angles are in radians.
    pub fn new(
        compositor: &CompositorHandle,
        x_fov: f32,
        y_fov: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        let graph = PropertyGraph::new(compositor, "perspective")?;
        let fov_bounds =
            ScalarBounds::between(PROJECTION_EPSILON, PI - PROJECTION_EPSILON);
        let x_fov = graph.create_bounded_scalar(X_FOV, x_fov, fov_bounds)?;
        let y_fov = graph.create_bounded_scalar(Y_FOV, y_fov, fov_bounds)?;
        let near = graph.create_bounded_scalar(
            NEAR,
            near,
            ScalarBounds::at_least(PROJECTION_EPSILON),
        )?;
        let far = graph.create_scalar(FAR, far)?;
        let _ = graph.create_matrix4(MATRIX_PROPERTY, Mat4::IDENTITY)?;

        graph.bind(
            MATRIX_PROPERTY,
            Expression::new("perspective", |args| {
                Ok(Value::Matrix4(perspective_matrix(
                    args.scalar("x_fov")?,
                    args.scalar("y_fov")?,
                    args.scalar("near")?,
                    args.scalar("far")?,
                )))
            }),
            [
                ("x_fov", Parameter::from(x_fov)),
                ("y_fov", Parameter::from(y_fov)),
                ("near", Parameter::from(near)),
                ("far", Parameter::from(far)),
            ],
        )?;
        Ok(Self { graph })
    }

    /// Horizontal and vertical field of view, radians.
    pub fn fov(&self) -> Result<(f32, f32)> {
        Ok((self.graph.get_scalar(X_FOV)?, self.graph.get_scalar(Y_FOV)?))
    }

    /// Set both fields of view, radians.
    pub fn set_fov(&self, x_fov: f32, y_fov: f32) -> Result<()> {
        self.graph.set(X_FOV, x_fov)?;
        self.graph.set(Y_FOV, y_fov)
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

impl Projection for PerspectiveProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Perspective
    }

    fn property_graph(&self) -> &PropertyGraph {
        &self.graph
    }
}

/// Perspective matrix from horizontal/vertical field of view.
///
/// Equivalent to `Mat4::perspective_rh(y_fov, tan(x_fov/2) / tan(y_fov/2),
/// near, far)`.
#[must_use]
pub fn perspective_matrix(x_fov: f32, y_fov: f32, near: f32, far: f32) -> Mat4 {
    let near = near.max(PROJECTION_EPSILON);
    let x_scale = 1.0 / (0.5 * x_fov).tan();
    let y_scale = 1.0 / (0.5 * y_fov).tan();
    let r = far / (near - far);
    Mat4::from_cols(
        Vec4::new(x_scale, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y_scale, 0.0, 0.0),
        Vec4::new(0.0, 0.0, r, -1.0),
        Vec4::new(0.0, 0.0, r * near, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::Vec3;

    use super::*;
    use crate::compositor::Compositor;

    #[test]
    fn matches_glam_perspective() {
        let (x_fov, y_fov) = (1.2_f32, 0.9_f32);
        let aspect = (0.5 * x_fov).tan() / (0.5 * y_fov).tan();
        let expected = Mat4::perspective_rh(y_fov, aspect, 0.5, 200.0);
        let m = perspective_matrix(x_fov, y_fov, 0.5, 200.0);
        assert!(m.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn maps_near_and_far_to_unit_depth() {
        let m = perspective_matrix(FRAC_PI_2, FRAC_PI_2, 1.0, 100.0);
        let near = m.project_point3(Vec3::new(0.0, 0.0, -1.0));
        let far = m.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fov_is_clamped_into_open_range() {
        let compositor = Compositor::new();
        let p = PerspectiveProjection::new(&compositor.handle(), 1.0, 1.0, 1.0, 10.0)
            .unwrap();
        p.set_fov(-1.0, 10.0).unwrap();
        let (x, y) = p.fov().unwrap();
        assert_eq!(x, PROJECTION_EPSILON);
        assert_eq!(y, PI - PROJECTION_EPSILON);
        assert!(p.matrix().unwrap().is_finite());
    }

    #[test]
    fn matrix_tracks_fov_changes() {
        let compositor = Compositor::new();
        let p = PerspectiveProjection::new(
            &compositor.handle(),
            FRAC_PI_2,
            FRAC_PI_2,
            1.0,
            10.0,
        )
        .unwrap();
        assert!((p.matrix().unwrap().x_axis.x - 1.0).abs() < 1e-5);
        p.set_fov(2.0 * (0.5_f32).atan(), FRAC_PI_2).unwrap();
        assert!((p.matrix().unwrap().x_axis.x - 2.0).abs() < 1e-4);
    }
}
