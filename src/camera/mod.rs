//! Cameras producing view and combined view-projection matrices.
//!
//! A camera owns exactly one [`Projection`]. Its graph carries a derived
//! `View` matrix and a derived `Combined` matrix (`projection · view` in
//! glam's column-vector convention) which viewports bind against.

/// Pointer-driven orbit controls.
pub mod controller;
mod orbital;

use std::fmt;

use glam::Mat4;

pub use controller::OrbitController;
pub use orbital::{orbital_eye, orbital_view_matrix, OrbitalCamera};

use crate::error::Result;
use crate::projection::Projection;
use crate::property::{Expression, Parameter, PropertyGraph, PropertyRef, Value};

/// Derived view matrix property.
pub const VIEW_PROPERTY: &str = "View";

/// Derived view-projection matrix property.
pub const COMBINED_PROPERTY: &str = "Combined";

/// Capability shared by all camera kinds.
pub trait Camera: fmt::Debug {
    /// Backing graph holding orientation parameters and derived matrices.
    fn property_graph(&self) -> &PropertyGraph;

    /// Currently owned projection.
    fn projection(&self) -> &dyn Projection;

    /// Replace the projection. `Combined` is rebound to the new projection
    /// before the old one is dropped.
    fn set_projection(&mut self, projection: Box<dyn Projection>) -> Result<()>;

    /// World-to-camera transform for the current parameters.
    fn view_matrix(&self) -> Result<Mat4> {
        self.property_graph().get_matrix4(VIEW_PROPERTY)
    }

    /// Reference to the derived view-projection property.
    fn combined_property(&self) -> PropertyRef {
        self.property_graph().property_ref(COMBINED_PROPERTY)
    }

    /// `projection · view` for the current parameters.
    fn combined_matrix(&self) -> Result<Mat4> {
        self.property_graph().get_matrix4(COMBINED_PROPERTY)
    }
}

/// Bind `graph`'s `Combined` property to its `View` and the projection's
/// matrix. Replaces any previous binding.
pub(crate) fn bind_combined(
    graph: &PropertyGraph,
    projection: &dyn Projection,
) -> Result<()> {
    graph.bind(
        COMBINED_PROPERTY,
        Expression::new("view projection", |args| {
            Ok(Value::Matrix4(
                args.matrix4("projection")? * args.matrix4("view")?,
            ))
        }),
        [
            ("view", Parameter::from(graph.property_ref(VIEW_PROPERTY))),
            ("projection", Parameter::from(projection.matrix_property())),
        ],
    )
}
