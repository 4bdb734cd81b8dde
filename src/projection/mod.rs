//! Projection kinds sharing one capability.
//!
//! Every projection keeps its primitive parameters in a [`PropertyGraph`]
//! together with a derived `Projection` matrix property bound to an
//! expression over them. Reading [`Projection::matrix`] therefore always
//! reflects the latest parameter writes, including writes made by external
//! animation through [`Projection::property_graph`].

pub mod orthographic;
pub mod perspective;

use std::fmt;

use glam::Mat4;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use orthographic::{orthographic_matrix, OrthographicProjection};
pub use perspective::{perspective_matrix, PerspectiveProjection};

use crate::compositor::CompositorHandle;
use crate::error::Result;
use crate::options::ProjectionOptions;
use crate::property::{PropertyGraph, PropertyRef};

/// Floor applied to sizes, near planes and fields of view.
pub const PROJECTION_EPSILON: f32 = 1e-4;

/// Name of the derived matrix property in every projection graph.
pub const MATRIX_PROPERTY: &str = "Projection";

/// Shared near-plane property name.
pub const NEAR: &str = "Near";

/// Shared far-plane property name.
pub const FAR: &str = "Far";

/// Projection variant tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Parallel projection of a box of half-extent `Size`.
    #[default]
    Orthographic,
    /// Field-of-view based perspective projection.
    Perspective,
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orthographic => f.write_str("orthographic"),
            Self::Perspective => f.write_str("perspective"),
        }
    }
}

/// Capability shared by all projection kinds.
///
/// Cameras only talk to projections through this trait.
pub trait Projection: fmt::Debug {
    /// Variant tag.
    fn kind(&self) -> ProjectionKind;

    /// Backing graph, for animation systems that drive single properties.
    fn property_graph(&self) -> &PropertyGraph;

    /// Reference to the derived matrix property.
    fn matrix_property(&self) -> PropertyRef {
        self.property_graph().property_ref(MATRIX_PROPERTY)
    }

    /// Projection matrix for the current parameter values.
    fn matrix(&self) -> Result<Mat4> {
        self.property_graph().get_matrix4(MATRIX_PROPERTY)
    }

    /// Near plane distance (after clamping).
    fn near(&self) -> Result<f32> {
        self.property_graph().get_scalar(NEAR)
    }

    /// Far plane distance.
    fn far(&self) -> Result<f32> {
        self.property_graph().get_scalar(FAR)
    }
}

/// Build the projection described by `options`.
pub fn from_options(
    compositor: &CompositorHandle,
    options: &ProjectionOptions,
) -> Result<Box<dyn Projection>> {
    let projection: Box<dyn Projection> = match options.kind {
        ProjectionKind::Orthographic => Box::new(OrthographicProjection::new(
            compositor,
            options.size,
            options.near,
            options.far,
        )?),
        ProjectionKind::Perspective => Box::new(PerspectiveProjection::new(
            compositor,
            options.x_fov.to_radians(),
            options.y_fov.to_radians(),
            options.near,
            options.far,
        )?),
    };
    Ok(projection)
}
