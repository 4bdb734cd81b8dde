//! Scene nodes as seen by the viewport, and the asset loader boundary.
//!
//! The crate does not parse asset formats. A [`SceneLoader`] turns bytes
//! into a tree of [`SceneNode`]s; the viewport only ever touches the
//! `Transform` property of the node it targets, through a [`NodeHandle`].

use glam::Mat4;

use crate::compositor::CompositorHandle;
use crate::error::Result;
use crate::property::{PropertyGraph, PropertyRef};

/// Matrix property every scene node exposes.
pub const TRANSFORM_PROPERTY: &str = "Transform";

/// Non-owning reference to a node's transform.
///
/// Stays valid as data after the node is dropped; consumers detect that
/// through the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHandle {
    name: String,
    transform: PropertyRef,
}

impl NodeHandle {
    /// Handle onto an arbitrary property, for nodes built outside
    /// [`SceneNode`]. Viewports reject it unless it names a matrix.
    #[must_use]
    pub fn new(name: &str, transform: PropertyRef) -> Self {
        Self {
            name: name.to_owned(),
            transform,
        }
    }

    /// Node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's `Transform` property.
    #[must_use]
    pub fn transform_property(&self) -> &PropertyRef {
        &self.transform
    }
}

/// A renderable node with a bindable transform and owned children.
#[derive(Debug)]
pub struct SceneNode {
    name: String,
    graph: PropertyGraph,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// Node with an identity transform and no children.
    pub fn new(compositor: &CompositorHandle, name: &str) -> Result<Self> {
        let graph = PropertyGraph::new(compositor, name)?;
        let _ = graph.create_matrix4(TRANSFORM_PROPERTY, Mat4::IDENTITY)?;
        Ok(Self {
            name: name.to_owned(),
            graph,
            children: Vec::new(),
        })
    }

    /// Handle for binding this node's transform.
    #[must_use]
    pub fn handle(&self) -> NodeHandle {
        NodeHandle {
            name: self.name.clone(),
            transform: self.graph.property_ref(TRANSFORM_PROPERTY),
        }
    }

    /// Node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing graph.
    #[must_use]
    pub fn property_graph(&self) -> &PropertyGraph {
        &self.graph
    }

    /// Current transform (bound or static).
    pub fn transform(&self) -> Result<Mat4> {
        self.graph.get_matrix4(TRANSFORM_PROPERTY)
    }

    /// Overwrite a static transform. Fails while a viewport drives it.
    pub fn set_transform(&self, transform: Mat4) -> Result<()> {
        self.graph.set(TRANSFORM_PROPERTY, transform)
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }
}

/// Asset loader boundary: builds a node tree from an encoded asset.
pub trait SceneLoader {
    /// Decode `source` into a root node whose graphs live in `compositor`.
    fn load(&self, compositor: &CompositorHandle, source: &[u8]) -> Result<SceneNode>;
}
