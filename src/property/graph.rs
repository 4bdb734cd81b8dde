//! Named property graphs and cross-graph property references.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use glam::{Mat4, Vec3};

use super::expression::{Expression, Parameter};
use super::store::{Binding, PropertyStore};
use super::value::{ScalarBounds, Value, ValueKind};
use crate::compositor::CompositorHandle;
use crate::error::{Result, VistaError};

/// Identifier of a graph within its compositor. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(pub(crate) u64);

/// Address of one property: owning graph plus property name.
///
/// References are plain data; holding one keeps nothing alive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyRef {
    graph: GraphId,
    name: String,
}

impl PropertyRef {
    /// Reference property `name` of graph `graph`.
    pub fn new(graph: GraphId, name: impl Into<String>) -> Self {
        Self {
            graph,
            name: name.into(),
        }
    }

    /// Owning graph.
    #[must_use]
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    /// Property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.graph.0, self.name)
    }
}

/// A named set of animatable properties owned by one object.
///
/// Values live in the compositor's store; this handle owns the graph's
/// lifetime. Dropping it destroys the graph, and bindings in other graphs
/// that still read from it are frozen at their last value.
///
/// Methods take `&self`: writes go through the shared store, which lets
/// animation code drive a graph it only borrows.
#[derive(Debug)]
pub struct PropertyGraph {
    id: GraphId,
    label: String,
    store: Weak<RefCell<PropertyStore>>,
}

impl PropertyGraph {
    /// Create an empty graph in `compositor`.
    ///
    /// Fails with [`VistaError::InvalidArgument`] if the compositor has
    /// shut down.
    pub fn new(compositor: &CompositorHandle, label: &str) -> Result<Self> {
        let store = compositor.upgrade()?;
        let id = store.borrow_mut().insert_graph(label);
        log::debug!("created graph '{label}' ({})", id.0);
        Ok(Self {
            id,
            label: label.to_owned(),
            store: Rc::downgrade(&store),
        })
    }

    /// Graph identifier.
    #[must_use]
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Label given at creation.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Reference to property `name` of this graph, for use as an expression
    /// parameter. Existence is checked when the reference is bound.
    #[must_use]
    pub fn property_ref(&self, name: &str) -> PropertyRef {
        PropertyRef::new(self.id, name)
    }

    /// Sorted property names.
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.store()?.borrow().names(self.id))
    }

    // -- creation ----------------------------------------------------------

    /// Register an unbounded scalar property.
    pub fn create_scalar(&self, name: &str, initial: f32) -> Result<PropertyRef> {
        self.create(name, Value::Scalar(initial), ScalarBounds::UNBOUNDED)
    }

    /// Register a scalar clamped into `bounds` on every store.
    pub fn create_bounded_scalar(
        &self,
        name: &str,
        initial: f32,
        bounds: ScalarBounds,
    ) -> Result<PropertyRef> {
        self.create(name, Value::Scalar(initial), bounds)
    }

    /// Register a 3-vector property.
    pub fn create_vector3(&self, name: &str, initial: Vec3) -> Result<PropertyRef> {
        self.create(name, Value::Vector3(initial), ScalarBounds::UNBOUNDED)
    }

    /// Register a 4x4 matrix property.
    pub fn create_matrix4(&self, name: &str, initial: Mat4) -> Result<PropertyRef> {
        self.create(name, Value::Matrix4(initial), ScalarBounds::UNBOUNDED)
    }

    fn create(
        &self,
        name: &str,
        initial: Value,
        bounds: ScalarBounds,
    ) -> Result<PropertyRef> {
        let r = self.property_ref(name);
        self.store()?.borrow_mut().create(&r, initial, bounds)?;
        Ok(r)
    }

    // -- access ------------------------------------------------------------

    /// Current value. Bound properties reflect their expression evaluated
    /// against the latest parameter values.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.store()?.borrow_mut().resolve(&self.property_ref(name))
    }

    /// Current scalar value.
    pub fn get_scalar(&self, name: &str) -> Result<f32> {
        let value = self.get(name)?;
        value
            .as_scalar()
            .ok_or_else(|| mismatch(name, ValueKind::Scalar, value))
    }

    /// Current vector value.
    pub fn get_vector3(&self, name: &str) -> Result<Vec3> {
        let value = self.get(name)?;
        value
            .as_vector3()
            .ok_or_else(|| mismatch(name, ValueKind::Vector3, value))
    }

    /// Current matrix value.
    pub fn get_matrix4(&self, name: &str) -> Result<Mat4> {
        let value = self.get(name)?;
        value
            .as_matrix4()
            .ok_or_else(|| mismatch(name, ValueKind::Matrix4, value))
    }

    /// Overwrite a static property. Scalars are clamped into their bounds.
    ///
    /// Fails with [`VistaError::PropertyIsBound`] while a binding is active.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.store()?
            .borrow_mut()
            .write(&self.property_ref(name), value.into())
    }

    // -- bindings ----------------------------------------------------------

    /// Drive property `name` by `expression` over the given named
    /// parameters, replacing any previous binding.
    ///
    /// Every referenced property must exist, and the binding must not make
    /// `name` depend on itself.
    pub fn bind<I, S>(
        &self,
        name: &str,
        expression: Expression,
        parameters: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (S, Parameter)>,
        S: Into<String>,
    {
        let binding = Binding {
            expression,
            parameters: parameters
                .into_iter()
                .map(|(n, p)| (n.into(), p))
                .collect(),
        };
        self.store()?
            .borrow_mut()
            .bind(&self.property_ref(name), binding)
    }

    /// Remove the binding on `name`. The property keeps its last evaluated
    /// value and accepts writes again. Unbinding a static property is a
    /// no-op.
    pub fn unbind(&self, name: &str) -> Result<()> {
        self.store()?.borrow_mut().unbind(&self.property_ref(name))
    }

    /// Whether `name` is currently driven by an expression.
    pub fn is_bound(&self, name: &str) -> Result<bool> {
        self.store()?.borrow().is_bound(&self.property_ref(name))
    }

    /// Properties the binding on `name` reads from (empty when static).
    pub fn binding_sources(&self, name: &str) -> Result<Vec<PropertyRef>> {
        self.store()?
            .borrow()
            .binding_sources(&self.property_ref(name))
    }

    fn store(&self) -> Result<Rc<RefCell<PropertyStore>>> {
        self.store.upgrade().ok_or_else(|| {
            VistaError::InvalidArgument(format!(
                "compositor backing graph '{}' has shut down",
                self.label
            ))
        })
    }
}

impl Drop for PropertyGraph {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.borrow_mut().remove_graph(self.id);
        }
    }
}

fn mismatch(name: &str, expected: ValueKind, found: Value) -> VistaError {
    VistaError::TypeMismatch {
        name: name.to_owned(),
        expected,
        found: found.kind(),
    }
}
