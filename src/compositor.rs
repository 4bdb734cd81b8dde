//! In-process property store and evaluation runtime.
//!
//! The [`Compositor`] owns the storage every [`PropertyGraph`] writes into.
//! Objects that create graphs hold a weak [`CompositorHandle`]; once the
//! compositor is dropped, new graphs can no longer be created and existing
//! ones report [`VistaError::InvalidArgument`].
//!
//! [`PropertyGraph`]: crate::property::PropertyGraph

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{Result, VistaError};
use crate::property::store::PropertyStore;

/// Owner of all property storage for one presentation surface.
///
/// Single-threaded: the compositor and everything built on it is `!Send`.
#[derive(Debug, Default)]
pub struct Compositor {
    store: Rc<RefCell<PropertyStore>>,
}

impl Compositor {
    /// Create an empty compositor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Weak handle used to construct graphs, projections, cameras and
    /// viewports.
    #[must_use]
    pub fn handle(&self) -> CompositorHandle {
        CompositorHandle {
            store: Rc::downgrade(&self.store),
        }
    }

    /// Per-frame pass: evaluate every bound property once, upstream before
    /// downstream. A failing binding is logged and keeps its previous
    /// value. Returns the number of properties evaluated successfully.
    pub fn evaluate(&self) -> usize {
        self.store.borrow_mut().evaluate_all()
    }

    /// Number of active bindings across all graphs.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.store.borrow().binding_count()
    }

    /// Number of live graphs.
    #[must_use]
    pub fn graph_count(&self) -> usize {
        self.store.borrow().graph_count()
    }
}

/// Weak reference to a [`Compositor`].
///
/// The default handle is detached and behaves like a compositor that has
/// already shut down.
#[derive(Debug, Clone, Default)]
pub struct CompositorHandle {
    store: Weak<RefCell<PropertyStore>>,
}

impl CompositorHandle {
    /// Whether the compositor is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.store.strong_count() > 0
    }

    pub(crate) fn upgrade(&self) -> Result<Rc<RefCell<PropertyStore>>> {
        self.store.upgrade().ok_or_else(|| {
            VistaError::InvalidArgument("compositor has shut down".to_owned())
        })
    }

    pub(crate) fn contains_graph(&self, id: crate::property::GraphId) -> bool {
        self.store
            .upgrade()
            .is_some_and(|store| store.borrow().contains_graph(id))
    }
}
