//! Animatable property graphs.
//!
//! A [`PropertyGraph`] is a named set of scalar, vector and matrix
//! properties. Any property can be bound to an [`Expression`] over named
//! [`Parameter`]s, which may reference properties in other graphs of the
//! same compositor. Bound properties are read-only until unbound and always
//! reflect their expression evaluated against the latest upstream values.

mod expression;
mod graph;
pub(crate) mod store;
mod value;

pub use expression::{Arguments, Expression, Parameter};
pub use graph::{GraphId, PropertyGraph, PropertyRef};
pub use value::{ScalarBounds, Value, ValueKind};
