//! Pure expressions over named parameters.
//!
//! An [`Expression`] is a closure that receives the current values of its
//! named parameters through [`Arguments`] and returns a [`Value`]. Parameters
//! are either constants or references to properties in any live graph.

use std::fmt;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use super::graph::PropertyRef;
use super::value::{Value, ValueKind};
use crate::error::{Result, VistaError};

type ExpressionFn = dyn Fn(&Arguments<'_>) -> Result<Value>;

/// A pure function bound to a property.
///
/// Cloning is cheap; clones share the same closure.
#[derive(Clone)]
pub struct Expression {
    label: &'static str,
    func: Rc<ExpressionFn>,
}

impl Expression {
    /// Wrap a closure. `label` only shows up in logs and `Debug` output.
    pub fn new(
        label: &'static str,
        func: impl Fn(&Arguments<'_>) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            label,
            func: Rc::new(func),
        }
    }

    /// Expression that forwards the single parameter `name` unchanged.
    #[must_use]
    pub fn forward(name: &'static str) -> Self {
        Self::new("forward", move |args| args.get(name))
    }

    /// Label given at construction.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub(crate) fn evaluate(&self, args: &Arguments<'_>) -> Result<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Source of one named expression parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// Fixed value captured at bind time.
    Constant(Value),
    /// Live read of another property.
    Reference(PropertyRef),
}

impl From<PropertyRef> for Parameter {
    fn from(r: PropertyRef) -> Self {
        Self::Reference(r)
    }
}

impl From<Value> for Parameter {
    fn from(v: Value) -> Self {
        Self::Constant(v)
    }
}

impl From<f32> for Parameter {
    fn from(v: f32) -> Self {
        Self::Constant(Value::Scalar(v))
    }
}

/// Parameter values handed to an expression for one evaluation.
///
/// Each parameter was read exactly once before the call.
pub struct Arguments<'a> {
    values: &'a [(String, Value)],
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(values: &'a [(String, Value)]) -> Self {
        Self { values }
    }

    /// Raw value of parameter `name`.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| VistaError::UnknownProperty(name.to_owned()))
    }

    /// Scalar parameter `name`.
    pub fn scalar(&self, name: &str) -> Result<f32> {
        let value = self.get(name)?;
        value
            .as_scalar()
            .ok_or_else(|| mismatch(name, ValueKind::Scalar, value))
    }

    /// Vector parameter `name`.
    pub fn vector3(&self, name: &str) -> Result<Vec3> {
        let value = self.get(name)?;
        value
            .as_vector3()
            .ok_or_else(|| mismatch(name, ValueKind::Vector3, value))
    }

    /// Matrix parameter `name`.
    pub fn matrix4(&self, name: &str) -> Result<Mat4> {
        let value = self.get(name)?;
        value
            .as_matrix4()
            .ok_or_else(|| mismatch(name, ValueKind::Matrix4, value))
    }
}

fn mismatch(name: &str, expected: ValueKind, found: Value) -> VistaError {
    VistaError::TypeMismatch {
        name: name.to_owned(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let values = vec![
            ("a".to_owned(), Value::Scalar(2.0)),
            ("m".to_owned(), Value::Matrix4(Mat4::IDENTITY)),
        ];
        let args = Arguments::new(&values);
        assert_eq!(args.scalar("a").unwrap(), 2.0);
        assert_eq!(args.matrix4("m").unwrap(), Mat4::IDENTITY);
        assert!(matches!(
            args.vector3("a"),
            Err(VistaError::TypeMismatch { .. })
        ));
        assert!(matches!(
            args.get("missing"),
            Err(VistaError::UnknownProperty(_))
        ));
    }

    #[test]
    fn forward_returns_parameter() {
        let values = vec![("x".to_owned(), Value::Scalar(7.0))];
        let expr = Expression::forward("x");
        let out = expr.evaluate(&Arguments::new(&values)).unwrap();
        assert_eq!(out, Value::Scalar(7.0));
        assert_eq!(expr.label(), "forward");
    }
}
