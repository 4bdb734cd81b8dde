//! Typed property values and scalar bounds.

use std::fmt;

use glam::{Mat4, Vec3};

/// The declared kind of a property. A property keeps its kind for life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Single `f32`.
    Scalar,
    /// Three-component vector.
    Vector3,
    /// 4x4 column-major matrix.
    Matrix4,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Vector3 => "vector3",
            Self::Matrix4 => "matrix4",
        };
        f.write_str(name)
    }
}

/// A property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Scalar value.
    Scalar(f32),
    /// 3-vector value.
    Vector3(Vec3),
    /// 4x4 matrix value.
    Matrix4(Mat4),
}

impl Value {
    /// Kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::Vector3(_) => ValueKind::Vector3,
            Self::Matrix4(_) => ValueKind::Matrix4,
        }
    }

    /// The scalar, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The vector, if this is one.
    #[must_use]
    pub fn as_vector3(&self) -> Option<Vec3> {
        match self {
            Self::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    /// The matrix, if this is one.
    #[must_use]
    pub fn as_matrix4(&self) -> Option<Mat4> {
        match self {
            Self::Matrix4(m) => Some(*m),
            _ => None,
        }
    }

    /// Apply scalar bounds. Non-scalar values pass through unchanged.
    #[must_use]
    pub fn clamped(self, bounds: ScalarBounds) -> Self {
        match self {
            Self::Scalar(v) => Self::Scalar(bounds.clamp(v)),
            other => other,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Self::Vector3(v)
    }
}

impl From<Mat4> for Value {
    fn from(m: Mat4) -> Self {
        Self::Matrix4(m)
    }
}

/// Inclusive range a scalar property is clamped into on every store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarBounds {
    /// Smallest storable value.
    pub min: f32,
    /// Largest storable value.
    pub max: f32,
}

impl ScalarBounds {
    /// No clamping.
    pub const UNBOUNDED: Self = Self {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// Floor only.
    #[must_use]
    pub const fn at_least(min: f32) -> Self {
        Self {
            min,
            max: f32::INFINITY,
        }
    }

    /// Floor and ceiling.
    #[must_use]
    pub const fn between(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp `v` into the bounds. NaN is mapped to a finite `min` and
    /// passes through otherwise, so unbounded scalars store it unchanged.
    #[inline]
    #[must_use]
    pub fn clamp(&self, v: f32) -> f32 {
        if v.is_nan() {
            return if self.min.is_finite() { self.min } else { v };
        }
        v.max(self.min).min(self.max)
    }
}

impl Default for ScalarBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_clamps_negative_and_zero() {
        let b = ScalarBounds::at_least(1e-4);
        assert_eq!(b.clamp(-5.0), 1e-4);
        assert_eq!(b.clamp(0.0), 1e-4);
        assert_eq!(b.clamp(3.0), 3.0);
    }

    #[test]
    fn nan_maps_to_floor() {
        let b = ScalarBounds::between(1.0, 2.0);
        assert_eq!(b.clamp(f32::NAN), 1.0);
    }

    #[test]
    fn unbounded_keeps_nan_and_infinities() {
        let b = ScalarBounds::UNBOUNDED;
        assert!(b.clamp(f32::NAN).is_nan());
        assert_eq!(b.clamp(f32::INFINITY), f32::INFINITY);
        assert_eq!(b.clamp(-3.5), -3.5);
        assert!(Value::Scalar(f32::NAN)
            .clamped(b)
            .as_scalar()
            .is_some_and(f32::is_nan));
    }

    #[test]
    fn clamping_ignores_non_scalars() {
        let v = Value::Vector3(Vec3::splat(-1.0));
        assert_eq!(v.clamped(ScalarBounds::at_least(0.0)), v);
    }

    #[test]
    fn accessors_match_kind() {
        let m = Value::from(Mat4::IDENTITY);
        assert_eq!(m.kind(), ValueKind::Matrix4);
        assert_eq!(m.as_matrix4(), Some(Mat4::IDENTITY));
        assert_eq!(m.as_scalar(), None);
    }
}
