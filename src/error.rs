//! Crate-level error types.

use std::fmt;

use crate::property::ValueKind;

/// Errors produced by the vista crate.
#[derive(Debug)]
pub enum VistaError {
    /// A required collaborator was missing at construction time (for
    /// example, the compositor was already shut down).
    InvalidArgument(String),
    /// A property with this name already exists in the graph.
    DuplicateName(String),
    /// No property with this name exists in the graph.
    UnknownProperty(String),
    /// The property is driven by an expression and cannot be written
    /// directly.
    PropertyIsBound(String),
    /// A value of the wrong kind was written to or read from a property.
    TypeMismatch {
        /// Property (or expression parameter) involved.
        name: String,
        /// Kind the property was declared with.
        expected: ValueKind,
        /// Kind that was supplied.
        found: ValueKind,
    },
    /// Installing the binding would make the property depend on itself.
    BindingCycle(String),
    /// The viewport target node is missing or has no transform property.
    InvalidTarget(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for VistaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::DuplicateName(name) => {
                write!(f, "property '{name}' already exists")
            }
            Self::UnknownProperty(name) => {
                write!(f, "unknown property '{name}'")
            }
            Self::PropertyIsBound(name) => {
                write!(f, "property '{name}' is bound to an expression")
            }
            Self::TypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "type mismatch on '{name}': expected {expected}, found {found}"
            ),
            Self::BindingCycle(name) => {
                write!(f, "binding '{name}' would create a dependency cycle")
            }
            Self::InvalidTarget(msg) => write!(f, "invalid target: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for VistaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VistaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Alias for `Result<T, VistaError>`.
pub type Result<T> = std::result::Result<T, VistaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_property() {
        let e = VistaError::PropertyIsBound("Size".to_owned());
        assert_eq!(e.to_string(), "property 'Size' is bound to an expression");
    }

    #[test]
    fn type_mismatch_reports_both_kinds() {
        let e = VistaError::TypeMismatch {
            name: "Near".to_owned(),
            expected: ValueKind::Scalar,
            found: ValueKind::Matrix4,
        };
        assert_eq!(
            e.to_string(),
            "type mismatch on 'Near': expected scalar, found matrix4"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        let e = VistaError::from(std::io::Error::other("disk"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
