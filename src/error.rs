//! Error types for the hello-world simulation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring the world or creating bodies.
#[derive(Debug, Error)]
pub enum SimError {
    /// A shape dimension is zero, negative, or not finite.
    #[error("invalid {shape} geometry: {reason}")]
    InvalidGeometry {
        /// Shape kind (`sphere`, `box`, ...).
        shape: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Mass is negative or not finite.
    #[error("invalid mass {0} (must be finite and >= 0)")]
    InvalidMass(f32),

    /// A collision shape id that the registry never handed out.
    #[error("unknown collision shape id {0}")]
    UnknownCollisionShape(usize),

    /// A visual shape id that the registry never handed out.
    #[error("unknown visual shape id {0}")]
    UnknownVisualShape(usize),

    /// Step length is zero, negative, or not finite.
    #[error("invalid time step {0} s (must be finite and > 0)")]
    InvalidTimeStep(f64),

    /// Planes are infinite and can only back static bodies.
    #[error("plane collision shapes require a static body (mass 0)")]
    DynamicPlane,

    /// The URDF file was not found on any search path.
    #[error("cannot find {name} (searched: {})", searched.join(", "))]
    UrdfNotFound {
        /// Requested file name.
        name: String,
        /// Locations tried, in order.
        searched: Vec<String>,
    },

    /// The URDF file was found but could not be parsed.
    #[error("failed to load {name}: {source}")]
    Urdf {
        /// Requested file name.
        name: String,
        /// Parser error.
        #[source]
        source: UrdfError,
    },

    /// IO error while reading a URDF file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for simulation setup.
pub type SimResult<T> = std::result::Result<T, SimError>;

/// Errors that can occur while parsing URDF documents.
#[derive(Debug, Error)]
pub enum UrdfError {
    /// Malformed XML.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Missing required element.
    #[error("missing required element: {element} in {context}")]
    MissingElement {
        /// The missing element name.
        element: &'static str,
        /// Where the element was expected.
        context: String,
    },

    /// Missing required attribute.
    #[error("missing required attribute: {attribute} on {element}")]
    MissingAttribute {
        /// The missing attribute name.
        attribute: &'static str,
        /// The element that should have it.
        element: String,
    },

    /// Attribute present but unparsable.
    #[error("invalid value for {attribute} on {element}: {value:?}")]
    InvalidAttribute {
        /// The attribute with the invalid value.
        attribute: &'static str,
        /// The element containing the attribute.
        element: String,
        /// The raw value.
        value: String,
    },

    /// The robot has no links.
    #[error("robot {0} has no links")]
    NoLinks(String),
}

impl UrdfError {
    pub(crate) fn missing_element(element: &'static str, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element,
            context: context.into(),
        }
    }

    pub(crate) fn missing_attribute(attribute: &'static str, element: impl Into<String>) -> Self {
        Self::MissingAttribute {
            attribute,
            element: element.into(),
        }
    }
}

/// Result type for URDF parsing.
pub type UrdfResult<T> = std::result::Result<T, UrdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::InvalidMass(-1.0);
        assert_eq!(format!("{err}"), "invalid mass -1 (must be finite and >= 0)");

        let err = SimError::UrdfNotFound {
            name: "plane.urdf".into(),
            searched: vec!["plane.urdf".into(), "/opt/data/plane.urdf".into()],
        };
        assert_eq!(
            format!("{err}"),
            "cannot find plane.urdf (searched: plane.urdf, /opt/data/plane.urdf)"
        );

        let err = UrdfError::missing_attribute("radius", "sphere");
        assert!(format!("{err}").contains("radius"));
    }

    #[test]
    fn test_urdf_error_is_source() {
        use std::error::Error as _;

        let err = SimError::Urdf {
            name: "broken.urdf".into(),
            source: UrdfError::NoLinks("empty".into()),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("robot empty has no links"));
    }
}
