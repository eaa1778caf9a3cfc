//! # Mesh Errors
//!
//! Error types for the lampshade pipeline. Every failure is deterministic for
//! a given input and parameter set, so nothing here is retried.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while projecting, shelling or cleaning a mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A projection parameter is out of its valid range
    #[error("Invalid parameter: {parameter} = {value}: {message}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        message: String,
    },

    /// The pattern cannot be turned into a shell
    #[error("Degenerate input: {message}")]
    DegenerateInput { message: String },

    /// Non-finite coordinates appeared in the geometry
    #[error("Numeric anomaly: {message}")]
    NumericAnomaly { message: String },

    /// Face indices that do not describe a valid polygon
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },
}

impl MeshError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(parameter: &'static str, value: f64, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            message: message.into(),
        }
    }

    /// Creates a degenerate input error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateInput {
            message: message.into(),
        }
    }

    /// Creates a numeric anomaly error.
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::NumericAnomaly {
            message: message.into(),
        }
    }

    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Returns the kind a host should surface to the user.
    ///
    /// Malformed face indices are reported as degenerate input.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::DegenerateInput { .. } | Self::InvalidTopology { .. } => ErrorKind::DegenerateInput,
            Self::NumericAnomaly { .. } => ErrorKind::NumericAnomaly,
        }
    }
}

/// Coarse classification of a [`MeshError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    DegenerateInput,
    NumericAnomaly,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidParameter => "InvalidParameter",
            Self::DegenerateInput => "DegenerateInput",
            Self::NumericAnomaly => "NumericAnomaly",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::invalid_parameter("thickness", 5.0, "must be less than radius");
        let message = err.to_string();
        assert!(message.contains("thickness"));
        assert!(message.contains("radius"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            MeshError::invalid_parameter("radius", 0.0, "must be positive").kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(MeshError::degenerate("empty").kind(), ErrorKind::DegenerateInput);
        assert_eq!(MeshError::invalid_topology("index").kind(), ErrorKind::DegenerateInput);
        assert_eq!(MeshError::numeric("NaN").kind(), ErrorKind::NumericAnomaly);
        assert_eq!(ErrorKind::NumericAnomaly.to_string(), "NumericAnomaly");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
