//! Error types for the orbit propagator and simulation setup.

use thiserror::Error;

use crate::body::Role;

/// Result type for orbital operations.
pub type OrbitResult<T> = Result<T, OrbitError>;

/// Failures raised while deriving, advancing or maneuvering an orbit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    /// Zero radius, zero speed, non-finite input or a non-positive μ.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Specific orbital energy is non-negative: the trajectory is unbound.
    #[error("escape trajectory (specific energy {energy:.6e} >= 0)")]
    EscapeTrajectory { energy: f64 },

    /// Element set outside the bound regime (a <= 0 or e outside [0, 1)).
    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),

    /// A single body failed its update; its previous elements were kept.
    #[error("{role} update failed: {source}")]
    Body {
        role: Role,
        #[source]
        source: Box<OrbitError>,
    },
}

impl OrbitError {
    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        OrbitError::DegenerateGeometry(msg.into())
    }

    pub(crate) fn for_body(self, role: Role) -> Self {
        OrbitError::Body { role, source: Box::new(self) }
    }

    /// True if this error (or the wrapped body error) is an escape trajectory.
    pub fn is_escape(&self) -> bool {
        match self {
            OrbitError::EscapeTrajectory { .. } => true,
            OrbitError::Body { source, .. } => source.is_escape(),
            _ => false,
        }
    }
}

/// Errors from loading or validating a [`crate::config::SimConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("initial orbit rejected: {0}")]
    Orbit(#[from] OrbitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_error_wraps_source() {
        let err = OrbitError::EscapeTrajectory { energy: 1.0 }.for_body(Role::Pursuer);
        assert!(err.is_escape());
        let msg = err.to_string();
        assert!(msg.starts_with("pursuer update failed"), "got {msg}");
    }

    #[test]
    fn degenerate_is_not_escape() {
        assert!(!OrbitError::degenerate("r = 0").is_escape());
    }
}
