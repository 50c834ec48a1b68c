//! Error types for erlangc.
//!
//! The formula functions in [`crate::formulas`] never fail: they return
//! documented sentinel values for undefined regimes. Everything layered on
//! top of them (typed models, scenario files, reports, the CLI) reports
//! problems through [`ErlangError`] instead of panicking.

use thiserror::Error;

/// Result type alias for erlangc operations.
pub type ErlangResult<T> = Result<T, ErlangError>;

/// Unified error type for all erlangc operations.
#[derive(Debug, Error)]
pub enum ErlangError {
    // ===== Model Errors =====
    /// Offered load meets or exceeds the server count; no steady state exists.
    #[error("unstable system: traffic intensity {traffic:.6} >= {servers} servers")]
    Unstable {
        /// Offered load a = λ/μ (or c·ρ for approximations).
        traffic: f64,
        /// Number of servers.
        servers: u32,
    },

    /// A computed indicator is NaN or infinite.
    #[error("non-finite value detected at {location}")]
    NonFiniteValue {
        /// Name of the indicator that failed the check.
        location: String,
    },

    /// Argument outside the domain of a special function.
    #[error("domain error in {function}: {message}")]
    Domain {
        /// Function that rejected its arguments.
        function: &'static str,
        /// Description of the violated precondition.
        message: String,
    },

    // ===== Configuration Errors =====
    /// Invalid scenario parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Field-level validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErlangError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a special-function domain error.
    #[must_use]
    pub fn domain(function: &'static str, message: impl Into<String>) -> Self {
        Self::Domain {
            function,
            message: message.into(),
        }
    }

    /// Create an I/O error with a message (wraps in `std::io::Error`).
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::other(message.into()))
    }

    /// Check if this error means the model has no steady state.
    #[must_use]
    pub const fn is_stability_violation(&self) -> bool {
        matches!(self, Self::Unstable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stability_violation_detection() {
        let unstable = ErlangError::Unstable {
            traffic: 20.0,
            servers: 5,
        };
        assert!(unstable.is_stability_violation());

        let non_finite = ErlangError::NonFiniteValue {
            location: "expected_wait".to_string(),
        };
        assert!(!non_finite.is_stability_violation());

        assert!(!ErlangError::config("bad").is_stability_violation());
    }

    #[test]
    fn test_error_unstable_display() {
        let err = ErlangError::Unstable {
            traffic: 20.0,
            servers: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("unstable"));
        assert!(msg.contains("20.000000"));
        assert!(msg.contains("5 servers"));
    }

    #[test]
    fn test_error_config() {
        let err = ErlangError::config("servers must be positive");
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("servers must be positive"));
    }

    #[test]
    fn test_error_domain() {
        let err = ErlangError::domain("regularized_lower_gamma", "shape must be positive");
        let msg = err.to_string();
        assert!(msg.contains("regularized_lower_gamma"));
        assert!(msg.contains("shape must be positive"));
    }

    #[test]
    fn test_error_io() {
        let err = ErlangError::io("file not found");
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_error_non_finite_display() {
        let err = ErlangError::NonFiniteValue {
            location: "expected_sojourn".to_string(),
        };
        assert!(err.to_string().contains("expected_sojourn"));
    }

    #[test]
    fn test_error_yaml_from() {
        let parsed: Result<Vec<u32>, _> = serde_yaml::from_str("[1, two");
        let err: ErlangError = parsed.map_err(ErlangError::from).unwrap_err();
        assert!(err.to_string().contains("YAML parsing error"));
    }

    #[test]
    fn test_error_debug() {
        let err = ErlangError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
