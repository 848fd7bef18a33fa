//! Error types for the Port Tariff Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading tariff data or
//! computing dues.

use thiserror::Error;

/// The main error type for the Port Tariff Engine.
///
/// Blocking conditions (configuration failures, unreadable stores, facts a
/// calculator cannot compute on) are reported through this type. Degraded
/// results such as a missing tier are not errors; they come back as a
/// [`DueResult`](crate::models::DueResult) with reduced confidence.
///
/// # Example
///
/// ```
/// use port_tariff_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tariff.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tariff.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The knowledge store backend could not answer a read.
    #[error("Knowledge store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the backend failure.
        message: String,
    },

    /// A vessel query field holds a value no calculator can work with.
    #[error("Invalid query field '{field}': {message}")]
    InvalidQuery {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A due type key did not match any known due type.
    #[error("Unknown due type: {value}")]
    UnknownDueType {
        /// The unrecognised key.
        value: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/tariff.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/tariff.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/tiers.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/tiers.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_store_unavailable_displays_message() {
        let error = EngineError::StoreUnavailable {
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Knowledge store unavailable: connection refused"
        );
    }

    #[test]
    fn test_invalid_query_displays_field_and_message() {
        let error = EngineError::InvalidQuery {
            field: "gross_tonnage".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid query field 'gross_tonnage': must not be negative"
        );
    }

    #[test]
    fn test_unknown_due_type_displays_value() {
        let error = EngineError::UnknownDueType {
            value: "anchorage_dues".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown due type: anchorage_dues");
    }

    #[test]
    fn test_calculation_error_displays_message() {
        let error = EngineError::CalculationError {
            message: "tier list corrupted".to_string(),
        };
        assert_eq!(error.to_string(), "Calculation error: tier list corrupted");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_store_error() -> EngineResult<()> {
            Err(EngineError::StoreUnavailable {
                message: "offline".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_store_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
