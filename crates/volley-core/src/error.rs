//! Error types for volleyball match analysis
//!
//! Provides a unified hard-failure type for all volley-stats crates.
//! Recoverable data problems are not errors; they are collected as
//! [`DataQualityWarning`](crate::DataQualityWarning)s instead.

use crate::event::{Action, Outcome};
use thiserror::Error;

/// Core error type for match analysis operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A source table lacks columns required to read it at all
    #[error("Table '{table}' is missing required columns: {}", columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    /// Outcome not permitted for the action it is attached to
    #[error("Outcome '{outcome}' is not permitted for action '{action}'")]
    InvalidOutcome { action: Action, outcome: Outcome },

    /// Rotation outside 1..=6
    #[error("Rotation {0} is outside 1..=6")]
    InvalidRotation(i64),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a table missing required columns
    pub fn missing_columns(table: &str, columns: &[&str]) -> Self {
        Self::MissingColumns {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Create an error for a probability-like parameter outside (0, 1)
    pub fn invalid_probability(name: &str, value: f64) -> Self {
        Self::InvalidParameter(format!("{name} {value} must be in (0, 1)"))
    }

    /// Whether the error means the input could not be read structurally
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MissingColumns { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("alpha must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: alpha must be positive");

        let err = Error::missing_columns("Individual Events", &["Set", "Action"]);
        assert_eq!(
            err.to_string(),
            "Table 'Individual Events' is missing required columns: Set, Action"
        );

        let err = Error::InvalidOutcome {
            action: Action::Serve,
            outcome: Outcome::Kill,
        };
        assert_eq!(
            err.to_string(),
            "Outcome 'kill' is not permitted for action 'serve'"
        );

        let err = Error::InvalidRotation(7);
        assert_eq!(err.to_string(), "Rotation 7 is outside 1..=6");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::invalid_probability("confidence_level", 1.5);
        assert_eq!(
            err.to_string(),
            "Invalid parameter: confidence_level 1.5 must be in (0, 1)"
        );

        assert!(Error::missing_columns("t", &["Set"]).is_structural());
        assert!(!Error::InvalidRotation(0).is_structural());
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("custom error message");
        let err: Error = anyhow_err.into();

        match err {
            Error::Other(_) => {
                assert!(err.to_string().contains("custom error message"));
            }
            _ => panic!("Wrong error type"),
        }
    }
}
