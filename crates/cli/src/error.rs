//! Error types for CLI operations.

use contracts::Family;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input log does not exist
    #[error("Input not found: {path}")]
    InputNotFound { path: String },

    /// Input path has no file name to derive the output name from
    #[error("Cannot derive an output name from input '{path}'")]
    InvalidInputName { path: String },

    /// Discovery found no sample for at least one family
    #[error(
        "Clock not found in '{input}' (missing: {}). Are you sure it's the right data?",
        format_missing(.missing)
    )]
    MissingClock { input: String, missing: Vec<Family> },
}

impl CliError {
    pub fn input_not_found(path: impl Into<String>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    pub fn invalid_input_name(path: impl Into<String>) -> Self {
        Self::InvalidInputName { path: path.into() }
    }

    pub fn missing_clock(input: impl Into<String>, missing: Vec<Family>) -> Self {
        Self::MissingClock {
            input: input.into(),
            missing,
        }
    }
}

fn format_missing(missing: &[Family]) -> String {
    missing
        .iter()
        .map(|family| family.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_clock_message() {
        let err = CliError::missing_clock("run1.jsonl", vec![Family::Shoot]);
        assert_eq!(
            err.to_string(),
            "Clock not found in 'run1.jsonl' (missing: shoot). Are you sure it's the right data?"
        );

        let err = CliError::missing_clock("empty.jsonl", vec![Family::Hose, Family::Shoot]);
        assert!(err.to_string().contains("(missing: hose, shoot)"));
    }
}
