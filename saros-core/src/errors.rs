//! Error types for calendar parsing.

use thiserror::Error;

/// Failure to interpret a calendar date string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Input did not match the `YYYY-MM-DD` shape.
    #[error("invalid date {input:?}: expected YYYY-MM-DD")]
    Format { input: String },

    /// Input parsed but names an impossible date.
    #[error("invalid date {input:?}: {message}")]
    OutOfRange { input: String, message: String },
}

impl DateError {
    pub fn format(input: &str) -> Self {
        Self::Format {
            input: input.to_string(),
        }
    }

    pub fn out_of_range(input: &str, message: &str) -> Self {
        Self::OutOfRange {
            input: input.to_string(),
            message: message.to_string(),
        }
    }
}
