#![forbid(unsafe_code)]

//! Errors for host-supplied configuration values.
//!
//! Nothing in the sheet lifecycle fails at runtime: numeric heights are
//! clamped, early gestures are inert, superseded animations simply never
//! complete. The one fallible surface is turning a host string such as
//! `"50%"` into a [`HeightSpec`](crate::height::HeightSpec).

use thiserror::Error;

/// Failure to parse a height specification string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeightParseError {
    #[error("empty height specification")]
    Empty,

    #[error("invalid height `{input}`: expected pixels, a percentage like \"50%\", or \"auto\"")]
    InvalidNumber { input: String },

    #[error("height `{input}` is not a finite number")]
    NonFinite { input: String },
}

impl HeightParseError {
    pub(crate) fn invalid(input: impl Into<String>) -> Self {
        Self::InvalidNumber {
            input: input.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HeightParseError;

    #[test]
    fn invalid_message_names_input() {
        let err = HeightParseError::invalid("tall");
        assert!(err.to_string().contains("`tall`"));
    }

    #[test]
    fn empty_message() {
        assert_eq!(
            HeightParseError::Empty.to_string(),
            "empty height specification"
        );
    }
}
