use serde::ser;

use std::fmt::Display;
use std::string::FromUtf8Error;

/// Errors that can occur while capturing, flattening or parsing parameters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Custom error message raised by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),

    /// The input cannot be flattened because it is not map-like at the top
    /// level.
    #[error("cannot flatten {0} at the top level, try flattening a struct or a map")]
    TopLevel(&'static str),

    /// A map key could not be turned into a string.
    #[error("unsupported map key: {0}")]
    UnsupportedKey(&'static str),

    /// A value tagged as a date does not hold an RFC 3339 timestamp.
    #[error("invalid date `{value}`: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A decoded query component is not valid UTF-8.
    #[error("decoded query component is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

impl Error {
    /// Generate error to show top-level type cannot be flattened.
    pub fn top_level(object: &'static str) -> Self {
        Error::TopLevel(object)
    }
}

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
