//! Error types for XML output.
//!
//! Formatting itself is a pure function of the content and the [`Format`]:
//! the only recoverable failures are those of the character sink (I/O or an
//! unknown output encoding) and content placed where it cannot be emitted.
//! Characters the target encoding cannot represent are never an error; they
//! are escaped instead.
//!
//! [`Format`]: crate::format::Format

use std::fmt;
use std::io;

use crate::encoding::EncodingError;

/// The error type returned by the outputters.
#[derive(Debug)]
pub enum OutputError {
    /// The underlying writer failed. The error is passed through unchanged.
    Io(io::Error),
    /// The configured output encoding is not supported.
    Encoding(EncodingError),
    /// A `DocType` was found somewhere other than at document level.
    MisplacedDocType {
        /// The element name declared by the offending `DocType`.
        name: String,
    },
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "output error: {err}"),
            Self::Encoding(err) => write!(f, "output error: {err}"),
            Self::MisplacedDocType { name } => write!(
                f,
                "output error: DOCTYPE {name} is only allowed at document level"
            ),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encoding(err) => Some(err),
            Self::MisplacedDocType { .. } => None,
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<EncodingError> for OutputError {
    fn from(err: EncodingError) -> Self {
        Self::Encoding(err)
    }
}
