// src/error.rs
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::io;

use thiserror::Error;

/// Reference point for a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Offset counted from position 0
    FromStart,
    /// Offset added to the current position
    FromCurrent,
    /// Offset counted backwards from the logical size
    FromEnd,
}

impl TryFrom<i32> for Anchor {
    type Error = ReaderError;

    /// Classic whence values: 0 = start, 1 = current, 2 = end.
    fn try_from(whence: i32) -> Result<Self> {
        match whence {
            0 => Ok(Anchor::FromStart),
            1 => Ok(Anchor::FromCurrent),
            2 => Ok(Anchor::FromEnd),
            other => Err(ReaderError::InvalidAnchor(other)),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::FromStart => "SeekStart",
            Anchor::FromCurrent => "SeekCurrent",
            Anchor::FromEnd => "SeekEnd",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`crate::DummyReader`] operations.
///
/// End of stream is not an error; see [`crate::ReadOutcome::EndOfStream`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    /// The stream has no generated content to serve.
    #[error("data needs to be set before reading")]
    Unconfigured,

    /// Seek target fell outside `[0, size]`. `offset` is the computed target.
    #[error("{anchor}: cannot seek past start or end of stream. offset: {offset}, size: {size}")]
    OutOfRange {
        anchor: Anchor,
        offset: i128,
        size: u64,
    },

    #[error("invalid value of whence: {0}")]
    InvalidAnchor(i32),
}

impl ReaderError {
    /// Only an out-of-range seek can succeed on retry, with corrected arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReaderError::OutOfRange { .. })
    }
}

impl From<ReaderError> for io::Error {
    fn from(e: ReaderError) -> Self {
        let kind = match e {
            ReaderError::Unconfigured => io::ErrorKind::Other,
            ReaderError::OutOfRange { .. } | ReaderError::InvalidAnchor(_) => {
                io::ErrorKind::InvalidInput
            }
        };
        io::Error::new(kind, e)
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;
