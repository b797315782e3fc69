use std::{error::Error as StdError, io};

use thiserror::Error;

/// Boxed error type carried by [`SplitError::Custom`] and [`ScanError::Split`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Terminal conditions reported by [`Scanner::err`](crate::Scanner::err).
///
/// Once recorded, a `ScanError` is never replaced and no further token is
/// produced.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The split callback asked for a buffer larger than the configured
    /// maximum.
    #[error("token too long")]
    TooLong,
    /// The split callback returned a negative advance count.
    #[error("split returned negative advance count")]
    NegativeAdvance,
    /// The split callback advanced past the end of the buffered input.
    #[error("split returned advance count beyond input")]
    AdvanceTooFar,
    /// The byte source reported a negative count or more bytes than it was
    /// offered.
    #[error("source returned impossible read count")]
    BadReadCount,
    /// The split callback hinted a negative number of bytes to read.
    #[error("split hinted negative read size")]
    NegativeHint,
    /// Too many consecutive empty reads or zero-advance verdicts.
    #[error("too many scans without progress")]
    NoProgress,
    /// The byte source failed.
    #[error("source error: {0}")]
    Source(#[source] io::Error),
    /// The split callback rejected its input.
    #[error("split error: {0}")]
    Split(#[source] BoxError),
}

/// Errors a split callback may return.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The token delivered with this error is the last one. Scanning stops
    /// after it without reporting an error.
    ///
    /// Useful to stop early, or to deliver a final empty token.
    #[error("final token")]
    FinalToken,
    /// The input is malformed; scanning stops and the error is surfaced by
    /// [`Scanner::err`](crate::Scanner::err).
    #[error("{0}")]
    Custom(#[source] BoxError),
}

impl SplitError {
    /// Wraps any error as [`SplitError::Custom`].
    pub fn custom<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Custom(err.into())
    }
}

impl From<SplitError> for ScanError {
    fn from(err: SplitError) -> Self {
        match err {
            // Callers never surface the sentinel; keep the mapping total.
            SplitError::FinalToken => ScanError::Split("final token".into()),
            SplitError::Custom(inner) => ScanError::Split(inner),
        }
    }
}
