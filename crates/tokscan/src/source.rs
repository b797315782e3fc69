//! Byte sources feeding a [`Scanner`](crate::Scanner).
//!
//! The scanner never trusts a source: every [`Fill`] is checked against the
//! region it was offered before any byte is counted as buffered.

use std::io::{self, Read};

/// Out-of-band outcome of a [`ByteSource::fill`] call.
#[derive(Debug)]
pub enum Signal {
    /// The source is exhausted. Bytes reported alongside it are still kept.
    Eof,
    /// The source failed. Bytes reported alongside it are still kept.
    Error(io::Error),
}

/// Result of one [`ByteSource::fill`] call.
///
/// `count` is signed so that misbehaving sources (for example a wrapper
/// around a raw `read(2)` returning `-1`) can be detected rather than
/// silently wrapped.
#[derive(Debug)]
pub struct Fill {
    /// Number of bytes written to the front of the region.
    pub count: isize,
    /// End-of-input or failure, if any.
    pub signal: Option<Signal>,
}

impl Fill {
    /// `count` bytes were written; more may follow.
    #[must_use]
    pub const fn bytes(count: isize) -> Self {
        Self {
            count,
            signal: None,
        }
    }

    /// `count` bytes were written and the source is exhausted.
    #[must_use]
    pub const fn eof(count: isize) -> Self {
        Self {
            count,
            signal: Some(Signal::Eof),
        }
    }

    /// `count` bytes were written before the source failed.
    #[must_use]
    pub const fn error(count: isize, err: io::Error) -> Self {
        Self {
            count,
            signal: Some(Signal::Error(err)),
        }
    }
}

/// A sequential, blocking supplier of bytes.
///
/// Semantics follow a blocking read: a zero-byte result without a signal is
/// legal and is retried by the scanner (a bounded number of times).
pub trait ByteSource {
    /// Writes up to `region.len()` bytes to the front of `region`.
    fn fill(&mut self, region: &mut [u8]) -> Fill;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn fill(&mut self, region: &mut [u8]) -> Fill {
        (**self).fill(region)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn fill(&mut self, region: &mut [u8]) -> Fill {
        (**self).fill(region)
    }
}

/// Adapts any [`Read`] into a [`ByteSource`].
///
/// `Ok(0)` on a non-empty region is end-of-input and
/// [`ErrorKind::Interrupted`](io::ErrorKind::Interrupted) is reported as an
/// empty read so the scanner retries it. Counts are passed through unchecked;
/// the scanner rejects impossible ones.
#[derive(Debug, Default)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Wraps a reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwraps the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn fill(&mut self, region: &mut [u8]) -> Fill {
        match self.inner.read(region) {
            Ok(0) if !region.is_empty() => Fill::eof(0),
            Ok(n) => Fill::bytes(isize::try_from(n).unwrap_or(isize::MAX)),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Fill::bytes(0),
            Err(err) => Fill::error(0, err),
        }
    }
}
