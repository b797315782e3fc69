//! Split callbacks: the contract between the scanner and a tokenizer.
//!
//! A split callback sees the buffered, unconsumed bytes and an end-of-input
//! flag, and answers with a [`Verdict`]:
//!
//! - `advance`: bytes to consume from the front of the window, whether or not
//!   a token was produced from them;
//! - `hint`: additional bytes, beyond what is buffered, that it needs before
//!   it can decide.
//!
//! Tokens are appended to the [`Tokens`] containers passed in. The scanner
//! checks every verdict: a negative or oversized advance and a negative hint
//! stop the scan with an error.
//!
//! Conventions:
//! - `Verdict::need(n)` with no token asks for more data;
//! - `Verdict::default()` with no token at end-of-input ends the scan cleanly;
//! - `Err(SplitError::FinalToken)` delivers the appended token as the last
//!   one.

mod frame;
mod text;

pub use frame::{HeaderWidth, LengthPrefixed};
pub use text::{is_space, scan_bytes, scan_lines, scan_runes, scan_words};

use crate::{SplitError, Tokens};

/// Answer of a split callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Additional bytes wanted beyond the current window.
    pub hint: isize,
    /// Bytes consumed from the front of the window.
    pub advance: isize,
}

impl Verdict {
    /// Consume nothing and ask for `hint` more bytes.
    #[must_use]
    pub const fn need(hint: isize) -> Self {
        Self { hint, advance: 0 }
    }

    /// Consume `advance` bytes.
    #[must_use]
    pub const fn consume(advance: isize) -> Self {
        Self { hint: 0, advance }
    }
}

/// Function-pointer form of a split callback. The default for
/// [`Scanner`](crate::Scanner).
pub type SplitFn = fn(&[u8], &mut Tokens, bool) -> Result<Verdict, SplitError>;

/// A tokenizer driven by a [`Scanner`](crate::Scanner).
///
/// Implemented for every `FnMut(&[u8], &mut Tokens, bool) -> Result<Verdict,
/// SplitError>`, so plain functions and closures work directly. Implement it
/// by hand for splitters that carry configuration, like [`LengthPrefixed`].
pub trait Split {
    /// Inspects `data`, appends any token to `out`, and says how far to
    /// advance and how much more to read.
    ///
    /// # Errors
    ///
    /// [`SplitError::FinalToken`] to stop after the appended token, or
    /// [`SplitError::Custom`] to abort the scan.
    fn split(&mut self, data: &[u8], out: &mut Tokens, at_eof: bool)
    -> Result<Verdict, SplitError>;
}

impl<F> Split for F
where
    F: FnMut(&[u8], &mut Tokens, bool) -> Result<Verdict, SplitError>,
{
    fn split(
        &mut self,
        data: &[u8],
        out: &mut Tokens,
        at_eof: bool,
    ) -> Result<Verdict, SplitError> {
        self(data, out, at_eof)
    }
}
