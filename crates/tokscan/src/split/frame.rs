//! Length-prefixed binary frames, as used by ISO 8583 style protocols.

use super::{Split, Verdict, text::to_advance};
use crate::{SplitError, Tokens};

/// Size of the big-endian length header in front of each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderWidth {
    /// `u8` length.
    One,
    /// `u16` length.
    Two,
    /// `u32` length.
    Four,
}

impl HeaderWidth {
    /// Header size in bytes.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        match self {
            HeaderWidth::One => 1,
            HeaderWidth::Two => 2,
            HeaderWidth::Four => 4,
        }
    }

    fn decode(self, header: &[u8]) -> usize {
        header
            .iter()
            .take(self.byte_len())
            .fold(0usize, |acc, &b| (acc << 8) | usize::from(b))
    }
}

/// Splits a stream of `[length][payload]` frames, yielding each payload as a
/// token.
///
/// Asks the scanner for exactly the bytes still missing from the current
/// frame, so each frame is read with as few source calls as the source
/// allows. The scanner's buffer limit must cover header plus payload of the
/// largest frame; a bigger frame stops the scan with
/// [`ScanError::TooLong`](crate::ScanError::TooLong).
///
/// A frame cut short by end-of-input is not a token: its bytes are moved to
/// the gap buffer and the scan ends without error, so the caller can decide
/// whether a truncated trailer matters.
///
/// ```rust
/// use tokscan::{IoSource, Scanner, split::{HeaderWidth, LengthPrefixed}};
///
/// let wire: &[u8] = b"\x00\x02hi\x00\x05there\x00\x09tru";
/// let mut scanner = Scanner::builder(IoSource::new(wire))
///     .split(LengthPrefixed::new(HeaderWidth::Two))
///     .build();
///
/// let mut frames = Vec::new();
/// while scanner.advance() {
///     frames.push(scanner.token_vec());
/// }
/// assert_eq!(frames, [b"hi".to_vec(), b"there".to_vec()]);
/// assert!(scanner.err().is_none());
/// assert_eq!(scanner.gaps(), b"\x00\x09tru");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPrefixed {
    width: HeaderWidth,
    keep_header: bool,
}

impl LengthPrefixed {
    /// Frames with a `width`-byte big-endian length header.
    #[must_use]
    pub const fn new(width: HeaderWidth) -> Self {
        Self {
            width,
            keep_header: false,
        }
    }

    /// Include the length header in each token.
    #[must_use]
    pub const fn keep_header(mut self, keep: bool) -> Self {
        self.keep_header = keep;
        self
    }
}

impl Split for LengthPrefixed {
    fn split(
        &mut self,
        data: &[u8],
        out: &mut Tokens,
        at_eof: bool,
    ) -> Result<Verdict, SplitError> {
        let header = self.width.byte_len();
        if data.len() < header {
            return Ok(truncated(data, out, at_eof, header - data.len()));
        }

        let total = match self.width.decode(data).checked_add(header) {
            Some(total) if isize::try_from(total).is_ok() => total,
            _ => return Err(SplitError::custom("frame length overflows")),
        };
        if data.len() < total {
            return Ok(truncated(data, out, at_eof, total - data.len()));
        }

        let from = if self.keep_header { 0 } else { header };
        out.push(&data[from..total]);
        Ok(Verdict::consume(to_advance(total)))
    }
}

fn truncated(data: &[u8], out: &mut Tokens, at_eof: bool, missing: usize) -> Verdict {
    if !at_eof {
        return Verdict::need(to_advance(missing));
    }
    out.push_gap(data);
    Verdict::consume(to_advance(data.len()))
}
