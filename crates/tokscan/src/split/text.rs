//! Reference split callbacks for text-ish streams.

use bstr::ByteSlice;

use super::Verdict;
use crate::{SplitError, Tokens};

/// UTF-8 encoding of U+FFFD.
const REPLACEMENT: &[u8] = "\u{FFFD}".as_bytes();

/// Splits every byte into its own token.
///
/// # Errors
///
/// Never fails.
pub fn scan_bytes(data: &[u8], out: &mut Tokens, at_eof: bool) -> Result<Verdict, SplitError> {
    if let Some(&byte) = data.first() {
        out.push(&[byte]);
        return Ok(Verdict::consume(1));
    }
    if at_eof {
        return Ok(Verdict::default());
    }
    Ok(Verdict::need(1))
}

/// Splits UTF-8 text into one token per code point.
///
/// Invalid encodings yield U+FFFD and advance exactly one byte, so the
/// sequence of tokens matches a lossy per-byte decode. Because of this a
/// caller cannot tell an encoded U+FFFD from an encoding error.
///
/// # Errors
///
/// Never fails.
pub fn scan_runes(data: &[u8], out: &mut Tokens, at_eof: bool) -> Result<Verdict, SplitError> {
    let Some(&lead) = data.first() else {
        return Ok(if at_eof {
            Verdict::default()
        } else {
            Verdict::need(1)
        });
    };

    if lead.is_ascii() {
        out.push(&data[..1]);
        return Ok(Verdict::consume(1));
    }

    let (ch, width) = bstr::decode_utf8(data);
    if ch.is_some() {
        out.push(&data[..width]);
        return Ok(Verdict::consume(to_advance(width)));
    }

    // A valid prefix running into the end of the window may still complete.
    if !at_eof && width == data.len() && is_lead(lead) {
        return Ok(Verdict::need(1));
    }

    out.push(REPLACEMENT);
    Ok(Verdict::consume(1))
}

/// Splits text into lines, stripped of the `\r?\n` terminator.
///
/// Lines may be empty. The final line is returned even without a
/// terminator; a lone trailing `\r` is dropped from it.
///
/// # Errors
///
/// Never fails.
pub fn scan_lines(data: &[u8], out: &mut Tokens, at_eof: bool) -> Result<Verdict, SplitError> {
    if at_eof && data.is_empty() {
        return Ok(Verdict::default());
    }
    if let Some(i) = data.find_byte(b'\n') {
        out.push(drop_cr(&data[..i]));
        return Ok(Verdict::consume(to_advance(i + 1)));
    }
    if at_eof {
        out.push(drop_cr(data));
        return Ok(Verdict::consume(to_advance(data.len())));
    }
    Ok(Verdict::need(1))
}

/// Splits text into white-space separated words.
///
/// Never produces an empty word. White space is the set accepted by
/// [`is_space`]. Leading white space is consumed as soon as it is seen, so it
/// never counts against the buffer limit.
///
/// # Errors
///
/// Never fails.
pub fn scan_words(data: &[u8], out: &mut Tokens, at_eof: bool) -> Result<Verdict, SplitError> {
    let mut start = 0;
    while start < data.len() {
        let (ch, width) = decode(&data[start..]);
        if !ch.is_some_and(is_space) {
            break;
        }
        start += width;
    }

    let mut i = start;
    while i < data.len() {
        let (ch, width) = decode(&data[i..]);
        if ch.is_some_and(is_space) {
            out.push(&data[start..i]);
            return Ok(Verdict::consume(to_advance(i + width)));
        }
        i += width;
    }

    if at_eof && data.len() > start {
        out.push(&data[start..]);
        return Ok(Verdict::consume(to_advance(data.len())));
    }
    if at_eof {
        return Ok(Verdict::consume(to_advance(start)));
    }
    Ok(Verdict {
        hint: 1,
        advance: to_advance(start),
    })
}

/// Reports whether `ch` is Unicode white space.
///
/// Same set as [`char::is_whitespace`], checked with a Latin-1 fast path.
#[must_use]
pub fn is_space(ch: char) -> bool {
    if ch <= '\u{00FF}' {
        return matches!(
            ch,
            ' ' | '\t' | '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{00A0}'
        );
    }
    if ('\u{2000}'..='\u{200A}').contains(&ch) {
        return true;
    }
    matches!(
        ch,
        '\u{1680}' | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

/// Decodes one scalar, stepping a single byte over invalid input.
fn decode(bytes: &[u8]) -> (Option<char>, usize) {
    match bstr::decode_utf8(bytes) {
        (Some(ch), width) => (Some(ch), width),
        (None, _) => (None, 1),
    }
}

/// Whether `byte` can start a multi-byte UTF-8 sequence.
fn is_lead(byte: u8) -> bool {
    (0xC2..=0xF4).contains(&byte)
}

fn drop_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Slice lengths never exceed `isize::MAX`.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn to_advance(n: usize) -> isize {
    n as isize
}
