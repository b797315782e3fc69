//! How and when scanning stops.

use std::{cell::Cell, io, rc::Rc};

use super::{
    drain,
    sources::{Chunked, Counting, Failing, NegativeEof, Oversized, Zeros},
    texts,
};
use crate::{
    ByteSource, Fill, MAX_BUFFER, MAX_CONSECUTIVE_IDLE, ScanError, Scanner, SplitError, Tokens,
    Verdict,
    split::{HeaderWidth, LengthPrefixed, scan_lines},
};

/// Splits on `,`. A trailing field without a comma is the final token.
fn comma_split(data: &[u8], out: &mut Tokens, at_eof: bool) -> Result<Verdict, SplitError> {
    if let Some(i) = data.iter().position(|&b| b == b',') {
        out.push(&data[..i]);
        return Ok(Verdict::consume(isize::try_from(i + 1).unwrap()));
    }
    if at_eof && !data.is_empty() {
        out.push(data);
        return Err(SplitError::FinalToken);
    }
    if at_eof {
        return Ok(Verdict::default());
    }
    Ok(Verdict::need(1))
}

#[test]
fn trailing_separator_ends_cleanly() {
    let mut scanner = Scanner::builder(Chunked::whole("1,2,3,"))
        .split(comma_split)
        .build();
    assert_eq!(texts(&drain(&mut scanner)), ["1", "2", "3"]);
    assert!(scanner.err().is_none());
}

#[test]
fn final_token_without_separator() {
    let mut scanner = Scanner::builder(Chunked::whole("1,2,3"))
        .split(comma_split)
        .build();
    assert_eq!(texts(&drain(&mut scanner)), ["1", "2", "3"]);
    assert!(scanner.err().is_none());
}

#[test]
fn final_token_stops_early() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let split = move |data: &[u8], out: &mut Tokens, at_eof: bool| -> Result<Verdict, SplitError> {
        seen.set(seen.get() + 1);
        let verdict = scan_lines(data, out, at_eof)?;
        if out.bytes() == b"STOP" {
            return Err(SplitError::FinalToken);
        }
        Ok(verdict)
    };
    let mut scanner = Scanner::builder(Chunked::whole("a\nSTOP\nb\n"))
        .split(split)
        .build();

    assert_eq!(texts(&drain(&mut scanner)), ["a", "STOP"]);
    let before = calls.get();
    assert!(!scanner.advance());
    assert_eq!(calls.get(), before);
    assert!(scanner.finish().is_ok());
}

#[test]
fn split_error_stops_scanning() {
    let mut produced = 0;
    let split = move |data: &[u8], out: &mut Tokens, at_eof: bool| -> Result<Verdict, SplitError> {
        if produced == 7 {
            return Err(SplitError::custom("seven is enough"));
        }
        let verdict = scan_lines(data, out, at_eof)?;
        if !out.is_empty() {
            produced += 1;
        }
        Ok(verdict)
    };
    let text: String = (1..=20).map(|i| format!("{i}\n")).collect();
    let mut scanner = Scanner::builder(Chunked::new(text, 3)).split(split).build();

    assert_eq!(texts(&drain(&mut scanner)), ["1", "2", "3", "4", "5", "6", "7"]);
    let err = scanner.err().unwrap();
    assert!(matches!(err, ScanError::Split(_)));
    assert_eq!(err.to_string(), "split error: seven is enough");
}

#[test]
fn split_error_at_eof_replaces_eof() {
    let split = |data: &[u8], out: &mut Tokens, at_eof: bool| -> Result<Verdict, SplitError> {
        if at_eof {
            return Err(SplitError::custom("unterminated line"));
        }
        scan_lines(data, out, at_eof)
    };
    let mut scanner = Scanner::builder(Chunked::whole("a\nb")).split(split).build();

    assert_eq!(texts(&drain(&mut scanner)), ["a"]);
    assert_eq!(
        scanner.err().map(ToString::to_string).as_deref(),
        Some("split error: unterminated line")
    );
}

#[test]
fn source_error_surfaces_verbatim() {
    let mut scanner = Scanner::builder(Failing(io::ErrorKind::ConnectionReset))
        .split(scan_lines)
        .build();
    assert!(!scanner.advance());
    match scanner.err() {
        Some(ScanError::Source(err)) => assert_eq!(err.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("unexpected {other:?}"),
    }
}

/// Delivers `data` in one fill together with a non-EOF error.
struct DataThenError(&'static [u8]);

impl ByteSource for DataThenError {
    fn fill(&mut self, region: &mut [u8]) -> Fill {
        let n = self.0.len().min(region.len());
        region[..n].copy_from_slice(&self.0[..n]);
        self.0 = &self.0[n..];
        Fill::error(
            isize::try_from(n).unwrap(),
            io::Error::other("link down"),
        )
    }
}

#[test]
fn no_token_after_source_error() {
    let mut scanner = Scanner::builder(DataThenError(b"a\nb\n"))
        .split(scan_lines)
        .build();
    assert!(drain(&mut scanner).is_empty());
    assert_eq!(
        scanner.err().map(ToString::to_string).as_deref(),
        Some("source error: link down")
    );
    // The bytes were read but never handed to the split callback.
    assert_eq!(scanner.buffered(), b"a");
}

#[test]
fn zero_reads_make_no_progress() {
    let mut scanner = Scanner::builder(Zeros).split(scan_lines).build();
    assert!(!scanner.advance());
    assert!(matches!(scanner.err(), Some(ScanError::NoProgress)));
}

#[test]
fn zero_verdicts_make_no_progress() {
    let calls = Rc::new(Cell::new(0usize));
    let seen = Rc::clone(&calls);
    let split = move |data: &[u8], out: &mut Tokens, _: bool| -> Result<Verdict, SplitError> {
        seen.set(seen.get() + 1);
        if data.is_empty() {
            return Ok(Verdict::default());
        }
        out.push(&data[..1]);
        Ok(Verdict::consume(1))
    };
    let mut scanner = Scanner::builder(Chunked::whole("abc")).split(split).build();

    // A zero hint never reads, so the input is never seen.
    assert!(drain(&mut scanner).is_empty());
    assert!(matches!(scanner.err(), Some(ScanError::NoProgress)));
    assert_eq!(calls.get(), MAX_CONSECUTIVE_IDLE + 1);
}

#[test]
fn zero_verdict_at_eof_ends_cleanly() {
    let split = |data: &[u8], out: &mut Tokens, at_eof: bool| -> Result<Verdict, SplitError> {
        match data.first() {
            Some(_) => {
                out.push(&data[..1]);
                Ok(Verdict::consume(1))
            }
            None if at_eof => Ok(Verdict::default()),
            None => Ok(Verdict::need(1)),
        }
    };
    let mut scanner = Scanner::builder(Chunked::whole("abc")).split(split).build();
    assert_eq!(texts(&drain(&mut scanner)), ["a", "b", "c"]);
    assert!(scanner.err().is_none());
}

#[test]
fn empty_tokens_are_progress() {
    let mut remaining = 10_000;
    let split = move |data: &[u8], out: &mut Tokens, _: bool| -> Result<Verdict, SplitError> {
        if data.is_empty() {
            return Ok(Verdict::need(1));
        }
        if remaining > 0 {
            remaining -= 1;
            out.push(&data[..0]);
            return Ok(Verdict::consume(1));
        }
        Ok(Verdict::default())
    };
    let mut scanner = Scanner::builder(Chunked::whole("\n".repeat(10_000)))
        .split(split)
        .build();
    assert_eq!(drain(&mut scanner).len(), 10_000);
    assert!(scanner.err().is_none());
}

#[test]
fn huge_token_with_tiny_initial_buffer() {
    let payload = vec![b'x'; 2 * MAX_BUFFER];
    let mut wire = u32::try_from(payload.len()).unwrap().to_be_bytes().to_vec();
    wire.extend_from_slice(&payload);

    let mut scanner = Scanner::builder(Chunked::whole(wire))
        .split(LengthPrefixed::new(HeaderWidth::Four))
        .buffer(vec![0; 100])
        .max_buffer(2 * MAX_BUFFER + 4)
        .build();
    assert!(scanner.advance());
    assert_eq!(scanner.token(), payload.as_slice());
    assert!(!scanner.advance());
    assert!(scanner.err().is_none());
    assert!(scanner.gaps().is_empty());
}

#[test]
fn token_beyond_limit_is_too_long() {
    let mut wire = vec![0x01, 0x00];
    wire.extend_from_slice(&[b'x'; 256]);
    let mut scanner = Scanner::builder(Chunked::whole(wire))
        .split(LengthPrefixed::new(HeaderWidth::Two))
        .max_buffer(200)
        .build();
    assert!(!scanner.advance());
    assert!(matches!(scanner.err(), Some(ScanError::TooLong)));
    assert_eq!(scanner.buffered(), [0x01, 0x00]);
}

#[test]
fn negative_count_at_eof() {
    let mut scanner = Scanner::builder(NegativeEof(10)).split(scan_lines).build();
    let lines = drain(&mut scanner);
    assert!(lines.len() <= 10, "read too many lines: {lines:?}");
    assert!(matches!(scanner.err(), Some(ScanError::BadReadCount)));
}

#[test]
fn oversized_count() {
    let mut scanner = Scanner::builder(Oversized).split(scan_lines).build();
    assert!(!scanner.advance());
    assert!(matches!(scanner.err(), Some(ScanError::BadReadCount)));
}

#[test]
fn bad_verdicts() {
    fn run(verdict: Verdict) -> ScanError {
        let split = move |_: &[u8], _: &mut Tokens, _: bool| -> Result<Verdict, SplitError> {
            Ok(verdict)
        };
        let mut scanner = Scanner::builder(Chunked::whole("abc")).split(split).build();
        assert!(!scanner.advance());
        scanner.finish().unwrap_err()
    }

    assert!(matches!(
        run(Verdict { hint: 0, advance: -1 }),
        ScanError::NegativeAdvance
    ));
    assert!(matches!(run(Verdict::consume(1)), ScanError::AdvanceTooFar));
    assert!(matches!(run(Verdict::need(-1)), ScanError::NegativeHint));
}

#[test]
fn stopped_scanner_stays_stopped() {
    let source = Counting::new(Chunked::new("one\ntwo", 2));
    let reads = Rc::clone(&source.calls);
    let splits = Rc::new(Cell::new(0usize));
    let seen = Rc::clone(&splits);
    let split = move |data: &[u8], out: &mut Tokens, at_eof: bool| -> Result<Verdict, SplitError> {
        seen.set(seen.get() + 1);
        scan_lines(data, out, at_eof)
    };
    let mut scanner = Scanner::builder(source).split(split).build();

    assert_eq!(texts(&drain(&mut scanner)), ["one", "two"]);
    assert!(scanner.is_finished());
    let (reads_before, splits_before) = (reads.get(), splits.get());

    for _ in 0..3 {
        assert!(!scanner.advance());
    }
    assert_eq!(reads.get(), reads_before);
    assert_eq!(splits.get(), splits_before);
    assert!(scanner.err().is_none());
}

#[test]
fn stopped_after_error_stays_stopped() {
    let source = Counting::new(Oversized);
    let reads = Rc::clone(&source.calls);
    let mut scanner = Scanner::builder(source).split(scan_lines).build();

    assert!(!scanner.advance());
    assert_eq!(reads.get(), 1);
    assert!(!scanner.advance());
    assert_eq!(reads.get(), 1);
    assert!(matches!(scanner.err(), Some(ScanError::BadReadCount)));
}

#[test]
fn parts_can_be_reused() {
    let mut scanner = Scanner::builder(Chunked::whole("a\nb\n"))
        .split(scan_lines)
        .build();
    assert_eq!(texts(&drain(&mut scanner)), ["a", "b"]);

    let (_, buffer) = scanner.into_parts();
    assert!(buffer.is_empty());
    assert!(buffer.capacity() > 0);

    let mut next = Scanner::builder(Chunked::whole("c\n"))
        .split(scan_lines)
        .buffer(buffer)
        .build();
    assert_eq!(texts(&drain(&mut next)), ["c"]);
}
