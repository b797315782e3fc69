//! An incremental token scanner over blocking byte sources.
//!
//! A [`Scanner`] pulls bytes from a [`ByteSource`] in bounded chunks and
//! hands successive tokens (protocol frames, lines, words, code points) to
//! the caller without holding the whole stream in memory. What a token is
//! comes from a pluggable [`Split`] callback; the scanner owns the buffer,
//! decides when to compact or grow it, and guarantees that scanning ends,
//! either cleanly or with a single sticky [`ScanError`].
//!
//! ```rust
//! use std::io::Cursor;
//!
//! use tokscan::{Scanner, split::scan_lines};
//!
//! let input = Cursor::new("GET / HTTP/1.1\r\nHost: example.com\r\n\r\n");
//! let mut scanner = Scanner::from_reader(input).with_split(scan_lines);
//!
//! let mut lines = Vec::new();
//! while scanner.advance() {
//!     lines.push(scanner.token_vec());
//! }
//! assert_eq!(
//!     lines,
//!     [b"GET / HTTP/1.1".to_vec(), b"Host: example.com".to_vec(), Vec::new()]
//! );
//! assert!(scanner.err().is_none());
//! ```
//!
//! Tokens live in storage the scanner reuses, so a token borrowed from the
//! scanner is only valid until the next call to [`Scanner::advance`].

mod error;
mod options;
mod scanner;
pub mod source;
pub mod split;
mod tokens;

#[cfg(test)]
mod tests;

pub use error::{BoxError, ScanError, SplitError};
pub use options::{MAX_BUFFER, ScannerOptions};
pub use scanner::{MAX_CONSECUTIVE_IDLE, Scanner, ScannerBuilder};
pub use source::{ByteSource, Fill, IoSource, Signal};
pub use split::{Split, Verdict};
pub use tokens::{Iter, Tokens};
