//! The scan engine.
//!
//! [`Scanner::advance`] repeatedly asks the split callback about the
//! buffered window, consumes what it says, and tops the window up from the
//! source when the callback needs more. Three rules keep the loop honest:
//!
//! - every verdict and every fill is validated before it touches the buffer;
//! - the buffer never grows past the configured maximum;
//! - more than [`MAX_CONSECUTIVE_IDLE`] rounds without progress (empty reads
//!   or zero advances) end the scan with [`ScanError::NoProgress`].
//!
//! All ways of stopping go through one sticky slot (see `halt`), so once a
//! genuine error is recorded no further token is produced.

mod halt;
mod window;


use core::fmt;

use bstr::BStr;
use tracing::trace;

use self::{
    halt::{Halt, Sticky},
    window::Window,
};
use crate::{
    ScanError, ScannerOptions, SplitError, Tokens,
    source::{ByteSource, Fill, IoSource, Signal},
    split::{Split, SplitFn, scan_bytes},
};

/// Consecutive empty reads or zero-advance verdicts tolerated before the scan
/// stops with [`ScanError::NoProgress`].
pub const MAX_CONSECUTIVE_IDLE: usize = 1000;

/// Reads tokens from a [`ByteSource`] using a [`Split`] callback.
///
/// Successive calls to [`advance`](Scanner::advance) step through the tokens.
/// Each token is available through [`token`](Scanner::token) (or
/// [`tokens`](Scanner::tokens) when a callback produces several at once)
/// until the next call to `advance`; the borrow checker enforces this.
/// Copy it out with [`token_vec`](Scanner::token_vec) to keep it.
///
/// Scanning stops for good at end of input, at the first source or split
/// error, or when a token does not fit in [`max_buffer`](Scanner::max_buffer)
/// bytes. When it stops, the source may have been read arbitrarily far past
/// the last token.
///
/// ```rust
/// use tokscan::{Scanner, split::scan_words};
///
/// let mut scanner = Scanner::from_reader("to be  or\nnot".as_bytes()).with_split(scan_words);
/// let mut words = Vec::new();
/// while scanner.advance() {
///     words.push(String::from_utf8_lossy(scanner.token()).into_owned());
/// }
/// assert_eq!(words, ["to", "be", "or", "not"]);
/// assert!(scanner.err().is_none());
/// ```
pub struct Scanner<S, F = SplitFn> {
    source: S,
    split: F,
    window: Window,
    max_buffer: usize,
    out: Tokens,
    halt: Sticky,
    idle: usize,
    finished: bool,
}

impl<S: ByteSource> Scanner<S> {
    /// Scans `source` one byte at a time with default options.
    pub fn new(source: S) -> Self {
        Self::builder(source).build()
    }

    /// Starts configuring a scanner over `source`.
    pub fn builder(source: S) -> ScannerBuilder<S> {
        ScannerBuilder::new(source)
    }
}

impl<R: std::io::Read> Scanner<IoSource<R>> {
    /// Scans a [`Read`](std::io::Read) one byte at a time with default
    /// options.
    pub fn from_reader(reader: R) -> Self {
        Self::new(IoSource::new(reader))
    }
}

impl<S: ByteSource, F: Split> Scanner<S, F> {
    fn from_parts(source: S, split: F, buf: Vec<u8>, options: &ScannerOptions) -> Self {
        Self {
            source,
            split,
            window: Window::new(buf),
            max_buffer: options.effective_max_buffer(),
            out: Tokens::new(),
            halt: Sticky::default(),
            idle: 0,
            finished: false,
        }
    }

    /// Replaces the split callback. Call before the first
    /// [`advance`](Scanner::advance).
    pub fn with_split<G: Split>(self, split: G) -> Scanner<S, G> {
        Scanner {
            source: self.source,
            split,
            window: self.window,
            max_buffer: self.max_buffer,
            out: self.out,
            halt: self.halt,
            idle: self.idle,
            finished: self.finished,
        }
    }

    /// Advances to the next token.
    ///
    /// Returns `false` once scanning has stopped, either at end of input or on
    /// an error; [`err`](Scanner::err) tells which. Every later call returns
    /// `false` without reading or splitting.
    pub fn advance(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let produced = self.scan();
        if !produced {
            self.finished = true;
        }
        produced
    }

    fn scan(&mut self) -> bool {
        if self.halt.is_final() {
            return false;
        }
        loop {
            // No token may follow a genuine error, including one from a read.
            if self.halt.is_failed() {
                return false;
            }

            self.out.clear();
            let verdict =
                match self
                    .split
                    .split(self.window.unconsumed(), &mut self.out, self.halt.at_eof())
                {
                    Ok(verdict) => verdict,
                    Err(SplitError::FinalToken) => {
                        self.halt.record(Halt::FinalToken);
                        return self.halt.is_final();
                    }
                    Err(err) => {
                        self.halt.fail(err.into());
                        return false;
                    }
                };

            let advance = match self.window.check_advance(verdict.advance) {
                Ok(advance) => advance,
                Err(err) => {
                    self.halt.fail(err);
                    return false;
                }
            };
            self.window.consume(advance);

            if advance > 0 {
                self.idle = 0;
                if !self.out.is_empty() {
                    return true;
                }
                if !self.window.is_empty() {
                    continue;
                }
            } else if !self.idle() {
                return false;
            }

            // Nothing more can be read.
            if self.halt.is_set() {
                return false;
            }

            self.window.compact();

            let claim = match self.window.claim(verdict.hint, self.max_buffer) {
                Ok(claim) => claim,
                Err(err) => {
                    self.halt.fail(err);
                    return false;
                }
            };
            self.window.reserve(claim);
            self.refill(claim);
        }
    }

    /// Reads until the window reaches `claim`, the source signals, or a read
    /// delivers bytes.
    fn refill(&mut self, claim: usize) {
        while self.window.end() < claim {
            let region = self.window.spare(claim);
            let offered = region.len();
            let Fill { count, signal } = self.source.fill(region);
            let Some(n) = usize::try_from(count).ok().filter(|&n| n <= offered) else {
                self.halt.fail(ScanError::BadReadCount);
                return;
            };
            self.window.commit(n);
            trace!(read = n, offered, end = self.window.end(), "refill");

            match signal {
                None => {}
                Some(Signal::Eof) => {
                    self.halt.record(Halt::Eof);
                    return;
                }
                Some(Signal::Error(err)) => {
                    self.halt.fail(ScanError::Source(err));
                    return;
                }
            }

            if n > 0 {
                self.idle = 0;
                return;
            }
            if !self.idle() {
                return;
            }
        }
    }

    /// Counts a round without progress. Returns `false` once the ceiling is
    /// passed, after recording [`ScanError::NoProgress`].
    fn idle(&mut self) -> bool {
        self.idle += 1;
        if self.idle > MAX_CONSECUTIVE_IDLE {
            self.halt.fail(ScanError::NoProgress);
            return false;
        }
        true
    }
}

impl<S, F> Scanner<S, F> {
    /// Bytes of the token produced by the last successful
    /// [`advance`](Scanner::advance).
    ///
    /// When the split callback produced several tokens in one step this is
    /// their concatenation; use [`tokens`](Scanner::tokens) to tell them
    /// apart.
    #[must_use]
    pub fn token(&self) -> &[u8] {
        self.out.bytes()
    }

    /// Copies the current token out of the scanner.
    #[must_use]
    pub fn token_vec(&self) -> Vec<u8> {
        self.out.bytes().to_vec()
    }

    /// Everything the split callback produced in its last call: the
    /// individual tokens and any gap bytes.
    #[must_use]
    pub fn tokens(&self) -> &Tokens {
        &self.out
    }

    /// Bytes the split callback consumed without delivering them as a token
    /// during its last call, such as a truncated frame at end of input.
    #[must_use]
    pub fn gaps(&self) -> &[u8] {
        self.out.gaps()
    }

    /// The first genuine error that stopped the scan.
    ///
    /// `None` while scanning, and after a clean stop at end of input or after
    /// a final token.
    #[must_use]
    pub fn err(&self) -> Option<&ScanError> {
        self.halt.error()
    }

    /// Whether [`advance`](Scanner::advance) has returned `false`.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes read from the source but not yet consumed by the split callback.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        self.window.unconsumed()
    }

    /// The buffer ceiling, in bytes.
    #[must_use]
    pub fn max_buffer(&self) -> usize {
        self.max_buffer
    }

    /// Returns a reference to the byte source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Consumes the scanner, returning the genuine error that stopped it, if
    /// any.
    ///
    /// # Errors
    ///
    /// The same error [`err`](Scanner::err) reports.
    pub fn finish(mut self) -> Result<(), ScanError> {
        match self.halt.take_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Releases the source and the buffer allocation, so the buffer can be
    /// handed to the next scanner through [`ScannerBuilder::buffer`].
    ///
    /// The returned vector is empty; only its capacity is kept.
    pub fn into_parts(self) -> (S, Vec<u8>) {
        (self.source, self.window.into_buffer())
    }
}

impl<S, F> fmt::Debug for Scanner<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("buffered", &BStr::new(self.window.unconsumed()))
            .field("capacity", &self.window.capacity())
            .field("max_buffer", &self.max_buffer)
            .field("tokens", &self.out)
            .field("halt", &self.halt)
            .field("idle", &self.idle)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// Configures a [`Scanner`].
///
/// ```rust
/// use tokscan::{Scanner, split::scan_lines};
///
/// let mut scanner = Scanner::builder(tokscan::IoSource::new(&b"one\ntwo"[..]))
///     .split(scan_lines)
///     .max_buffer(16)
///     .buffer(Vec::with_capacity(8))
///     .build();
/// assert!(scanner.advance());
/// assert_eq!(scanner.token(), b"one");
/// ```
#[derive(Debug)]
pub struct ScannerBuilder<S, F = SplitFn> {
    source: S,
    split: F,
    buffer: Option<Vec<u8>>,
    options: ScannerOptions,
}

impl<S: ByteSource> ScannerBuilder<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            split: scan_bytes,
            buffer: None,
            options: ScannerOptions::default(),
        }
    }
}

impl<S: ByteSource, F: Split> ScannerBuilder<S, F> {
    /// Sets the split callback. Defaults to
    /// [`scan_bytes`](crate::split::scan_bytes).
    pub fn split<G: Split>(self, split: G) -> ScannerBuilder<S, G> {
        ScannerBuilder {
            source: self.source,
            split,
            buffer: self.buffer,
            options: self.options,
        }
    }

    /// Replaces all options.
    #[must_use]
    pub fn options(mut self, options: ScannerOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets [`ScannerOptions::max_buffer`].
    #[must_use]
    pub fn max_buffer(mut self, max_buffer: usize) -> Self {
        self.options.max_buffer = max_buffer;
        self
    }

    /// Supplies the initial buffer. Its whole allocation becomes scanner
    /// capacity; its contents are ignored.
    #[must_use]
    pub fn buffer(mut self, buffer: Vec<u8>) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// Builds the scanner.
    pub fn build(self) -> Scanner<S, F> {
        let buffer = self
            .buffer
            .unwrap_or_else(|| Vec::with_capacity(self.options.initial_capacity));
        Scanner::from_parts(self.source, self.split, buffer, &self.options)
    }
}
