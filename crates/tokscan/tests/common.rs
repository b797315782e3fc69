#![allow(missing_docs)]
#![allow(dead_code)]

use std::io::{self, Read};

use tokscan::{ByteSource, Scanner, Split};

/// A reader that hands out at most `max` bytes per call and reports
/// `Interrupted` before every `every`-th read.
pub struct Trickle<R> {
    inner: R,
    max: usize,
    every: usize,
    reads: usize,
}

impl<R: Read> Trickle<R> {
    pub fn new(inner: R, max: usize) -> Self {
        Self {
            inner,
            max,
            every: 0,
            reads: 0,
        }
    }

    pub fn interrupt_every(mut self, every: usize) -> Self {
        self.every = every;
        self
    }
}

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        if self.every > 0 && self.reads % self.every == 0 {
            return Err(io::ErrorKind::Interrupted.into());
        }
        let n = buf.len().min(self.max);
        self.inner.read(&mut buf[..n])
    }
}

/// Collects the remaining tokens as lossy text.
pub fn collect<S: ByteSource, F: Split>(scanner: &mut Scanner<S, F>) -> Vec<String> {
    let mut tokens = Vec::new();
    while scanner.advance() {
        tokens.push(String::from_utf8_lossy(scanner.token()).into_owned());
    }
    tokens
}
