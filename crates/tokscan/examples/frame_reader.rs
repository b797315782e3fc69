//! Reads length-prefixed frames from standard input, or from a built-in
//! sample when standard input is a terminal, and prints one line per frame.
//!
//! Each frame is a two-byte big-endian length followed by that many payload
//! bytes. A frame cut short by end-of-input is reported, not printed.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=tokscan=trace cargo run -p tokscan --example frame_reader
//! printf '\x00\x05hello\x00\x01!' | cargo run -p tokscan --example frame_reader
//! ```

use std::{
    io::{self, IsTerminal, Read},
    process::ExitCode,
};

use bstr::ByteSlice;
use tokscan::{
    IoSource, Scanner,
    split::{HeaderWidth, LengthPrefixed},
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const SAMPLE: &[u8] = b"\x00\x0bhello world\x00\x00\x00\x06\xF0\x9F\xA6\x80!!\x00\x10trunc";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}

fn scan<R: Read>(reader: R) -> ExitCode {
    let mut scanner = Scanner::builder(IoSource::new(reader))
        .split(LengthPrefixed::new(HeaderWidth::Two))
        .max_buffer(usize::from(u16::MAX) + 2)
        .build();

    let mut frames = 0usize;
    while scanner.advance() {
        frames += 1;
        println!("{frames:>4} {:>5}B {:?}", scanner.token().len(), scanner.token().as_bstr());
    }
    if !scanner.gaps().is_empty() {
        warn!(bytes = scanner.gaps().len(), "input ends inside a frame");
    }

    match scanner.finish() {
        Ok(()) => {
            info!(frames, "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, frames, "scan failed");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let stdin = io::stdin();
    if stdin.is_terminal() {
        scan(SAMPLE)
    } else {
        scan(stdin.lock())
    }
}
