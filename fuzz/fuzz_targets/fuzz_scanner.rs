#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tokscan::{
    ByteSource, Fill, Scanner, Split,
    split::{HeaderWidth, LengthPrefixed, scan_bytes, scan_lines, scan_runes, scan_words},
};

#[derive(Debug, Arbitrary)]
enum Splitter {
    Bytes,
    Runes,
    Lines,
    Words,
    Frames(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    splitter: Splitter,
    max_buffer: u16,
    chunks: Vec<u8>,
    data: Vec<u8>,
}

/// Hands out `data` in chunks cycling through `chunks`, or all at once when
/// `chunks` is empty.
struct Source<'a> {
    data: &'a [u8],
    chunks: &'a [u8],
    step: usize,
}

impl ByteSource for Source<'_> {
    fn fill(&mut self, region: &mut [u8]) -> Fill {
        if self.data.is_empty() {
            return Fill::eof(0);
        }
        let size = match self.chunks {
            [] => self.data.len(),
            chunks => usize::from(chunks[self.step % chunks.len()]),
        };
        self.step += 1;
        let n = size.min(region.len()).min(self.data.len());
        region[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Fill::bytes(n as isize)
    }
}

fn scan<F: Split>(input: &Input, chunks: &[u8], split: F) -> (Vec<Vec<u8>>, bool) {
    let max_buffer = usize::from(input.max_buffer);
    let source = Source {
        data: &input.data,
        chunks,
        step: 0,
    };
    let mut scanner = Scanner::builder(source)
        .split(split)
        .max_buffer(max_buffer)
        .build();
    let mut tokens = Vec::new();
    while scanner.advance() {
        assert!(scanner.token().len() <= scanner.max_buffer());
        tokens.push(scanner.token_vec());
    }
    assert!(!scanner.advance());
    (tokens, scanner.err().is_none())
}

fn check<F: Split + Clone>(input: &Input, split: F) {
    let (whole, whole_ok) = scan(input, &[], split.clone());
    let (parted, parted_ok) = scan(input, &input.chunks, split);
    if whole_ok && parted_ok {
        assert_eq!(whole, parted);
    }
}

fuzz_target!(|input: Input| {
    match input.splitter {
        Splitter::Bytes => check(&input, scan_bytes),
        Splitter::Runes => check(&input, scan_runes),
        Splitter::Lines => check(&input, scan_lines),
        Splitter::Words => check(&input, scan_words),
        Splitter::Frames(width) => {
            let width = match width % 3 {
                0 => HeaderWidth::One,
                1 => HeaderWidth::Two,
                _ => HeaderWidth::Four,
            };
            check(&input, LengthPrefixed::new(width));
        }
    }
});
