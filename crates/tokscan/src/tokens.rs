//! Output containers filled by split callbacks.

use core::{fmt, iter::FusedIterator};

use bstr::BStr;

/// Tokens produced by one split call.
///
/// A split callback appends token bytes with [`push`](Tokens::push), which
/// also records the token length, and may stash undeliverable trailing bytes
/// with [`push_gap`](Tokens::push_gap). The scanner clears the containers
/// before every split call and reuses their allocations, so a steady-state
/// scan does not allocate.
///
/// A token counts as produced once its length is recorded, so an empty token
/// (an empty line, an empty CSV field) is still a token.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Tokens {
    bytes: Vec<u8>,
    lengths: Vec<usize>,
    gaps: Vec<u8>,
}

impl Tokens {
    /// Creates empty containers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one token.
    pub fn push(&mut self, token: &[u8]) {
        self.bytes.extend_from_slice(token);
        self.lengths.push(token.len());
    }

    /// Appends bytes that were consumed without forming a token, such as a
    /// truncated frame at end-of-input.
    pub fn push_gap(&mut self, bytes: &[u8]) {
        self.gaps.extend_from_slice(bytes);
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Whether no token was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Concatenated bytes of every token.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of each token, in order.
    #[must_use]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Gap bytes.
    #[must_use]
    pub fn gaps(&self) -> &[u8] {
        &self.gaps
    }

    /// Returns the `index`-th token.
    ///
    /// Walks the lengths of the tokens before it, so this is linear in
    /// `index`; use [`iter`](Tokens::iter) to visit every token.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let len = *self.lengths.get(index)?;
        let start: usize = self.lengths[..index].iter().sum();
        self.bytes.get(start..start + len)
    }

    /// Iterates over the tokens.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bytes: &self.bytes,
            lengths: self.lengths.iter(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.bytes.clear();
        self.lengths.clear();
        self.gaps.clear();
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokens")
            .field("tokens", &self.iter().map(BStr::new).collect::<Vec<_>>())
            .field("gaps", &BStr::new(&self.gaps))
            .finish()
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a [u8];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the tokens in a [`Tokens`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    bytes: &'a [u8],
    lengths: core::slice::Iter<'a, usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.lengths.next()?;
        let (token, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lengths.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
