//! The scanner buffer and its growth policy.
//!
//! The buffer is split into three zones:
//!
//! ```text
//! [0, start)      consumed, free to discard
//! [start, end)    buffered, not yet consumed
//! [end, len)      spare capacity
//! ```
//!
//! `0 <= start <= end <= buf.len()` always holds. `buf.len()` is the usable
//! capacity; the vector is kept zero-filled up to it so that spare regions
//! can be handed out as `&mut [u8]`.

use tracing::trace;

use crate::ScanError;

#[derive(Debug)]
pub(crate) struct Window {
    buf: Vec<u8>,
    start: usize,
    end: usize,
}

impl Window {
    /// Takes over `buf`'s allocation. Existing contents are not treated as
    /// input.
    pub(crate) fn new(mut buf: Vec<u8>) -> Self {
        buf.resize(buf.capacity(), 0);
        Self {
            buf,
            start: 0,
            end: 0,
        }
    }

    pub(crate) fn unconsumed(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }

    /// Checks a split advance against the buffered bytes.
    pub(crate) fn check_advance(&self, advance: isize) -> Result<usize, ScanError> {
        let advance = usize::try_from(advance).map_err(|_| ScanError::NegativeAdvance)?;
        if advance > self.end - self.start {
            return Err(ScanError::AdvanceTooFar);
        }
        Ok(advance)
    }

    /// Marks `n` checked bytes as consumed.
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(self.start + n <= self.end);
        self.start += n;
    }

    /// Shifts unconsumed bytes to the front when the buffer is full or more
    /// than half of it is consumed slack. Returns whether anything moved.
    pub(crate) fn compact(&mut self) -> bool {
        let capacity = self.buf.len();
        if self.start == 0 || (self.end != capacity && self.start <= capacity / 2) {
            return false;
        }
        trace!(start = self.start, end = self.end, capacity, "compacting window");
        self.buf.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
        true
    }

    /// Turns a split hint into the buffer offset reads must fill up to.
    ///
    /// The claim is bounded by `max`; this is the only place memory use per
    /// token is limited.
    pub(crate) fn claim(&self, hint: isize, max: usize) -> Result<usize, ScanError> {
        let hint = usize::try_from(hint).map_err(|_| ScanError::NegativeHint)?;
        match self.end.checked_add(hint) {
            Some(claim) if claim <= max => Ok(claim),
            _ => Err(ScanError::TooLong),
        }
    }

    /// Grows the buffer so that `claim` bytes fit.
    pub(crate) fn reserve(&mut self, claim: usize) {
        let capacity = self.buf.len();
        if claim <= capacity {
            return;
        }
        trace!(from = capacity, to = claim, "growing buffer");
        self.buf.resize(claim, 0);
    }

    /// The spare region reads fill, `[end, claim)`.
    pub(crate) fn spare(&mut self, claim: usize) -> &mut [u8] {
        &mut self.buf[self.end..claim]
    }

    /// Marks `n` bytes of the spare region as buffered.
    pub(crate) fn commit(&mut self, n: usize) {
        debug_assert!(self.end + n <= self.buf.len());
        self.end += n;
    }

    pub(crate) fn into_buffer(mut self) -> Vec<u8> {
        self.buf.clear();
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn window(capacity: usize, start: usize, end: usize) -> Window {
        let mut w = Window::new(vec![0; capacity]);
        for (i, b) in w.buf.iter_mut().enumerate() {
            *b = u8::try_from(i % 256).unwrap();
        }
        w.start = start;
        w.end = end;
        w
    }

    #[test]
    fn new_reuses_the_whole_allocation() {
        let w = Window::new(Vec::with_capacity(100));
        assert!(w.capacity() >= 100);
        assert!(w.is_empty());
        assert!(w.unconsumed().is_empty());
    }

    #[rstest]
    #[case::nothing_consumed(8, 0, 8, false)]
    #[case::full(8, 2, 8, true)]
    #[case::half_slack(8, 4, 6, false)]
    #[case::mostly_slack(8, 5, 6, true)]
    #[case::small_slack(8, 1, 3, false)]
    fn compaction_policy(
        #[case] capacity: usize,
        #[case] start: usize,
        #[case] end: usize,
        #[case] moves: bool,
    ) {
        let mut w = window(capacity, start, end);
        let before = w.unconsumed().to_vec();
        assert_eq!(w.compact(), moves);
        assert_eq!(w.unconsumed(), before);
        if moves {
            assert_eq!((w.start, w.end), (0, end - start));
        }
    }

    #[rstest]
    #[case(-1, Err("NegativeAdvance"))]
    #[case(0, Ok(0))]
    #[case(3, Ok(3))]
    #[case(4, Err("AdvanceTooFar"))]
    fn advance_validation(#[case] advance: isize, #[case] expected: Result<usize, &str>) {
        let w = window(8, 2, 5);
        let got = w.check_advance(advance).map_err(|e| format!("{e:?}"));
        assert_eq!(got, expected.map_err(str::to_owned));
    }

    #[test]
    fn claims_are_bounded() {
        let w = window(8, 0, 6);
        assert_eq!(w.claim(2, 8).unwrap(), 8);
        assert!(matches!(w.claim(3, 8), Err(ScanError::TooLong)));
        assert!(matches!(w.claim(-1, 8), Err(ScanError::NegativeHint)));

        let near_end = Window {
            buf: Vec::new(),
            start: 0,
            end: usize::MAX - 1,
        };
        assert!(matches!(near_end.claim(2, usize::MAX), Err(ScanError::TooLong)));
    }

    #[test]
    fn reserve_then_fill() {
        let mut w = window(4, 0, 4);
        let claim = w.claim(4, 16).unwrap();
        w.reserve(claim);
        assert_eq!(w.capacity(), 8);
        w.spare(claim)[..2].copy_from_slice(b"xy");
        w.commit(2);
        assert_eq!(w.end(), 6);
        assert_eq!(&w.unconsumed()[4..], b"xy");
    }
}
