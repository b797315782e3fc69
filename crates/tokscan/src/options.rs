/// Default ceiling on the scanner buffer, in bytes.
pub const MAX_BUFFER: usize = 64 * 1024;

/// Configuration options for a [`Scanner`](crate::Scanner).
///
/// Options are fixed at construction time.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
///
/// use tokscan::{Scanner, ScannerOptions, split::scan_lines};
///
/// let options = ScannerOptions {
///     max_buffer: 1024,
///     ..Default::default()
/// };
/// let mut scanner = Scanner::builder(tokscan::IoSource::new(Cursor::new("a\nb\n")))
///     .split(scan_lines)
///     .options(options)
///     .build();
/// assert!(scanner.advance());
/// assert_eq!(scanner.token(), b"a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScannerOptions {
    /// The maximum number of bytes the scanner may buffer.
    ///
    /// This bounds the size of any single token, including whatever framing
    /// bytes the split callback needs to see alongside it (a newline, a length
    /// header). A split callback that needs more than this stops the scan with
    /// [`ScanError::TooLong`](crate::ScanError::TooLong).
    ///
    /// # Default
    ///
    /// [`MAX_BUFFER`] (64 KiB). Zero is treated as the default.
    pub max_buffer: usize,

    /// Bytes to allocate up front for the buffer.
    ///
    /// The buffer grows on demand regardless, so this only saves early
    /// reallocations. Ignored when an explicit buffer is supplied through
    /// [`ScannerBuilder::buffer`](crate::ScannerBuilder::buffer).
    ///
    /// # Default
    ///
    /// `0`
    pub initial_capacity: usize,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            max_buffer: MAX_BUFFER,
            initial_capacity: 0,
        }
    }
}

impl ScannerOptions {
    /// Effective buffer ceiling, mapping zero to [`MAX_BUFFER`].
    pub(crate) fn effective_max_buffer(&self) -> usize {
        if self.max_buffer == 0 {
            MAX_BUFFER
        } else {
            self.max_buffer
        }
    }
}
