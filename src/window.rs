//! Byte-range selection for windowed hashing.
//!
//! A [`HashWindow`] describes the byte range a caller wants hashed: a start
//! offset, a window length, and an optional absolute stop offset that
//! overrides the length. [`HashWindow::resolve`] turns that request plus the
//! current file size into the concrete [`ReadRange`] to read, backing the
//! window up or falling back to the start of the file when the file is
//! smaller than requested.
//!
//! Resolution is pure: no I/O, no state, same output for the same inputs.

/// A requested hash window, in bytes.
///
/// `stop`, when present, is the authoritative upper bound: the effective
/// window length becomes `stop - start` and `size` is ignored. User-facing
/// configuration is denominated in mebibytes and converted to bytes before a
/// `HashWindow` is built (see [`crate::config::HashConfig::resolve`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashWindow {
    /// Requested offset from the beginning of the file.
    pub start: u64,
    /// Requested window length, used when `stop` is absent.
    pub size: u64,
    /// Optional absolute end offset, overriding `size`.
    pub stop: Option<u64>,
}

/// A concrete byte range to read: resolved offset plus length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRange {
    /// Offset of the first byte to read.
    pub offset: u64,
    /// Number of bytes to request; reads truncate at end-of-file.
    pub length: u64,
}

impl HashWindow {
    /// Create a window from start offset and length, with no stop bound.
    #[must_use]
    pub fn new(start: u64, size: u64) -> Self {
        Self {
            start,
            size,
            stop: None,
        }
    }

    /// Set the absolute stop offset, which takes precedence over `size`.
    #[must_use]
    pub fn with_stop(mut self, stop: u64) -> Self {
        self.stop = Some(stop);
        self
    }

    /// The window length actually requested: `stop - start` when a stop
    /// offset is set (saturating at zero), `size` otherwise.
    #[must_use]
    pub fn requested_length(&self) -> u64 {
        match self.stop {
            Some(stop) => stop.saturating_sub(self.start),
            None => self.size,
        }
    }

    /// Resolve the window against a file's current size.
    ///
    /// Files that extend past the requested start are read at that offset.
    /// For files ending at or before the start the window backs up so the
    /// full length still fits, or falls back to offset zero when the file
    /// is smaller than the window itself. A file ending exactly at the
    /// start offset is handled like a short file so its tail gets hashed
    /// instead of an empty range.
    ///
    /// The returned length is always the requested length; the read itself
    /// truncates at end-of-file, which is not an error.
    ///
    /// # Example
    ///
    /// ```
    /// use fileprint::window::HashWindow;
    ///
    /// let window = HashWindow::new(50, 25);
    /// assert_eq!(window.resolve(1000).offset, 50);
    /// // File smaller than the window: hash from the beginning.
    /// assert_eq!(window.resolve(10).offset, 0);
    /// ```
    #[must_use]
    pub fn resolve(&self, file_size: u64) -> ReadRange {
        let length = self.requested_length();
        let offset = if file_size > self.start {
            self.start
        } else if file_size < length {
            0
        } else {
            file_size - length
        };
        ReadRange { offset, length }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_window_reads_at_requested_start() {
        let range = HashWindow::new(50, 25).resolve(1000);
        assert_eq!(
            range,
            ReadRange {
                offset: 50,
                length: 25
            }
        );
    }

    #[test]
    fn small_file_falls_back_to_origin() {
        // 10-byte file, window starts at 50: hash from the beginning,
        // the read truncates to the 10 bytes that exist.
        let range = HashWindow::new(50, 25).resolve(10);
        assert_eq!(
            range,
            ReadRange {
                offset: 0,
                length: 25
            }
        );
    }

    #[test]
    fn window_backs_up_when_file_ends_before_start() {
        let range = HashWindow::new(50, 20).resolve(30);
        assert_eq!(
            range,
            ReadRange {
                offset: 10,
                length: 20
            }
        );
    }

    #[test]
    fn stop_overrides_size() {
        let window = HashWindow::new(10, 999).with_stop(35);
        assert_eq!(window.requested_length(), 25);
        assert_eq!(window.resolve(1_000_000).length, 25);
        assert_eq!(window.resolve(5).length, 25);
    }

    #[test]
    fn file_ending_at_start_hashes_the_tail() {
        // Equality goes down the short-file path: a 50-byte file with a
        // window starting at 50 hashes its last 25 bytes, not nothing.
        let range = HashWindow::new(50, 25).resolve(50);
        assert_eq!(
            range,
            ReadRange {
                offset: 25,
                length: 25
            }
        );
    }

    #[test]
    fn empty_file_resolves_to_origin() {
        let range = HashWindow::new(50, 25).resolve(0);
        assert_eq!(
            range,
            ReadRange {
                offset: 0,
                length: 25
            }
        );
    }

    #[test]
    fn stop_equal_to_start_yields_empty_range() {
        let window = HashWindow::new(40, 25).with_stop(40);
        assert_eq!(window.resolve(100).length, 0);
    }

    #[test]
    fn stop_before_start_saturates_to_zero() {
        let window = HashWindow::new(40, 25).with_stop(30);
        assert_eq!(window.requested_length(), 0);
    }

    #[test]
    fn resolve_is_deterministic() {
        let window = HashWindow::new(50, 25).with_stop(80);
        for _ in 0..3 {
            assert_eq!(window.resolve(64), window.resolve(64));
        }
    }
}
