//! Cursor: forward-only byte reader over one input line, with a single step of unread.

/// Bytes handed back by a read that ran into the end of the input.
///
/// Carries whatever was available, so callers can decide whether a partial
/// read is good enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Short<'a>(pub &'a [u8]);

/// Result of a multi-byte read: the full span, or what was left before the end.
pub type Read<'a> = Result<&'a [u8], Short<'a>>;

/// Position-tracking reader over an immutable byte slice.
///
/// Not safe for concurrent use; every parse owns its own cursor.
#[derive(Debug)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
    /// Set after a read that consumed a byte which may be given back.
    unreadable: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            unreadable: false,
        }
    }

    /// Zero-based offset of the next byte to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying input.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position == self.bytes.len()
    }

    /// Returns the next `n` bytes without consuming them.
    ///
    /// Fewer than `n` remaining yields `Err(Short)` holding everything left.
    pub fn peek(&self, n: usize) -> Read<'a> {
        let rest = &self.bytes[self.position..];
        if n > rest.len() {
            Err(Short(rest))
        } else {
            Ok(&rest[..n])
        }
    }

    /// Skips up to `n` bytes and returns how many were skipped.
    pub fn discard(&mut self, n: usize) -> usize {
        let n = n.min(self.remaining());
        self.position += n;
        self.unreadable = false;
        n
    }

    /// Reads a single byte, `None` at the end of the input.
    pub fn read_byte(&mut self) -> Option<u8> {
        let c = *self.bytes.get(self.position)?;
        self.position += 1;
        self.unreadable = true;
        Some(c)
    }

    /// Gives back the byte consumed by the last `read_byte`, or the delimiter
    /// consumed by the last successful `read_until`.
    ///
    /// # Panics
    ///
    /// Panics when nothing was read, and in debug builds when called twice in a row.
    pub fn unread_byte(&mut self) {
        assert!(self.position > 0, "can't unread byte");
        debug_assert!(self.unreadable, "can't unread more than one byte");
        self.position -= 1;
        self.unreadable = false;
    }

    /// Reads up to and including the first `delimiter`.
    ///
    /// When the delimiter is missing the whole remainder is consumed and
    /// returned as `Err(Short)`.
    pub fn read_until(&mut self, delimiter: u8) -> Read<'a> {
        let rest = &self.bytes[self.position..];
        match rest.iter().position(|&c| c == delimiter) {
            Some(idx) => {
                self.position += idx + 1;
                self.unreadable = true;
                Ok(&rest[..=idx])
            }
            None => {
                self.position = self.bytes.len();
                self.unreadable = false;
                Err(Short(rest))
            }
        }
    }

    /// Consumes and returns everything that is left.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let rest = &self.bytes[self.position..];
        self.position = self.bytes.len();
        self.unreadable = false;
        rest
    }
}
