//! Absolute character-offset spans used inside the parser.
//!
//! [`Span`] is the parser-internal position primitive; it is resolved to
//! the toolchain-wide 1-based [`lintel_core::Location`] convention by the
//! [`line_index`](super::line_index) module before nodes leave this crate.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from an offset range.
    pub fn new(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Get the start offset of the span.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both).
    pub fn union(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shift the span right by `offset`.
    pub fn offset(&self, offset: usize) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(0..0)
    }
}
