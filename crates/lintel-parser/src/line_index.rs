//! Offset-to-line/column resolution.
//!
//! The lexer and grammar work in flat character offsets; the public tree
//! and diagnostics speak lines and columns. A [`LineIndex`] is built once
//! per document and resolves [`Span`]s in O(log n).

use lintel_core::Location;

use crate::span::Span;

#[derive(Debug)]
pub(crate) struct LineIndex {
    /// Offset of the first character of every line, in order. Always
    /// starts with 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(document: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in document.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    /// Resolve an offset to a 1-based line and 0-based column.
    pub(crate) fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line + 1, offset - self.line_starts[line])
    }

    /// Resolve a span to a [`Location`] with 1-based columns.
    ///
    /// With `track_ranges` disabled the range collapses to `0..0`.
    pub(crate) fn location(&self, span: Span, track_ranges: bool) -> Location {
        let (first_line, first_column) = self.position(span.start());
        let (last_line, last_column) = self.position(span.end());
        let range = if track_ranges {
            span.start()..span.end()
        } else {
            0..0
        };
        Location::new(first_line, first_column + 1, last_line, last_column + 1, range)
    }

    /// Resolve a span to a [`Location`] keeping 0-based columns.
    ///
    /// This is the convention of [`RawParseError`](crate::RawParseError);
    /// the diagnostic mapper shifts it afterwards.
    pub(crate) fn raw_location(&self, span: Span, track_ranges: bool) -> Location {
        let (first_line, first_column) = self.position(span.start());
        let (last_line, last_column) = self.position(span.end());
        let range = if track_ranges {
            span.start()..span.end()
        } else {
            0..0
        };
        Location::new(first_line, first_column, last_line, last_column, range)
    }
}
