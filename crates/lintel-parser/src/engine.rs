//! The grammar engine: configuration facade over lexing and parsing.

use thiserror::Error;

use lintel_core::{Location, syntax_tree::SyntaxNode};

use crate::{builder::SyntaxFactory, grammar, lexer, line_index::LineIndex, span::Span};

/// A grammar-level parse failure, before diagnostic mapping.
///
/// Columns in `loc` are 0-based and the range start is unshifted; the
/// diagnostic mapper owns the +1 surface convention.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error on line {line}: expected {}, got {token}", .expected.join(", "))]
pub struct RawParseError {
    /// Constructs the grammar would have accepted at the failure point.
    pub expected: Vec<String>,
    /// 1-based line of the failure.
    pub line: usize,
    /// Failure location with 0-based columns.
    pub loc: Location,
    /// Raw source text at the failure.
    pub text: String,
    /// Name of the failing token (`EOF` at end of input, `INVALID` for
    /// lexical failures).
    pub token: String,
}

/// Drives a document through lexing and the grammar, building nodes via
/// a [`SyntaxFactory`].
///
/// Range tracking is off by default; enable it with
/// [`with_ranges`](Self::with_ranges) to populate `Location` ranges.
///
/// # Example
///
/// ```
/// # use lintel_parser::{GrammarEngine, SyntaxFactory};
/// let factory = SyntaxFactory::new(&[]);
/// let engine = GrammarEngine::new(&factory).with_ranges(true);
///
/// let nodes = engine.parse("<div data-bind=\"text: name\"></div>")?;
/// assert_eq!(nodes.len(), 2);
/// # Ok::<(), lintel_parser::RawParseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GrammarEngine<'f> {
    factory: &'f SyntaxFactory,
    track_ranges: bool,
}

impl<'f> GrammarEngine<'f> {
    pub fn new(factory: &'f SyntaxFactory) -> Self {
        Self {
            factory,
            track_ranges: false,
        }
    }

    /// Enable or disable offset-range tracking in produced locations.
    pub fn with_ranges(mut self, track_ranges: bool) -> Self {
        self.track_ranges = track_ranges;
        self
    }

    /// Parse a document into its flat node sequence.
    ///
    /// Fails with the first lexical or grammatical error; no nodes from
    /// a failed parse are returned.
    pub fn parse<'s>(&self, document: &'s str) -> Result<Vec<SyntaxNode<'s>>, RawParseError> {
        let lines = LineIndex::new(document);
        let tokens = lexer::tokenize(document)
            .map_err(|failure| self.lex_failure(document, &lines, failure))?;
        grammar::build_tree(document, &tokens, self.factory, &lines, self.track_ranges)
    }

    fn lex_failure(
        &self,
        document: &str,
        lines: &LineIndex,
        failure: lexer::LexFailure,
    ) -> RawParseError {
        let end = failure.span.end().min(document.len());
        let span = Span::new(failure.span.start().min(end)..end);

        RawParseError {
            expected: failure.expected,
            line: lines.position(span.start()).0,
            loc: lines.raw_location(span, self.track_ranges),
            text: document[span.start()..span.end()].to_string(),
            token: "INVALID".to_string(),
        }
    }
}
