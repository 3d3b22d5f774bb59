//! Document parser for view templates with data-binding attributes.
//!
//! Parses an HTML/XML dialect into the flat, ordered syntax tree defined
//! in [`lintel_core::syntax_tree`]. Besides plain markup, the parser
//! recognizes binding expressions in configured attributes (always
//! including `data-bind`) and a family of comment directives for virtual
//! elements, context declarations, imports, and rule toggling.
//!
//! The pipeline is: strip a leading BOM, lex, run the token grammar
//! driven by a [`SyntaxFactory`], then in HTML mode normalize void
//! elements. The first failure anywhere in the pipeline produces
//! exactly one [`Diagnostic`] and no tree.
//!
//! # Example
//!
//! ```
//! # use lintel_core::DiagnosticCollector;
//! let document = "<ul data-bind=\"foreach: items\"><li></li></ul>";
//! let mut reporting = DiagnosticCollector::new();
//!
//! let nodes = lintel_parser::parse("view.html", document, &mut reporting, None, false)
//!     .expect("valid document");
//! assert_eq!(nodes.len(), 4);
//! ```

use log::debug;

use lintel_core::{Diagnostic, Reporting, syntax_tree::SyntaxNode};

mod builder;
mod diagnostics;
mod directive;
mod engine;
mod grammar;
mod lexer;
mod line_index;
mod normalize;
mod span;
mod tokens;


pub use builder::{DEFAULT_BINDING_ATTRIBUTE, SyntaxFactory};
pub use diagnostics::PARSER_ERROR;
pub use engine::{GrammarEngine, RawParseError};
pub use span::Span;

/// Parse a document into its flat node sequence.
///
/// `binding_names` extends the attribute names treated as binding
/// expressions; [`DEFAULT_BINDING_ATTRIBUTE`] is always included.
/// With `force_to_xml` the void-element normalization is skipped and
/// the markup is treated as XML.
///
/// The `reporting` sink is threaded through for parity with later lint
/// phases; parsing itself reports nothing non-fatal today. A failure
/// returns exactly one `parser-error` [`Diagnostic`] and discards any
/// partially built nodes.
pub fn parse<'s>(
    file_path: &str,
    document: &'s str,
    _reporting: &mut dyn Reporting,
    binding_names: Option<&[&str]>,
    force_to_xml: bool,
) -> Result<Vec<SyntaxNode<'s>>, Diagnostic> {
    let document = document.strip_prefix('\u{FEFF}').unwrap_or(document);

    let factory = SyntaxFactory::new(binding_names.unwrap_or(&[]));
    let engine = GrammarEngine::new(&factory).with_ranges(true);

    let nodes = engine
        .parse(document)
        .map_err(|error| diagnostics::parser_error(file_path, error))?;
    debug!("parsed {} nodes from {file_path}", nodes.len());

    if force_to_xml {
        Ok(nodes)
    } else {
        Ok(normalize::collapse_void_elements(nodes))
    }
}
