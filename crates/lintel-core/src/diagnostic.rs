//! Located diagnostics surfaced to the consuming toolchain.
//!
//! A [`Diagnostic`] is the compatibility-relevant contract between the
//! parser and every downstream consumer: a file path, a stable string
//! code, a 1-based [`Location`], and the raw failure details (joined
//! expected tokens, source text, token name).

use std::fmt;

use serde::Serialize;

use crate::location::Location;

/// The severity level of a diagnostic.
///
/// - [`Severity::Error`] indicates a fatal issue; the document could not
///   be parsed.
/// - [`Severity::Warning`] indicates an advisory issue that does not
///   invalidate the syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A structured, located error or warning record.
///
/// # Example
///
/// ```
/// # use lintel_core::{Diagnostic, Location};
/// let diag = Diagnostic::error("view.html", "parser-error", Location::new(1, 8, 1, 9, 7..8))
///     .with_expected("'>', attribute name")
///     .with_text("<div <")
///     .with_token("'<'");
///
/// assert_eq!(diag.to_string(), "view.html:1:8: error[parser-error]: expected '>', attribute name");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    severity: Severity,
    file_path: String,
    code: String,
    location: Location,
    expected: String,
    text: String,
    token: String,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(
        file_path: impl Into<String>,
        code: impl Into<String>,
        location: Location,
    ) -> Self {
        Self::new(Severity::Error, file_path, code, location)
    }

    /// Create a warning diagnostic.
    pub fn warning(
        file_path: impl Into<String>,
        code: impl Into<String>,
        location: Location,
    ) -> Self {
        Self::new(Severity::Warning, file_path, code, location)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the path of the offending document.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Get the stable code identifying this class of diagnostic.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the 1-based location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Get the joined list of tokens the grammar would have accepted.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Get the raw source text at the failure.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the name of the failing token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Set the joined expected-token list.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }

    /// Set the raw source text at the failure.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the failing token name.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    fn new(
        severity: Severity,
        file_path: impl Into<String>,
        code: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            severity,
            file_path: file_path.into(),
            code: code.into(),
            location,
            expected: String::new(),
            text: String::new(),
            token: String::new(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "path:line:col: error[code]: expected ..."
        write!(
            f,
            "{}:{}: {}[{}]",
            self.file_path, self.location, self.severity, self.code
        )?;
        if !self.expected.is_empty() {
            write!(f, ": expected {}", self.expected)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_location() -> Location {
        Location::new(2, 14, 2, 15, 29..30)
    }

    #[test]
    fn test_severity_predicates() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Error.is_warning());
        assert!(Severity::Warning.is_warning());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("view.html", "parser-error", sample_location());

        assert!(diag.severity().is_error());
        assert_eq!(diag.file_path(), "view.html");
        assert_eq!(diag.code(), "parser-error");
        assert_eq!(diag.location().first_line(), 2);
        assert_eq!(diag.expected(), "");
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("view.html", "parser-error", sample_location())
            .with_expected("'>', '/>'")
            .with_text("<br")
            .with_token("EOF");

        assert_eq!(diag.expected(), "'>', '/>'");
        assert_eq!(diag.text(), "<br");
        assert_eq!(diag.token(), "EOF");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("view.html", "parser-error", sample_location())
            .with_expected("'-->'");

        assert_eq!(
            diag.to_string(),
            "view.html:2:14: error[parser-error]: expected '-->'"
        );
    }

    #[test]
    fn test_diagnostic_display_without_expected() {
        let diag = Diagnostic::warning("view.html", "void-element-closed", sample_location());

        assert_eq!(
            diag.to_string(),
            "view.html:2:14: warning[void-element-closed]"
        );
    }

    #[test]
    fn test_diagnostic_serializes_camel_case() {
        let diag = Diagnostic::error("view.html", "parser-error", sample_location());
        let json = serde_json::to_string(&diag).expect("serializable");

        assert!(json.contains("\"filePath\""));
        assert!(json.contains("\"parser-error\""));
    }
}
