//! The reporting sink for forwarding diagnostics.
//!
//! Parsing and later lint phases accept a [`Reporting`] sink rather than
//! printing or collecting on their own. The parser currently only
//! forwards the sink (fatal failures are returned, not reported), but
//! non-fatal warning channels hang off this trait.

use log::debug;

use crate::diagnostic::Diagnostic;

/// A sink that accepts diagnostics as phases produce them.
pub trait Reporting {
    /// Report one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// A [`Reporting`] implementation that accumulates diagnostics.
///
/// # Example
///
/// ```
/// # use lintel_core::{Diagnostic, DiagnosticCollector, Location, Reporting};
/// let mut collector = DiagnosticCollector::new();
///
/// collector.report(Diagnostic::warning(
///     "view.html",
///     "void-element-closed",
///     Location::default(),
/// ));
///
/// assert!(collector.finish().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics reported so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Finish collection.
    ///
    /// Returns `Err` with every collected diagnostic when at least one
    /// error-severity diagnostic was reported, `Ok(())` otherwise
    /// (warnings alone do not fail the run).
    pub fn finish(self) -> Result<(), Vec<Diagnostic>> {
        if self.has_errors {
            Err(self.diagnostics)
        } else {
            Ok(())
        }
    }
}

impl Reporting for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        debug!(code = diagnostic.code(); "diagnostic reported");
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn error() -> Diagnostic {
        Diagnostic::error("view.html", "parser-error", Location::default())
    }

    fn warning() -> Diagnostic {
        Diagnostic::warning("view.html", "void-element-closed", Location::default())
    }

    #[test]
    fn test_collector_empty_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_error_finish_err() {
        let mut collector = DiagnosticCollector::new();
        collector.report(error());
        assert!(collector.finish().is_err());
    }

    #[test]
    fn test_collector_warnings_only_finish_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.report(warning());
        collector.report(warning());
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_order() {
        let mut collector = DiagnosticCollector::new();
        collector.report(warning());
        collector.report(error());

        let diagnostics = collector.finish().unwrap_err();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].severity().is_warning());
        assert!(diagnostics[1].severity().is_error());
    }
}
