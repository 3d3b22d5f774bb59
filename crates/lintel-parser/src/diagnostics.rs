//! Mapping raw parse failures to surface diagnostics.
//!
//! Raw errors carry 0-based columns and unshifted ranges. The surface
//! convention shifts first/last column and the range start by one while
//! leaving lines and the range end untouched, so a range stays
//! half-open over the original offsets.

use lintel_core::{Diagnostic, Location};

use crate::engine::RawParseError;

/// Code carried by every fatal parse diagnostic.
pub const PARSER_ERROR: &str = "parser-error";

pub(crate) fn parser_error(file_path: &str, error: RawParseError) -> Diagnostic {
    let loc = error.loc;
    let location = Location::new(
        loc.first_line(),
        loc.first_column() + 1,
        loc.last_line(),
        loc.last_column() + 1,
        loc.range_start() + 1..loc.range_end(),
    );

    Diagnostic::error(file_path, PARSER_ERROR, location)
        .with_expected(error.expected.join(", "))
        .with_text(error.text)
        .with_token(error.token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawParseError {
        RawParseError {
            expected: vec!["'>'".to_string(), "'/>'".to_string()],
            line: 2,
            loc: Location::new(2, 4, 2, 5, 10..11),
            text: "=".to_string(),
            token: "'='".to_string(),
        }
    }

    #[test]
    fn test_columns_and_range_start_shift() {
        let diag = parser_error("view.html", raw());
        let location = diag.location();

        assert_eq!(location.first_line(), 2);
        assert_eq!(location.first_column(), 5);
        assert_eq!(location.last_line(), 2);
        assert_eq!(location.last_column(), 6);
        assert_eq!(location.range_start(), 11);
        // Range end is not shifted
        assert_eq!(location.range_end(), 11);
    }

    #[test]
    fn test_diagnostic_contract_fields() {
        let diag = parser_error("view.html", raw());

        assert!(diag.severity().is_error());
        assert_eq!(diag.file_path(), "view.html");
        assert_eq!(diag.code(), PARSER_ERROR);
        assert_eq!(diag.expected(), "'>', '/>'");
        assert_eq!(diag.text(), "=");
        assert_eq!(diag.token(), "'='");
    }
}
