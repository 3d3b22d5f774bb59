//! Lintel Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Lintel
//! view-template toolchain:
//!
//! - **Locations**: 1-based source positions with absolute offsets
//!   ([`location::Location`])
//! - **Syntax tree**: the flat, ordered node model produced by the parser
//!   ([`syntax_tree`] module)
//! - **Diagnostics**: located error/warning records surfaced to consumers
//!   ([`diagnostic`] module)
//! - **Reporting**: the sink abstraction for forwarding diagnostics
//!   ([`reporting`] module)

pub mod diagnostic;
pub mod location;
pub mod reporting;
pub mod syntax_tree;

pub use diagnostic::{Diagnostic, Severity};
pub use location::Location;
pub use reporting::{DiagnosticCollector, Reporting};
