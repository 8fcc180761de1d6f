//! Error and diagnostic system for the Inkdoc parser.
//!
//! Every failure while parsing a file is reported as a [`Diagnostic`]: a
//! message with an [`ErrorCode`], labelled source spans and optional help
//! text. Diagnostics are wrapped in [`ParseError`] when they leave the crate.
//!
//! Parsing is fail-fast: the first diagnostic aborts the current file, so a
//! [`ParseError`] returned by [`DocParser::parse`](crate::DocParser::parse)
//! carries exactly one diagnostic. Configuration problems found while
//! building a parser are reported the same way.
//!
//! # Example
//!
//! ```
//! # use inkdoc_parser::error::{Diagnostic, ErrorCode};
//! # use inkdoc_parser::Span;
//! let block = Span::new(0..42);
//!
//! let diag = Diagnostic::error("doc block declares no element")
//!     .with_code(ErrorCode::E100)
//!     .with_label(block, "in this doc block")
//!     .with_help("add an element tag such as `@class Name`");
//!
//! assert_eq!(diag.to_string(), "error[E100]: doc block declares no element");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
