//! The core diagnostic type for the Inkdoc error system.

use std::fmt;

use inkdoc_core::settings::SettingsError;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E103]: unknown tag `@retrun`
///   --> src/reader.js:12:5
///    |
/// 12 | /**
/// 13 |  * Reads the next chunk.
/// 14 |  * @method .read
/// 15 |  * @retrun {string}
/// 16 |  */
///    | ^^^ in this doc block
///    |
///    = help: set `ignore_invalid_tags` to drop unknown tags
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use inkdoc_parser::error::{Diagnostic, ErrorCode};
    /// # use inkdoc_parser::Span;
    /// let diag = Diagnostic::error("element tag `@class` has no name")
    ///     .with_code(ErrorCode::E102)
    ///     .with_label(Span::new(0..24), "in this doc block");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

}

impl From<&SettingsError> for Diagnostic {
    fn from(err: &SettingsError) -> Self {
        let diag = Diagnostic::error(err.to_string()).with_code(ErrorCode::for_settings(err));
        match err {
            SettingsError::MissingSettingsProperty { .. } => {
                diag.with_help("define the property on the root tag type")
            }
            SettingsError::UnknownParentType { .. } => {
                diag.with_help("declare the parent type or remove `parent_type`")
            }
            _ => diag,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        f.write_str("error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
