//! Error types for Inkdoc operations.
//!
//! This module provides the main error type [`InkdocError`] which wraps
//! the error conditions that can occur while building documentation.

use std::{io, path::PathBuf};

use thiserror::Error;

use inkdoc_core::settings::SettingsError;
use inkdoc_parser::error::ParseError;

/// The main error type for Inkdoc operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the failing file's path and source text next
/// to the parser diagnostics, so their spans can be rendered as snippets.
#[derive(Debug, Error)]
pub enum InkdocError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Tag settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}: {err}", path.display())]
    Parse {
        err: ParseError,
        path: PathBuf,
        src: String,
    },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for InkdocError {
    fn from(error: serde_json::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl InkdocError {
    /// Create a new `Parse` error with the file path and source code.
    pub fn new_parse_error(err: ParseError, path: impl Into<PathBuf>, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            path: path.into(),
            src: src.into(),
        }
    }
}
