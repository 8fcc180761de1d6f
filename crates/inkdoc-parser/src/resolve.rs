//! Element path resolution.
//!
//! Declared element names are dotted paths that may be relative to earlier
//! declarations in the same file. [`DeclarationHistory`] records the
//! absolute path of every element declared so far, in file order, and turns
//! each new declared name into an absolute path:
//!
//! - `name` or `a.b.name` is absolute.
//! - `.name` is relative to the history entry at index 0, `..name` to the
//!   entry at index 1, and so on: the number of leading dots picks the entry.
//! - Segments after the leading dots are appended to that entry.
//!
//! After each resolution the history is cut back to the entries up to the
//! depth just used and the new path is appended. Absolute names clear the
//! history. This is positional bookkeeping, not a walk of the element tree.
//!
//! ```
//! # use inkdoc_parser::DeclarationHistory;
//! let mut history = DeclarationHistory::new();
//! assert_eq!(history.resolve("core.docgenerator").unwrap(), "core.docgenerator");
//! assert_eq!(
//!     history.resolve(".DocumentationGenerator").unwrap(),
//!     "core.docgenerator.DocumentationGenerator"
//! );
//! assert_eq!(
//!     history.resolve("..__init__").unwrap(),
//!     "core.docgenerator.DocumentationGenerator.__init__"
//! );
//! ```

use log::trace;
use thiserror::Error;

use crate::error::{Diagnostic, ErrorCode};

/// Failure to resolve a declared element name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid element path `{name}`")]
    InvalidElementPath { name: String },

    #[error("element path `{name}` refers to parent {depth}, but only {available} declared before it")]
    NoParentElement {
        name: String,
        depth: usize,
        available: usize,
    },
}

impl PathError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PathError::InvalidElementPath { .. } => ErrorCode::E200,
            PathError::NoParentElement { .. } => ErrorCode::E201,
        }
    }
}

impl From<PathError> for Diagnostic {
    fn from(err: PathError) -> Self {
        let help = match &err {
            PathError::InvalidElementPath { .. } => {
                "element paths are dot-separated names, with optional leading dots"
            }
            PathError::NoParentElement { .. } => {
                "declare the parent element earlier in the file, or use fewer leading dots"
            }
        };
        Diagnostic::error(err.to_string())
            .with_code(err.code())
            .with_help(help)
    }
}

/// Absolute paths of the elements declared so far in one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationHistory {
    paths: Vec<String>,
}

impl DeclarationHistory {
    /// Creates an empty history for a new file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded paths, oldest first.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Resolves `declared` to an absolute path and records it.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidElementPath`] if the name ends with a dot
    /// or has an empty segment after its leading dots, and
    /// [`PathError::NoParentElement`] if it has more leading dots than there
    /// are recorded paths.
    pub fn resolve(&mut self, declared: &str) -> Result<String, PathError> {
        let invalid = || PathError::InvalidElementPath {
            name: declared.to_string(),
        };

        let mut segments: Vec<&str> = declared.split('.').collect();
        let leaf = segments.pop().unwrap_or_default();
        if leaf.is_empty() {
            return Err(invalid());
        }

        let mut prefix = String::new();
        // Index of the last history entry consulted; `None` for absolute names.
        let mut depth = None;

        if segments.first().is_some_and(|first| first.is_empty()) {
            for (index, segment) in segments.iter().enumerate() {
                depth = Some(index);
                if segment.is_empty() {
                    prefix = self
                        .paths
                        .get(index)
                        .ok_or_else(|| PathError::NoParentElement {
                            name: declared.to_string(),
                            depth: index + 1,
                            available: self.paths.len(),
                        })?
                        .clone();
                } else {
                    for segment in &segments[index..] {
                        if segment.is_empty() {
                            return Err(invalid());
                        }
                        prefix.push('.');
                        prefix.push_str(segment);
                    }
                    break;
                }
            }
        } else if !segments.is_empty() {
            if segments.iter().any(|segment| segment.is_empty()) {
                return Err(invalid());
            }
            prefix = segments.join(".");
        }

        let path = if prefix.is_empty() {
            leaf.to_string()
        } else {
            format!("{prefix}.{leaf}")
        };

        self.paths.truncate(depth.map_or(0, |depth| depth + 1));
        self.paths.push(path.clone());

        trace!(declared, path = path.as_str(); "Resolved element path");
        Ok(path)
    }
}
