//! Configuration types for Inkdoc.
//!
//! This module provides configuration structures that control how doc
//! blocks are parsed, which tag settings are used and which source files
//! are processed. All types implement [`serde::Deserialize`] for loading
//! from a TOML configuration file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`ParserConfig`] - Delimiter and tag patterns, re-exported from the parser.
//! - [`TagsConfig`] - Where the tag settings table comes from.
//! - [`DiscoveryConfig`] - Input paths and file filters.
//!
//! # Example
//!
//! ```
//! # use inkdoc::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [parser]
//!     ignore_invalid_tags = true
//!
//!     [discovery]
//!     file_pattern = '.*\.py$'
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(config.parser().ignore_invalid_tags);
//! assert_eq!(config.discovery().file_pattern(), r".*\.py$");
//! assert!(config.tags().path().is_none());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use inkdoc_parser::ParserConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,

    /// Tag settings section.
    #[serde(default)]
    tags: TagsConfig,

    /// Source discovery section.
    #[serde(default)]
    discovery: DiscoveryConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(parser: ParserConfig, tags: TagsConfig, discovery: DiscoveryConfig) -> Self {
        Self {
            parser,
            tags,
            discovery,
        }
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }

    /// Returns the tag settings configuration.
    pub fn tags(&self) -> &TagsConfig {
        &self.tags
    }

    /// Returns the source discovery configuration.
    pub fn discovery(&self) -> &DiscoveryConfig {
        &self.discovery
    }
}

/// Source of the tag settings table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagsConfig {
    /// Path of a TOML or JSON tag settings file. The built-in table is used
    /// when unset.
    #[serde(default)]
    path: Option<PathBuf>,
}

impl TagsConfig {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Returns the configured tag settings file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Which files are handed to the parser.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Files and directories to scan.
    inputs: Vec<PathBuf>,

    /// Regex a file name must match to be parsed.
    file_pattern: String,

    /// Regex of file names to skip.
    ignore_file_pattern: Option<String>,

    /// Regexes of directory names to skip, together with their contents.
    ignore_dir_patterns: Vec<String>,

    /// Report every discovered file in the output, not only those with
    /// doc blocks.
    all_source_files: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            inputs: vec![PathBuf::from(".")],
            file_pattern: r".*\.js$".to_string(),
            ignore_file_pattern: None,
            ignore_dir_patterns: Vec::new(),
            all_source_files: false,
        }
    }
}

impl DiscoveryConfig {
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn file_pattern(&self) -> &str {
        &self.file_pattern
    }

    pub fn ignore_file_pattern(&self) -> Option<&str> {
        self.ignore_file_pattern.as_deref()
    }

    pub fn ignore_dir_patterns(&self) -> &[String] {
        &self.ignore_dir_patterns
    }

    pub fn all_source_files(&self) -> bool {
        self.all_source_files
    }

    /// Replaces the configured inputs.
    pub fn with_inputs(mut self, inputs: Vec<PathBuf>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_ignore_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_file_pattern = Some(pattern.into());
        self
    }

    pub fn with_ignore_dir_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_dir_patterns.push(pattern.into());
        self
    }

    pub fn with_all_source_files(mut self, all: bool) -> Self {
        self.all_source_files = all;
        self
    }
}
