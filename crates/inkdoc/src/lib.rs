//! Inkdoc - Documentation extraction from annotated comment blocks.
//!
//! Doc blocks in source files are parsed into element records and merged
//! into one namespaced [`DocTree`] that a renderer can walk. Each file is
//! parsed in isolation; the tree is the only state shared between files.

pub mod config;
pub mod export;
pub mod tag_settings;

mod error;

pub use inkdoc_core::{attribute, element, settings, tree};

pub use error::InkdocError;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use inkdoc_core::{settings::TagSettingsTable, tree::DocTree};
use inkdoc_parser::DocParser;

use config::{AppConfig, ParserConfig};

/// Builder that parses source files and grows the element tree.
///
/// Files are merged in the order they are parsed; when two files declare
/// the same path the later one wins.
///
/// # Examples
///
/// ```rust
/// use inkdoc::{DocBuilder, config::ParserConfig, tag_settings};
///
/// let tags = tag_settings::builtin().expect("built-in tags are valid");
/// let mut builder = DocBuilder::new(&ParserConfig::default(), tags)
///     .expect("default patterns compile");
///
/// builder
///     .parse_source("shapes.js", "/**\n * A circle.\n * @class shapes.Circle\n */\n")
///     .expect("Failed to parse");
///
/// let docs = builder.finish();
/// assert!(docs.tree().get("shapes.Circle").is_some());
/// ```
#[derive(Debug)]
pub struct DocBuilder {
    parser: DocParser,
    tree: DocTree,
    source_files: Vec<PathBuf>,
    discovered_files: Vec<PathBuf>,
}

impl DocBuilder {
    /// Create a new builder.
    ///
    /// # Arguments
    ///
    /// * `config` - Delimiter and tag patterns used for every file
    /// * `tags` - Tag settings table used to classify element tags
    ///
    /// # Errors
    ///
    /// Returns [`InkdocError::Config`] if a configured pattern is invalid.
    pub fn new(config: &ParserConfig, tags: TagSettingsTable) -> Result<Self, InkdocError> {
        let parser = DocParser::new(config, tags)
            .map_err(|err| InkdocError::Config(format!("Invalid parser configuration: {err}")))?;

        Ok(Self {
            parser,
            tree: DocTree::new(),
            source_files: Vec::new(),
            discovered_files: Vec::new(),
        })
    }

    /// Create a builder from an application configuration.
    ///
    /// The tag settings file named in the configuration is loaded, or the
    /// built-in table when none is named.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag settings cannot be loaded or the parser
    /// configuration is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, InkdocError> {
        let tags = match config.tags().path() {
            Some(path) => tag_settings::load(path)?,
            None => tag_settings::builtin()?,
        };
        Self::new(config.parser(), tags)
    }

    /// Returns the tag settings table in use.
    pub fn tags(&self) -> &TagSettingsTable {
        self.parser.tags()
    }

    /// Returns the tree built so far.
    pub fn tree(&self) -> &DocTree {
        &self.tree
    }

    /// Parse the doc blocks of one file and merge its elements.
    ///
    /// Nothing from the file is merged unless every block in it parses.
    ///
    /// # Arguments
    ///
    /// * `path` - Path recorded on every element; the file is not read
    /// * `source` - Source text of the file
    ///
    /// # Errors
    ///
    /// Returns [`InkdocError::Parse`] with the file's path and source for
    /// the first block that fails.
    pub fn parse_source(&mut self, path: impl AsRef<Path>, source: &str) -> Result<(), InkdocError> {
        let path = path.as_ref();
        info!(path:? = path; "Processing source file");
        self.discovered_files.push(path.to_path_buf());

        let file = self
            .parser
            .parse(path, source)
            .map_err(|err| InkdocError::new_parse_error(err, path, source))?;

        if file.is_empty() {
            debug!(path:? = path; "No doc blocks with elements");
            return Ok(());
        }

        let elements = file.elements().len();
        self.source_files.push(path.to_path_buf());
        self.tree.merge_all(file.into_records());

        debug!(path:? = path, elements, tree_size = self.tree.len(); "Merged elements into tree");
        Ok(())
    }

    /// Read a UTF-8 file and parse it with [`DocBuilder::parse_source`].
    ///
    /// # Errors
    ///
    /// Returns [`InkdocError::Io`] if the file cannot be read, otherwise the
    /// errors of [`DocBuilder::parse_source`].
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<(), InkdocError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        self.parse_source(path, &source)
    }

    /// Finish building and return the collected documentation.
    pub fn finish(self) -> Documentation {
        info!(
            elements = self.tree.len(),
            source_files = self.source_files.len(),
            discovered_files = self.discovered_files.len();
            "Documentation built"
        );

        Documentation {
            tree: self.tree,
            source_files: self.source_files,
            discovered_files: self.discovered_files,
        }
    }
}

/// The result of a documentation run.
#[derive(Debug, Clone, Default)]
pub struct Documentation {
    tree: DocTree,
    source_files: Vec<PathBuf>,
    discovered_files: Vec<PathBuf>,
}

impl Documentation {
    /// Returns the assembled element tree.
    pub fn tree(&self) -> &DocTree {
        &self.tree
    }

    /// Returns the files that declared at least one element, in parse order.
    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }

    /// Returns every file handed to the builder, in parse order.
    pub fn discovered_files(&self) -> &[PathBuf] {
        &self.discovered_files
    }
}
