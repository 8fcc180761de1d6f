//! The per-file parsing pipeline.

use std::path::{Path, PathBuf};

use inkdoc_core::{element::ElementRecord, settings::TagSettingsTable};
use log::{debug, trace};

use crate::{
    classifier::Classifier,
    config::{ParserConfig, Patterns},
    error::{Diagnostic, ParseError},
    grammar::TextStyle,
    resolve::DeclarationHistory,
    scanner::Scanner,
    tokenizer::Tokenizer,
};

/// An element record with its resolved absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedElement {
    path: String,
    record: ElementRecord,
}

impl ResolvedElement {
    /// Returns the absolute dotted path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn record(&self) -> &ElementRecord {
        &self.record
    }

    pub fn into_parts(self) -> (String, ElementRecord) {
        (self.path, self.record)
    }
}

/// The elements declared in one source file, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    path: PathBuf,
    elements: Vec<ResolvedElement>,
}

impl ParsedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn elements(&self) -> &[ResolvedElement] {
        &self.elements
    }

    /// Returns `true` if the file declared no element.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Consumes the file, yielding `(path, record)` pairs ready to merge.
    pub fn into_records(self) -> impl Iterator<Item = (String, ElementRecord)> {
        self.elements.into_iter().map(ResolvedElement::into_parts)
    }
}

/// Doc comment parser for one configuration and tag settings table.
///
/// The parser holds no per-file state; each call to [`DocParser::parse`]
/// starts a fresh declaration history.
#[derive(Debug, Clone)]
pub struct DocParser {
    tags: TagSettingsTable,
    scanner: Scanner,
    tokenizer: Tokenizer,
    classifier: Classifier,
}

impl DocParser {
    /// Creates a parser.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if a configured pattern does not compile or
    /// the tag pattern has no `tag` group.
    pub fn new(config: &ParserConfig, tags: TagSettingsTable) -> Result<Self, ParseError> {
        let Patterns { open, close, tag } = Patterns::compile(config)?;

        Ok(Self {
            tags,
            scanner: Scanner::new(open, close, config.line_prefix.clone()),
            tokenizer: Tokenizer::new(tag),
            classifier: Classifier::new(
                config.ignore_invalid_tags,
                TextStyle::new(config.newline_replacement.clone()),
            ),
        })
    }

    /// Returns the tag settings table used for classification.
    pub fn tags(&self) -> &TagSettingsTable {
        &self.tags
    }

    /// Parses the doc blocks of one source file.
    ///
    /// `path` is recorded on every element; the file is not read.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for the first block that fails. Its primary
    /// label spans that block in `source`.
    pub fn parse(&self, path: impl AsRef<Path>, source: &str) -> Result<ParsedFile, ParseError> {
        let path = path.as_ref();
        let mut history = DeclarationHistory::new();
        let mut elements = Vec::new();
        let mut blocks = 0usize;

        for block in self.scanner.scan(source) {
            blocks += 1;

            // Step 1: Split into description and tags
            let Some(tokens) = self.tokenizer.tokenize(block.text()) else {
                trace!(line = block.start_line(); "Skipping doc block without tags");
                continue;
            };

            // Step 2: Classify tags into an element record
            let record = self
                .classifier
                .classify(&self.tags, &tokens, &block, path)
                .map_err(|rejection| {
                    let mut markers = self.tokenizer.marker_spans(source, block.span());
                    if markers.len() != tokens.tags().len() {
                        markers.clear();
                    }
                    rejection.into_diagnostic(block.span(), |index| markers.get(index).copied())
                })?;

            // Step 3: Resolve the declared name against earlier declarations
            let resolved = history
                .resolve(record.declared_name())
                .map_err(|err| Diagnostic::from(err).with_label(block.span(), "in this doc block"))?;

            trace!(
                path = resolved.as_str(),
                tag_type = record.tag_type(),
                line = block.start_line();
                "Parsed element"
            );
            elements.push(ResolvedElement {
                path: resolved,
                record,
            });
        }

        debug!(
            path:? = path,
            blocks,
            elements = elements.len();
            "Parsed source file"
        );

        Ok(ParsedFile {
            path: path.to_path_buf(),
            elements,
        })
    }
}
