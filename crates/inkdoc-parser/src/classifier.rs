//! Tag classification.
//!
//! Each tag of a tokenized block is one of:
//!
//! 1. an **element tag**, when its name is a tag type or an alias of one in
//!    the [`TagSettingsTable`]. It gives the block its tag type and name;
//! 2. a **property tag**, when its name is a [`PropertyTag`]. Its value is
//!    parsed by the matching grammar into an attribute;
//! 3. an **unknown tag**, which is an error unless unknown tags are ignored.
//!
//! Element tags are checked first, so a tag type named like a property tag
//! shadows it. A block must end up with exactly one element tag.
//!
//! A refused block is reported as a [`Rejection`] that remembers which tag
//! segments are at fault, so the parser can point at them in the source.

use std::path::Path;

use inkdoc_core::{attribute::Attributes, element::ElementRecord, settings::TagSettingsTable};
use log::trace;

use crate::{
    error::{Diagnostic, ErrorCode},
    grammar::{self, ElementName, Property, PropertyTag, TextStyle},
    scanner::Block,
    span::Span,
    tokenizer::TokenizedBlock,
};

/// A block the classifier refused, with the tags the failure concerns.
#[derive(Debug)]
pub struct Rejection {
    diagnostic: Diagnostic,
    tags: Vec<(usize, &'static str)>,
}

impl Rejection {
    fn new(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostic,
            tags: Vec::new(),
        }
    }

    /// Marks the tag segment at `index` with a secondary label.
    fn with_tag(mut self, index: usize, label: &'static str) -> Self {
        self.tags.push((index, label));
        self
    }

    /// Labels the whole block, then every tag `locate` can place in the
    /// source.
    pub fn into_diagnostic(self, block: Span, locate: impl Fn(usize) -> Option<Span>) -> Diagnostic {
        self.tags.into_iter().fold(
            self.diagnostic.with_label(block, "in this doc block"),
            |diagnostic, (index, label)| match locate(index) {
                Some(span) => diagnostic.with_secondary_label(span, label),
                None => diagnostic,
            },
        )
    }
}

/// Turns tokenized blocks into element records.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    ignore_invalid_tags: bool,
    style: TextStyle,
}

impl Classifier {
    pub fn new(ignore_invalid_tags: bool, style: TextStyle) -> Self {
        Self {
            ignore_invalid_tags,
            style,
        }
    }

    /// Classifies the tags of one block and builds its record.
    ///
    /// # Errors
    ///
    /// Fails on the first tag that breaks a rule: a second element tag
    /// ([`ErrorCode::E101`]), an element tag without a name
    /// ([`ErrorCode::E102`]), an unknown tag ([`ErrorCode::E103`]) or a
    /// malformed property value ([`ErrorCode::E104`]). A block without any
    /// element tag fails with [`ErrorCode::E100`].
    pub fn classify(
        &self,
        tags: &TagSettingsTable,
        tokens: &TokenizedBlock<'_>,
        block: &Block,
        source_path: &Path,
    ) -> Result<ElementRecord, Rejection> {
        let mut element: Option<(usize, &str, &str, ElementName)> = None;
        let mut attributes = Attributes::new();

        for (index, segment) in tokens.tags().iter().enumerate() {
            let name = segment.name();

            if let Some(tag_type) = tags.canonical_name(name) {
                if let Some((first_index, _, first, _)) = &element {
                    let diagnostic = Diagnostic::error(format!(
                        "doc block declares more than one element: `@{first}` and `@{name}`"
                    ))
                    .with_code(ErrorCode::E101)
                    .with_help("document each element in its own doc block");
                    return Err(Rejection::new(diagnostic)
                        .with_tag(*first_index, "first element tag")
                        .with_tag(index, "second element tag"));
                }

                let element_name = grammar::element_name(segment.value()).ok_or_else(|| {
                    let diagnostic = Diagnostic::error(format!("element tag `@{name}` has no name"))
                        .with_code(ErrorCode::E102)
                        .with_help(format!("write the element name after the tag: `@{name} name`"));
                    Rejection::new(diagnostic).with_tag(index, "name expected after this tag")
                })?;
                element = Some((index, tag_type, name, element_name));
            } else if let Some(tag) = PropertyTag::from_name(name) {
                let property = grammar::extract(tag, segment.value(), &self.style)
                    .map_err(|diagnostic| Rejection::new(diagnostic).with_tag(index, "malformed value"))?;
                match property {
                    Property::Set(key, value) => attributes.set(key, value),
                    Property::Param(param) => attributes.push_param(param),
                    Property::Example(example) => attributes.push_example(example),
                }
            } else if self.ignore_invalid_tags {
                trace!(tag = name; "Ignoring unknown tag");
            } else {
                let diagnostic = Diagnostic::error(format!("unknown tag `@{name}`"))
                    .with_code(ErrorCode::E103)
                    .with_help("set `ignore_invalid_tags = true` to drop unknown tags");
                return Err(Rejection::new(diagnostic).with_tag(index, "unknown tag"));
            }
        }

        let Some((_, tag_type, _, name)) = element else {
            return Err(Rejection::new(
                Diagnostic::error("doc block has tags but no element tag")
                    .with_code(ErrorCode::E100)
                    .with_help("add an element tag such as `@function name`"),
            ));
        };

        Ok(ElementRecord::new(
            tag_type,
            name.declared,
            source_path,
            block.start_line(),
            block.end_line(),
        )
        .with_alias_name(name.alias)
        .with_description(self.style.render(tokens.description()))
        .with_attributes(attributes))
    }
}
