//! Documentation element types.
//!
//! - [`ElementRecord`] - What one doc block declares, before path resolution.
//! - [`DocElement`] - A node of the assembled [`DocTree`](crate::tree::DocTree).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    attribute::{AttributeKey, AttributeValue, Attributes},
    settings::{SettingsError, TagSettingsTable},
};

/// The element declared by a single doc block.
///
/// `declared_name` is kept exactly as written, so it may still be relative
/// (`.method`, `..inner`). The path resolver turns it into an absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementRecord {
    start_line: usize,
    end_line: usize,
    source_path: PathBuf,
    declared_name: String,
    alias_name: Option<String>,
    #[serde(rename = "type")]
    tag_type: String,
    description: String,
    attributes: Attributes,
}

impl ElementRecord {
    /// Creates a record for an element tag of canonical type `tag_type`.
    pub fn new(
        tag_type: impl Into<String>,
        declared_name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            start_line,
            end_line,
            source_path: source_path.into(),
            declared_name: declared_name.into(),
            alias_name: None,
            tag_type: tag_type.into(),
            description: String::new(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_alias_name(mut self, alias_name: Option<String>) -> Self {
        self.alias_name = alias_name;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias_name.as_deref()
    }

    pub fn tag_type(&self) -> &str {
        &self.tag_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A node of the element tree.
///
/// Nodes that only exist because a longer path runs through them are
/// *placeholders*: they have a name and children but no tag type and no
/// declaration data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocElement {
    path: String,
    name: String,
    alias_name: Option<String>,
    #[serde(rename = "type")]
    tag_type: Option<String>,
    start_line: Option<usize>,
    end_line: Option<usize>,
    source_path: Option<PathBuf>,
    description: Option<String>,
    attributes: Attributes,
    children: IndexMap<String, DocElement>,
}

impl DocElement {
    /// Creates a placeholder node at `path` whose last segment is `name`.
    pub fn placeholder(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            alias_name: None,
            tag_type: None,
            start_line: None,
            end_line: None,
            source_path: None,
            description: None,
            attributes: Attributes::new(),
            children: IndexMap::new(),
        }
    }

    /// Overwrites every declaration field from `record`.
    ///
    /// Children are left untouched, so a re-declared path keeps whatever was
    /// attached below it.
    pub fn apply(&mut self, record: ElementRecord) {
        self.alias_name = record.alias_name;
        self.tag_type = Some(record.tag_type);
        self.start_line = Some(record.start_line);
        self.end_line = Some(record.end_line);
        self.source_path = Some(record.source_path);
        self.description = Some(record.description);
        self.attributes = record.attributes;
    }

    /// Returns the absolute dotted path of this node.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the last path segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias_name.as_deref()
    }

    /// Returns the canonical tag type, or `None` for a placeholder.
    pub fn tag_type(&self) -> Option<&str> {
        self.tag_type.as_deref()
    }

    /// Returns `true` if some doc block declared this exact path.
    pub fn is_declared(&self) -> bool {
        self.tag_type.is_some()
    }

    pub fn start_line(&self) -> Option<usize> {
        self.start_line
    }

    pub fn end_line(&self) -> Option<usize> {
        self.end_line
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the attribute value, falling back to the tag type's default.
    ///
    /// Placeholders have no tag type and only ever return their own (empty)
    /// attributes.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownTagType`] if the element's tag type is
    /// not in `tags`.
    pub fn effective_attribute<'a>(
        &'a self,
        tags: &'a TagSettingsTable,
        key: AttributeKey,
    ) -> Result<Option<&'a AttributeValue>, SettingsError> {
        if let Some(value) = self.attributes.get(key) {
            return Ok(Some(value));
        }
        match &self.tag_type {
            Some(tag_type) => tags.attribute_default(tag_type, key),
            None => Ok(None),
        }
    }

    /// Returns the children keyed by their name segment, in insertion order.
    pub fn children(&self) -> &IndexMap<String, DocElement> {
        &self.children
    }

    /// Returns the child named `name`.
    pub fn child(&self, name: &str) -> Option<&DocElement> {
        self.children.get(name)
    }

    /// Returns the child named `name`, creating a placeholder if missing.
    pub fn child_or_placeholder(&mut self, name: &str) -> &mut DocElement {
        let path = format!("{}.{}", self.path, name);
        self.children
            .entry(name.to_string())
            .or_insert_with(|| DocElement::placeholder(path, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: &str) -> ElementRecord {
        ElementRecord::new("class", ".Parser", "src/parser.js", 3, 7).with_description(description)
    }

    #[test]
    fn test_placeholder_is_not_declared() {
        let element = DocElement::placeholder("core", "core");

        assert!(!element.is_declared());
        assert_eq!(element.tag_type(), None);
        assert_eq!(element.description(), None);
        assert!(element.children().is_empty());
    }

    #[test]
    fn test_apply_sets_declaration_fields() {
        let mut element = DocElement::placeholder("core.Parser", "Parser");
        element.apply(record("parses things").with_alias_name(Some("The Parser".into())));

        assert!(element.is_declared());
        assert_eq!(element.tag_type(), Some("class"));
        assert_eq!(element.alias_name(), Some("The Parser"));
        assert_eq!(element.start_line(), Some(3));
        assert_eq!(element.end_line(), Some(7));
        assert_eq!(element.source_path(), Some(Path::new("src/parser.js")));
        assert_eq!(element.description(), Some("parses things"));
        assert_eq!(element.name(), "Parser");
    }

    #[test]
    fn test_apply_keeps_children() {
        let mut element = DocElement::placeholder("core", "core");
        element.child_or_placeholder("inner");
        element.apply(record("first"));
        element.apply(record("second"));

        assert_eq!(element.description(), Some("second"));
        assert!(element.child("inner").is_some());
        assert_eq!(element.child("inner").unwrap().path(), "core.inner");
    }

    #[test]
    fn test_apply_replaces_attributes() {
        let mut first = Attributes::new();
        first.set(AttributeKey::Author, AttributeValue::Text("a".into()));
        let mut element = DocElement::placeholder("x", "x");
        element.apply(record("").with_attributes(first));
        element.apply(record(""));

        assert!(element.attributes().is_empty());
    }
}
