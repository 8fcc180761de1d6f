//! The namespaced documentation element tree.
//!
//! A [`DocTree`] is created empty and grows as the records of each parsed
//! file are merged into it. It is never pruned. Every node is reachable from
//! the root by splitting its path on `.`; segments that appear only as a
//! prefix of some longer path exist as placeholder nodes.
//!
//! Merging a record at a path that already exists overwrites the node's
//! declaration fields (last writer wins) and keeps its children.

use indexmap::{IndexMap, map::Values};
use log::trace;
use serde::Serialize;

use crate::{
    element::{DocElement, ElementRecord},
    settings::{SettingsError, TagSettingsTable},
};

/// Root container of all top-level elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DocTree {
    roots: IndexMap<String, DocElement>,
}

impl DocTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node at `path`, creating placeholders along the way.
    ///
    /// `path` is an absolute dotted path. Every segment that does not exist
    /// yet, including the last one, is created as a placeholder.
    pub fn get_or_create_placeholder(&mut self, path: &str) -> &mut DocElement {
        let mut segments = path.split('.');
        // `split` always yields at least one segment
        let first = segments.next().unwrap_or_default();

        let mut node = self
            .roots
            .entry(first.to_string())
            .or_insert_with(|| DocElement::placeholder(first, first));

        for segment in segments {
            node = node.child_or_placeholder(segment);
        }

        node
    }

    /// Merges one resolved record into the tree.
    pub fn merge(&mut self, path: &str, record: ElementRecord) {
        trace!(path, tag_type = record.tag_type(); "Merging element");
        self.get_or_create_placeholder(path).apply(record);
    }

    /// Merges resolved records in order.
    pub fn merge_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = (String, ElementRecord)>,
    {
        for (path, record) in records {
            self.merge(&path, record);
        }
    }

    /// Returns the node at `path`.
    pub fn get(&self, path: &str) -> Option<&DocElement> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.roots.get(first)?, |node, segment| node.child(segment))
    }

    /// Returns the top-level nodes keyed by name.
    pub fn roots(&self) -> &IndexMap<String, DocElement> {
        &self.roots
    }

    /// Iterates over all nodes depth-first, in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![self.roots.values()],
        }
    }

    /// Returns the number of nodes, placeholders included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Collects declared elements into per-type index lists.
    ///
    /// Only tag types whose `list` property resolves to `true` get a list.
    /// Lists are ordered by `list_order`, then by type name; elements keep
    /// depth-first order.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if an element's tag type is not in `tags`.
    pub fn lists(&self, tags: &TagSettingsTable) -> Result<Vec<ElementList>, SettingsError> {
        let mut lists: IndexMap<&str, ElementList> = IndexMap::new();

        for element in self.iter() {
            let Some(tag_type) = element.tag_type() else {
                continue;
            };
            if !tags.list(tag_type)? {
                continue;
            }

            if !lists.contains_key(tag_type) {
                let list = ElementList {
                    tag_type: tag_type.to_string(),
                    title: tags.title(tag_type)?.to_string(),
                    list_order: tags.list_order(tag_type)?,
                    elements: Vec::new(),
                };
                lists.insert(tag_type, list);
            }
            if let Some(list) = lists.get_mut(tag_type) {
                list.elements.push(element.path().to_string());
            }
        }

        let mut lists: Vec<ElementList> = lists.into_values().collect();
        lists.sort_by(|a, b| {
            a.list_order
                .cmp(&b.list_order)
                .then_with(|| a.tag_type.cmp(&b.tag_type))
        });

        Ok(lists)
    }
}

/// Declared elements of one listed tag type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementList {
    tag_type: String,
    title: String,
    list_order: i64,
    elements: Vec<String>,
}

impl ElementList {
    pub fn tag_type(&self) -> &str {
        &self.tag_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn list_order(&self) -> i64 {
        self.list_order
    }

    /// Returns the paths of the listed elements.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }
}

/// Depth-first iterator over a [`DocTree`].
pub struct Iter<'a> {
    stack: Vec<Values<'a, String, DocElement>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a DocElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(element) => {
                    self.stack.push(element.children().values());
                    return Some(element);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::settings::TagTypeDefinition;

    fn record(tag_type: &str, description: &str) -> ElementRecord {
        ElementRecord::new(tag_type, "ignored", "a.js", 1, 2).with_description(description)
    }

    fn tags() -> TagSettingsTable {
        let root = TagTypeDefinition::default()
            .with_separate(false)
            .with_list(false)
            .with_callable(false)
            .with_source_visible(true)
            .with_list_order(0)
            .with_title("elements")
            .with_display_name("element");
        let mut definitions = IndexMap::new();
        definitions.insert("default".to_string(), root);
        definitions.insert(
            "module".to_string(),
            TagTypeDefinition::default()
                .with_parent_type("default")
                .with_list(true)
                .with_title("modules")
                .with_list_order(-1),
        );
        definitions.insert(
            "class".to_string(),
            TagTypeDefinition::default()
                .with_parent_type("default")
                .with_list(true)
                .with_title("classes"),
        );
        definitions.insert(
            "method".to_string(),
            TagTypeDefinition::default().with_parent_type("default"),
        );
        TagSettingsTable::new(definitions).unwrap()
    }

    #[test]
    fn test_merge_creates_placeholders() {
        let mut tree = DocTree::new();
        tree.merge("core.parser.Parser", record("class", "parses"));

        let core = tree.get("core").unwrap();
        assert!(!core.is_declared());
        assert_eq!(core.path(), "core");

        let parser = tree.get("core.parser").unwrap();
        assert!(!parser.is_declared());
        assert_eq!(parser.name(), "parser");

        let class = tree.get("core.parser.Parser").unwrap();
        assert_eq!(class.tag_type(), Some("class"));
        assert_eq!(class.path(), "core.parser.Parser");
        assert_eq!(class.name(), "Parser");
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_declaring_placeholder_keeps_children() {
        let mut tree = DocTree::new();
        tree.merge("core.Parser", record("class", "child"));
        tree.merge("core", record("module", "parent"));

        let core = tree.get("core").unwrap();
        assert!(core.is_declared());
        assert!(core.child("Parser").is_some());
    }

    #[test]
    fn test_last_write_wins() {
        let mut tree = DocTree::new();
        tree.merge("core", record("module", "first"));
        tree.merge("core.a", record("method", "a"));
        tree.merge("core", record("module", "second"));
        tree.merge("core.b", record("method", "b"));

        let core = tree.get("core").unwrap();
        assert_eq!(core.description(), Some("second"));
        let children: Vec<_> = core.children().keys().map(String::as_str).collect();
        assert_eq!(children, ["a", "b"]);
    }

    #[test]
    fn test_get_missing_path() {
        let mut tree = DocTree::new();
        tree.merge("core.a", record("method", ""));

        assert!(tree.get("core.b").is_none());
        assert!(tree.get("other").is_none());
        assert!(tree.get("core.a.deeper").is_none());
    }

    #[test]
    fn test_iter_is_depth_first() {
        let mut tree = DocTree::new();
        tree.merge("a.x", record("method", ""));
        tree.merge("b", record("method", ""));
        tree.merge("a.y", record("method", ""));

        let paths: Vec<_> = tree.iter().map(DocElement::path).collect();
        assert_eq!(paths, ["a", "a.x", "a.y", "b"]);
    }

    #[test]
    fn test_lists_grouped_and_ordered() {
        let mut tree = DocTree::new();
        tree.merge("core.Parser", record("class", ""));
        tree.merge("core", record("module", ""));
        tree.merge("core.Parser.parse", record("method", ""));
        tree.merge("util.Reader", record("class", ""));

        let lists = tree.lists(&tags()).unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].tag_type(), "module");
        assert_eq!(lists[0].elements(), ["core"]);
        assert_eq!(lists[1].tag_type(), "class");
        assert_eq!(lists[1].title(), "classes");
        assert_eq!(lists[1].elements(), ["core.Parser", "util.Reader"]);
    }

    proptest! {
        #[test]
        fn every_merged_path_is_reachable(
            paths in prop::collection::vec(
                prop::collection::vec("[a-z]{1,3}", 1..4).prop_map(|s| s.join(".")),
                1..12,
            )
        ) {
            let mut tree = DocTree::new();
            for path in &paths {
                tree.merge(path, record("method", path));
            }

            for path in &paths {
                let element = tree.get(path).unwrap();
                prop_assert_eq!(element.path(), path.as_str());
                prop_assert!(element.is_declared());

                let segments: Vec<_> = path.split('.').collect();
                for end in 1..segments.len() {
                    let prefix = segments[..end].join(".");
                    prop_assert!(tree.get(&prefix).is_some());
                }
            }
        }
    }
}
