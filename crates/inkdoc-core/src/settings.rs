//! Tag type settings and the inheritance resolver.
//!
//! Every element tag (`@class`, `@method`, ...) names a *tag type*. Tag types
//! are declared in a [`TagSettingsTable`], each with optional properties that
//! are looked up through a chain of `parent_type` references when not defined
//! locally.
//!
//! The table is validated once when it is built. Unknown parent types, cyclic
//! parent chains, broken aliases and properties that no type in a chain
//! defines are all rejected up front, so lookups on a built table only fail
//! for tag types that are not in it.
//!
//! # Example
//!
//! ```
//! # use indexmap::IndexMap;
//! # use inkdoc_core::settings::{TagSettingsTable, TagTypeDefinition};
//! let mut definitions = IndexMap::new();
//! definitions.insert(
//!     "default".to_string(),
//!     TagTypeDefinition::default()
//!         .with_separate(false)
//!         .with_list(false)
//!         .with_callable(false)
//!         .with_source_visible(true)
//!         .with_list_order(0)
//!         .with_title("elements")
//!         .with_display_name("element"),
//! );
//! definitions.insert(
//!     "article".to_string(),
//!     TagTypeDefinition::default()
//!         .with_parent_type("default")
//!         .with_alias("a"),
//! );
//!
//! let table = TagSettingsTable::new(definitions).unwrap();
//! assert_eq!(table.canonical_name("a"), Some("article"));
//! assert!(!table.separate("article").unwrap());
//! ```

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::attribute::{AttributeKey, AttributeValue, Attributes};

/// Configuration errors in a tag settings table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("tag type `{type_name}` does not define `{property}` and no parent type does either")]
    MissingSettingsProperty {
        type_name: String,
        property: TagProperty,
    },

    #[error("tag type `{type_name}` has unknown parent type `{parent_type}`")]
    UnknownParentType {
        type_name: String,
        parent_type: String,
    },

    #[error("alias `{alias}` of tag type `{type_name}` is already used by `{existing}`")]
    DuplicateAlias {
        alias: String,
        type_name: String,
        existing: String,
    },

    #[error("parent type chain of `{type_name}` is cyclic")]
    CyclicParentType { type_name: String },

    #[error("unknown tag type `{0}`")]
    UnknownTagType(String),
}

/// Inheritable scalar properties of a tag type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagProperty {
    /// Whether elements of this type get their own page.
    Separate,
    /// Whether elements of this type are collected into an index list.
    List,
    /// Whether elements of this type can be called (functions, methods).
    Callable,
    /// Whether the source listing of the element is shown.
    SourceVisible,
    /// Sort key of this type's index list.
    ListOrder,
    /// Plural display name, used as the list title.
    Title,
    /// Singular display name.
    DisplayName,
}

impl TagProperty {
    /// All properties, in the order they are validated.
    pub const ALL: [TagProperty; 7] = [
        TagProperty::Separate,
        TagProperty::List,
        TagProperty::Callable,
        TagProperty::SourceVisible,
        TagProperty::ListOrder,
        TagProperty::Title,
        TagProperty::DisplayName,
    ];

    /// Returns the settings-file name of this property.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagProperty::Separate => "separate",
            TagProperty::List => "list",
            TagProperty::Callable => "callable",
            TagProperty::SourceVisible => "source_visible",
            TagProperty::ListOrder => "list_order",
            TagProperty::Title => "title",
            TagProperty::DisplayName => "display_name",
        }
    }
}

impl fmt::Display for TagProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    Flag(bool),
    Order(i64),
    Text(&'a str),
}

/// Definition of a single tag type.
///
/// All properties are optional; anything not defined locally is resolved
/// through [`TagTypeDefinition::parent_type`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagTypeDefinition {
    #[serde(skip)]
    name: String,
    #[serde(default)]
    parent_type: Option<String>,
    #[serde(default, rename = "alias", alias = "aliases")]
    aliases: IndexSet<String>,
    separate: Option<bool>,
    list: Option<bool>,
    callable: Option<bool>,
    source_visible: Option<bool>,
    list_order: Option<i64>,
    title: Option<String>,
    #[serde(alias = "name")]
    display_name: Option<String>,
    #[serde(default)]
    attributes: Attributes,
}

impl TagTypeDefinition {
    /// Returns the canonical name of this tag type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the parent type, if any.
    pub fn parent_type(&self) -> Option<&str> {
        self.parent_type.as_deref()
    }

    /// Returns the aliases declared directly on this type.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    /// Returns the default attribute values declared directly on this type.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn with_parent_type(mut self, parent_type: impl Into<String>) -> Self {
        self.parent_type = Some(parent_type.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn with_separate(mut self, separate: bool) -> Self {
        self.separate = Some(separate);
        self
    }

    pub fn with_list(mut self, list: bool) -> Self {
        self.list = Some(list);
        self
    }

    pub fn with_callable(mut self, callable: bool) -> Self {
        self.callable = Some(callable);
        self
    }

    pub fn with_source_visible(mut self, source_visible: bool) -> Self {
        self.source_visible = Some(source_visible);
        self
    }

    pub fn with_list_order(mut self, list_order: i64) -> Self {
        self.list_order = Some(list_order);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_attribute(mut self, key: AttributeKey, value: AttributeValue) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Returns the locally defined value of `property`.
    fn local(&self, property: TagProperty) -> Option<PropertyValue<'_>> {
        match property {
            TagProperty::Separate => self.separate.map(PropertyValue::Flag),
            TagProperty::List => self.list.map(PropertyValue::Flag),
            TagProperty::Callable => self.callable.map(PropertyValue::Flag),
            TagProperty::SourceVisible => self.source_visible.map(PropertyValue::Flag),
            TagProperty::ListOrder => self.list_order.map(PropertyValue::Order),
            TagProperty::Title => self.title.as_deref().map(PropertyValue::Text),
            TagProperty::DisplayName => self.display_name.as_deref().map(PropertyValue::Text),
        }
    }
}

/// Ordered table of tag type definitions with a derived alias index.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "IndexMap<String, TagTypeDefinition>")]
pub struct TagSettingsTable {
    definitions: IndexMap<String, TagTypeDefinition>,
    aliases: IndexMap<String, String>,
}

impl TagSettingsTable {
    /// Builds and validates a table.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if a parent type is unknown, a parent
    /// chain is cyclic, an alias collides with another alias or a type name,
    /// or a property cannot be resolved for some type.
    pub fn new(mut definitions: IndexMap<String, TagTypeDefinition>) -> Result<Self, SettingsError> {
        for (name, definition) in definitions.iter_mut() {
            definition.name = name.clone();
        }

        let aliases = Self::build_alias_index(&definitions)?;
        let table = Self {
            definitions,
            aliases,
        };
        table.validate()?;

        debug!(
            tag_types = table.definitions.len(),
            aliases = table.aliases.len();
            "Tag settings table loaded"
        );

        Ok(table)
    }

    /// Builds the `alias -> canonical name` index.
    ///
    /// Types without aliases are skipped.
    fn build_alias_index(
        definitions: &IndexMap<String, TagTypeDefinition>,
    ) -> Result<IndexMap<String, String>, SettingsError> {
        let mut index: IndexMap<String, String> = IndexMap::new();

        for (name, definition) in definitions {
            for alias in &definition.aliases {
                if let Some(existing) = index.get(alias) {
                    return Err(SettingsError::DuplicateAlias {
                        alias: alias.clone(),
                        type_name: name.clone(),
                        existing: existing.clone(),
                    });
                }
                if definitions.contains_key(alias) {
                    return Err(SettingsError::DuplicateAlias {
                        alias: alias.clone(),
                        type_name: name.clone(),
                        existing: alias.clone(),
                    });
                }
                index.insert(alias.clone(), name.clone());
            }
        }

        Ok(index)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for name in self.definitions.keys() {
            self.check_chain(name)?;
        }

        for name in self.definitions.keys() {
            for property in TagProperty::ALL {
                self.resolve(name, property)?;
            }
        }

        Ok(())
    }

    /// Walks the parent chain of `name`, rejecting unknown parents and cycles.
    fn check_chain(&self, name: &str) -> Result<(), SettingsError> {
        let mut current = self.get_required(name)?;
        let mut steps = 0;

        while let Some(parent_name) = current.parent_type() {
            current = self.definitions.get(parent_name).ok_or_else(|| {
                SettingsError::UnknownParentType {
                    type_name: current.name.clone(),
                    parent_type: parent_name.to_string(),
                }
            })?;

            steps += 1;
            if steps > self.definitions.len() {
                return Err(SettingsError::CyclicParentType {
                    type_name: name.to_string(),
                });
            }
        }

        Ok(())
    }

    fn get_required(&self, name: &str) -> Result<&TagTypeDefinition, SettingsError> {
        self.definitions
            .get(name)
            .ok_or_else(|| SettingsError::UnknownTagType(name.to_string()))
    }

    /// Iterates over `name` and its ancestors, nearest first.
    fn chain<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = &'a TagTypeDefinition> + 'a, SettingsError> {
        let start = self.get_required(name)?;
        Ok(std::iter::successors(Some(start), move |definition| {
            definition
                .parent_type()
                .and_then(|parent| self.definitions.get(parent))
        })
        .take(self.definitions.len()))
    }

    /// Resolves `property` for tag type `type_name` through its parent chain.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownTagType`] if `type_name` is not in the
    /// table and [`SettingsError::MissingSettingsProperty`] if no type in the
    /// chain defines the property.
    pub fn resolve(
        &self,
        type_name: &str,
        property: TagProperty,
    ) -> Result<PropertyValue<'_>, SettingsError> {
        self.chain(type_name)?
            .find_map(|definition| definition.local(property))
            .ok_or_else(|| SettingsError::MissingSettingsProperty {
                type_name: type_name.to_string(),
                property,
            })
    }

    fn resolve_flag(&self, type_name: &str, property: TagProperty) -> Result<bool, SettingsError> {
        match self.resolve(type_name, property)? {
            PropertyValue::Flag(flag) => Ok(flag),
            _ => unreachable!("{property} is a flag property"),
        }
    }

    fn resolve_text(&self, type_name: &str, property: TagProperty) -> Result<&str, SettingsError> {
        match self.resolve(type_name, property)? {
            PropertyValue::Text(text) => Ok(text),
            _ => unreachable!("{property} is a text property"),
        }
    }

    pub fn separate(&self, type_name: &str) -> Result<bool, SettingsError> {
        self.resolve_flag(type_name, TagProperty::Separate)
    }

    pub fn list(&self, type_name: &str) -> Result<bool, SettingsError> {
        self.resolve_flag(type_name, TagProperty::List)
    }

    pub fn callable(&self, type_name: &str) -> Result<bool, SettingsError> {
        self.resolve_flag(type_name, TagProperty::Callable)
    }

    pub fn source_visible(&self, type_name: &str) -> Result<bool, SettingsError> {
        self.resolve_flag(type_name, TagProperty::SourceVisible)
    }

    pub fn list_order(&self, type_name: &str) -> Result<i64, SettingsError> {
        match self.resolve(type_name, TagProperty::ListOrder)? {
            PropertyValue::Order(order) => Ok(order),
            _ => unreachable!("list_order is an integer property"),
        }
    }

    pub fn title(&self, type_name: &str) -> Result<&str, SettingsError> {
        self.resolve_text(type_name, TagProperty::Title)
    }

    pub fn display_name(&self, type_name: &str) -> Result<&str, SettingsError> {
        self.resolve_text(type_name, TagProperty::DisplayName)
    }

    /// Resolves the default value of attribute `key` for `type_name`.
    ///
    /// The nearest type in the chain that declares the attribute wins. An
    /// attribute no type declares resolves to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownTagType`] if `type_name` is not in the
    /// table.
    pub fn attribute_default(
        &self,
        type_name: &str,
        key: AttributeKey,
    ) -> Result<Option<&AttributeValue>, SettingsError> {
        Ok(self
            .chain(type_name)?
            .find_map(|definition| definition.attributes.get(key)))
    }

    /// Maps a tag name or alias to its canonical tag type name.
    pub fn canonical_name(&self, tag: &str) -> Option<&str> {
        if let Some((name, _)) = self.definitions.get_key_value(tag) {
            return Some(name);
        }
        self.aliases.get(tag).map(String::as_str)
    }

    /// Returns the definition of a tag type by canonical name.
    pub fn get(&self, name: &str) -> Option<&TagTypeDefinition> {
        self.definitions.get(name)
    }

    /// Iterates over the tag type definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TagTypeDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl TryFrom<IndexMap<String, TagTypeDefinition>> for TagSettingsTable {
    type Error = SettingsError;

    fn try_from(definitions: IndexMap<String, TagTypeDefinition>) -> Result<Self, Self::Error> {
        Self::new(definitions)
    }
}
