//! Structured attribute values attached to documentation elements.
//!
//! Property tags such as `@param` or `@return` are parsed into the typed
//! values defined here. An element carries them in an [`Attributes`] map
//! keyed by [`AttributeKey`]. Tag type definitions use the same map to
//! declare default attribute values.
//!
//! # Overview
//!
//! - [`AttributeKey`] - The closed set of attribute names.
//! - [`AttributeValue`] - A single attribute value, possibly null.
//! - [`TypeRef`] - A `{type}` annotation with optional `{#ref}` cross-reference.
//! - [`Param`], [`ReturnValue`], [`Example`] - Structured tag payloads.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, Visitor},
};

/// Names of the attributes an element can carry.
///
/// `params` and `examples` accumulate ordered lists; every other key holds a
/// single value where a later tag overwrites an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    Access,
    Author,
    Default,
    Examples,
    Inherits,
    License,
    Params,
    Return,
    Valtype,
    Version,
}

impl AttributeKey {
    /// All attribute names as they appear in settings files and exports.
    pub const NAMES: &'static [&'static str] = &[
        "access", "author", "default", "examples", "inherits", "license", "params", "return",
        "valtype", "version",
    ];

    /// Returns the external name of this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKey::Access => "access",
            AttributeKey::Author => "author",
            AttributeKey::Default => "default",
            AttributeKey::Examples => "examples",
            AttributeKey::Inherits => "inherits",
            AttributeKey::License => "license",
            AttributeKey::Params => "params",
            AttributeKey::Return => "return",
            AttributeKey::Valtype => "valtype",
            AttributeKey::Version => "version",
        }
    }
}

impl FromStr for AttributeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(Self::Access),
            "author" => Ok(Self::Author),
            "default" => Ok(Self::Default),
            "examples" | "example" => Ok(Self::Examples),
            "inherits" => Ok(Self::Inherits),
            "license" => Ok(Self::License),
            "params" => Ok(Self::Params),
            "return" => Ok(Self::Return),
            "valtype" => Ok(Self::Valtype),
            "version" => Ok(Self::Version),
            _ => Err(format!("unknown attribute `{s}`")),
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type annotation such as `{int}` or `{#core.Parser}`.
///
/// When the annotation contains a `{#path}` cross-reference (or is itself
/// `#path`), the referenced element path is kept in [`TypeRef::reference`]
/// and the display text in [`TypeRef::type_name`] has the markers removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TypeRefRepr")]
pub struct TypeRef {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(rename = "ref")]
    reference: Option<String>,
}

impl TypeRef {
    /// Creates a type annotation.
    ///
    /// # Arguments
    ///
    /// * `type_name` - Display text of the type.
    /// * `reference` - Path of the referenced element, if any.
    pub fn new(type_name: impl Into<String>, reference: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            reference,
        }
    }

    /// Returns the display text of the type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the referenced element path, if the annotation holds one.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// Settings files may spell a type either as a bare string or as a table.
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRefRepr {
    Plain(String),
    Full {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(rename = "ref", default)]
        reference: Option<String>,
    },
}

impl From<TypeRefRepr> for TypeRef {
    fn from(repr: TypeRefRepr) -> Self {
        match repr {
            TypeRefRepr::Plain(type_name) => Self::new(type_name, None),
            TypeRefRepr::Full {
                type_name,
                reference,
            } => Self::new(type_name, reference),
        }
    }
}

/// A single `@param` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Param {
    name: String,
    default: Option<String>,
    sequenced: bool,
    #[serde(rename = "type")]
    ty: Option<TypeRef>,
    description: String,
}

impl Param {
    /// Creates a parameter entry.
    ///
    /// A parameter is either sequenced (`name...`) or carries a default
    /// (`name=value`), never both; callers are expected to uphold this.
    pub fn new(
        name: impl Into<String>,
        default: Option<String>,
        sequenced: bool,
        ty: Option<TypeRef>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            default,
            sequenced,
            ty,
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_sequenced(&self) -> bool {
        self.sequenced
    }

    pub fn ty(&self) -> Option<&TypeRef> {
        self.ty.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The value of a `@return` tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnValue {
    #[serde(rename = "type")]
    ty: Option<TypeRef>,
    description: Option<String>,
}

impl ReturnValue {
    /// Creates a return value description.
    pub fn new(ty: Option<TypeRef>, description: Option<String>) -> Self {
        Self { ty, description }
    }

    pub fn ty(&self) -> Option<&TypeRef> {
        self.ty.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A single `@example` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Example {
    title: String,
    #[serde(rename = "langid")]
    language: Option<String>,
    code: String,
    description: String,
}

impl Example {
    /// Creates an example entry.
    ///
    /// # Arguments
    ///
    /// * `title` - Short title shown above the code.
    /// * `language` - Optional language identifier for highlighting.
    /// * `code` - The code between the braces.
    /// * `description` - Text following the code, possibly empty.
    pub fn new(
        title: impl Into<String>,
        language: Option<String>,
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            language,
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A single attribute value.
///
/// [`AttributeValue::Null`] is a real value: lenient grammars that fail to
/// match store it rather than leaving the attribute unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Text(String),
    Type(TypeRef),
    Return(ReturnValue),
    Params(Vec<Param>),
    Examples(Vec<Example>),
}

impl AttributeValue {
    /// Returns `true` for [`AttributeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Returns the text if this is a [`AttributeValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the type annotation if this is a [`AttributeValue::Type`].
    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            AttributeValue::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Returns the return value if this is a [`AttributeValue::Return`].
    pub fn as_return(&self) -> Option<&ReturnValue> {
        match self {
            AttributeValue::Return(ret) => Some(ret),
            _ => None,
        }
    }
}

/// Ordered attribute map of an element or of a tag type's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<AttributeKey, AttributeValue>);

impl Attributes {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: AttributeKey) -> Option<&AttributeValue> {
        self.0.get(&key)
    }

    /// Returns `true` if `key` has been set, even to null.
    pub fn contains(&self, key: AttributeKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Sets a single-valued attribute, overwriting any earlier value.
    pub fn set(&mut self, key: AttributeKey, value: AttributeValue) {
        self.0.insert(key, value);
    }

    /// Appends a parameter to the `params` list.
    pub fn push_param(&mut self, param: Param) {
        match self
            .0
            .entry(AttributeKey::Params)
            .or_insert_with(|| AttributeValue::Params(Vec::new()))
        {
            AttributeValue::Params(params) => params.push(param),
            other => *other = AttributeValue::Params(vec![param]),
        }
    }

    /// Appends an example to the `examples` list.
    pub fn push_example(&mut self, example: Example) {
        match self
            .0
            .entry(AttributeKey::Examples)
            .or_insert_with(|| AttributeValue::Examples(Vec::new()))
        {
            AttributeValue::Examples(examples) => examples.push(example),
            other => *other = AttributeValue::Examples(vec![example]),
        }
    }

    /// Returns the accumulated parameters in declaration order.
    pub fn params(&self) -> &[Param] {
        match self.0.get(&AttributeKey::Params) {
            Some(AttributeValue::Params(params)) => params,
            _ => &[],
        }
    }

    /// Returns the accumulated examples in declaration order.
    pub fn examples(&self) -> &[Example] {
        match self.0.get(&AttributeKey::Examples) {
            Some(AttributeValue::Examples(examples)) => examples,
            _ => &[],
        }
    }

    /// Iterates over the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &AttributeValue)> {
        self.0.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// Reads an attribute map whose value shape is decided by each key.
struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = Attributes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of attribute values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut attributes = Attributes::new();

        while let Some(name) = map.next_key::<String>()? {
            let key = AttributeKey::from_str(&name)
                .map_err(|_| de::Error::unknown_field(&name, AttributeKey::NAMES))?;

            let value = match key {
                AttributeKey::Params => {
                    AttributeValue::Params(map.next_value::<Option<_>>()?.unwrap_or_default())
                }
                AttributeKey::Examples => {
                    AttributeValue::Examples(map.next_value::<Option<_>>()?.unwrap_or_default())
                }
                AttributeKey::Valtype | AttributeKey::Inherits => map
                    .next_value::<Option<TypeRef>>()?
                    .map_or(AttributeValue::Null, AttributeValue::Type),
                AttributeKey::Return => map
                    .next_value::<Option<ReturnValue>>()?
                    .map_or(AttributeValue::Null, AttributeValue::Return),
                AttributeKey::Access
                | AttributeKey::Author
                | AttributeKey::Default
                | AttributeKey::License
                | AttributeKey::Version => map
                    .next_value::<Option<String>>()?
                    .map_or(AttributeValue::Null, AttributeValue::Text),
            };

            attributes.set(key, value);
        }

        Ok(attributes)
    }
}
