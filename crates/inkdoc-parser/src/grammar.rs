//! Property tag grammars.
//!
//! Every property tag has a small fixed grammar over the text that follows
//! its marker. Some grammars are strict and fail with
//! [`ErrorCode::E104`]; others degrade to a null or empty value:
//!
//! | Tag | Grammar | On mismatch |
//! |---|---|---|
//! | `author`, `version`, `license` | free text, trimmed | empty text |
//! | `default` | one token | null |
//! | `access` | one token | error |
//! | `valtype`, `inherits` | `{type}` | error |
//! | `param` | `name[=default \| ...] [{type}] [-] description` | error |
//! | `return` | `{type} [-] description` | null |
//! | `example` | `title [#lang] {code} description` | error |
//! | `private`, `static` | nothing | n/a |
//!
//! A `{type}` may contain `{#path}` cross-references, or be `{#path}`
//! itself; see [`type_ref`].

use std::fmt;

use inkdoc_core::attribute::{AttributeKey, AttributeValue, Example, Param, ReturnValue, TypeRef};
use winnow::{
    Parser,
    ascii::{multispace0, multispace1},
    combinator::{alt, delimited, eof, opt, peek, preceded},
    error::{ContextError, ErrMode, ModalResult},
    token::{rest, take_till, take_while},
};

use crate::error::{Diagnostic, ErrorCode, Result};

/// The closed set of property tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyTag {
    Author,
    Version,
    License,
    Default,
    Access,
    Valtype,
    Inherits,
    Param,
    Return,
    Example,
    Private,
    Static,
}

impl PropertyTag {
    /// Looks up a property tag by the name written after the marker.
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "author" => PropertyTag::Author,
            "version" => PropertyTag::Version,
            "license" => PropertyTag::License,
            "default" => PropertyTag::Default,
            "access" => PropertyTag::Access,
            "valtype" => PropertyTag::Valtype,
            "inherits" => PropertyTag::Inherits,
            "param" => PropertyTag::Param,
            "return" => PropertyTag::Return,
            "example" => PropertyTag::Example,
            "private" => PropertyTag::Private,
            "static" => PropertyTag::Static,
            _ => return None,
        };
        Some(tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyTag::Author => "author",
            PropertyTag::Version => "version",
            PropertyTag::License => "license",
            PropertyTag::Default => "default",
            PropertyTag::Access => "access",
            PropertyTag::Valtype => "valtype",
            PropertyTag::Inherits => "inherits",
            PropertyTag::Param => "param",
            PropertyTag::Return => "return",
            PropertyTag::Example => "example",
            PropertyTag::Private => "private",
            PropertyTag::Static => "static",
        }
    }

    /// Returns the usage shown when a strict grammar fails.
    fn usage(&self) -> &'static str {
        match self {
            PropertyTag::Access => "@access level",
            PropertyTag::Valtype => "@valtype {type}",
            PropertyTag::Inherits => "@inherits {type}",
            PropertyTag::Param => "@param name[=default|...] [{type}] [- description]",
            PropertyTag::Example => "@example title [#lang] {code} description",
            PropertyTag::Author => "@author name",
            PropertyTag::Version => "@version text",
            PropertyTag::License => "@license text",
            PropertyTag::Default => "@default value",
            PropertyTag::Return => "@return {type} [- description]",
            PropertyTag::Private => "@private",
            PropertyTag::Static => "@static",
        }
    }
}

impl fmt::Display for PropertyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The attribute change produced by one property tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// Sets a single-valued attribute, replacing an earlier value.
    Set(AttributeKey, AttributeValue),
    /// Appends to `params`.
    Param(Param),
    /// Appends to `examples`.
    Example(Example),
}

/// Formatting applied to free text taken from doc blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    newline_replacement: Option<String>,
}

impl TextStyle {
    pub fn new(newline_replacement: Option<String>) -> Self {
        Self {
            newline_replacement,
        }
    }

    /// Trims `text` and replaces inner newlines if configured.
    pub fn render(&self, text: &str) -> String {
        let text = text.trim();
        match &self.newline_replacement {
            Some(replacement) => text.replace('\n', replacement),
            None => text.to_string(),
        }
    }
}

/// The name following an element tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementName {
    /// First whitespace-delimited token, possibly relative.
    pub declared: String,
    /// Text of the first `"quoted"` part, if any.
    pub alias: Option<String>,
}

/// Parses the value of an element tag: a name plus an optional quoted
/// display name anywhere in the value.
///
/// Returns `None` if no name token remains once the quoted part is removed.
pub fn element_name(value: &str) -> Option<ElementName> {
    let (remainder, alias) = match run(quoted, value) {
        Some((before, alias, after)) => (
            format!("{before} {after}"),
            Some(alias.trim()).filter(|alias| !alias.is_empty()),
        ),
        None => (value.to_string(), None),
    };

    let declared = remainder.split_whitespace().next()?;
    Some(ElementName {
        declared: declared.to_string(),
        alias: alias.map(str::to_string),
    })
}

/// Parses the value of one property tag.
///
/// # Errors
///
/// Returns an [`ErrorCode::E104`] diagnostic when a strict grammar does not
/// match `value`.
pub fn extract(tag: PropertyTag, value: &str, style: &TextStyle) -> Result<Property> {
    let property = match tag {
        PropertyTag::Author => Property::Set(AttributeKey::Author, text(value, style)),
        PropertyTag::Version => Property::Set(AttributeKey::Version, text(value, style)),
        PropertyTag::License => Property::Set(AttributeKey::License, text(value, style)),
        PropertyTag::Default => {
            let value = run(token, value)
                .filter(|token| !token.is_empty())
                .map_or(AttributeValue::Null, |token| {
                    AttributeValue::Text(token.to_string())
                });
            Property::Set(AttributeKey::Default, value)
        }
        PropertyTag::Access => {
            let access = run(token, value)
                .filter(|token| !token.is_empty())
                .ok_or_else(|| malformed(tag))?;
            Property::Set(AttributeKey::Access, AttributeValue::Text(access.to_string()))
        }
        PropertyTag::Valtype | PropertyTag::Inherits => {
            let ty = run(type_annotation, value).ok_or_else(|| malformed(tag))?;
            let key = if tag == PropertyTag::Valtype {
                AttributeKey::Valtype
            } else {
                AttributeKey::Inherits
            };
            Property::Set(key, AttributeValue::Type(type_ref(ty)))
        }
        PropertyTag::Param => {
            let raw = run(param, value).ok_or_else(|| malformed(tag))?;
            let (default, sequenced) = match raw.suffix {
                Some(ParamSuffix::Sequenced) => (None, true),
                Some(ParamSuffix::Default(default)) => (Some(default.to_string()), false),
                None => (None, false),
            };
            Property::Param(Param::new(
                raw.name,
                default,
                sequenced,
                raw.ty.map(type_ref),
                style.render(raw.description),
            ))
        }
        PropertyTag::Return => {
            let value = run(return_value, value).map_or(AttributeValue::Null, |(ty, description)| {
                let description = style.render(description);
                AttributeValue::Return(ReturnValue::new(
                    Some(type_ref(ty)),
                    (!description.is_empty()).then_some(description),
                ))
            });
            Property::Set(AttributeKey::Return, value)
        }
        PropertyTag::Example => {
            let (heading, code, description) = run(example, value).ok_or_else(|| malformed(tag))?;
            let (title, language) = split_language(heading);
            if title.is_empty() {
                return Err(malformed(tag));
            }
            Property::Example(Example::new(
                title,
                language.map(str::to_string),
                code.trim_start_matches(['\r', '\n']).trim_end(),
                style.render(description),
            ))
        }
        PropertyTag::Private => {
            Property::Set(AttributeKey::Access, AttributeValue::Text("private".to_string()))
        }
        PropertyTag::Static => {
            Property::Set(AttributeKey::Access, AttributeValue::Text("static".to_string()))
        }
    };

    Ok(property)
}

fn malformed(tag: PropertyTag) -> Diagnostic {
    Diagnostic::error(format!("malformed value for `@{tag}`"))
        .with_code(ErrorCode::E104)
        .with_help(format!("expected `{}`", tag.usage()))
}

fn text(value: &str, style: &TextStyle) -> AttributeValue {
    AttributeValue::Text(style.render(value))
}

/// Runs `parser` on `value`, discarding the error.
fn run<'a, O>(
    mut parser: impl Parser<&'a str, O, ErrMode<ContextError>>,
    value: &'a str,
) -> Option<O> {
    let mut input = value;
    parser.parse_next(&mut input).ok()
}

/// Parses a brace-delimited body, allowing nested braces.
///
/// Returns the text between the outermost braces.
fn braced<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let Some(body) = input.strip_prefix('{') else {
        return Err(ErrMode::Backtrack(ContextError::new()));
    };

    let mut depth = 1usize;
    for (idx, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    *input = &body[idx + 1..];
                    return Ok(&body[..idx]);
                }
            }
            _ => {}
        }
    }

    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Text before, inside and after the first pair of double quotes.
fn quoted<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str, &'a str)> {
    (
        take_till(0.., '"'),
        delimited('"', take_till(0.., '"'), '"'),
        rest,
    )
        .parse_next(input)
}

/// The first whitespace-delimited token, possibly empty.
fn token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(multispace0, take_till(0.., char::is_whitespace)).parse_next(input)
}

fn word<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

/// `{type}` followed by whitespace or the end of the value.
fn type_annotation<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited(multispace0, braced, alt((multispace1.void(), eof.void()))).parse_next(input)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParamSuffix<'a> {
    Sequenced,
    Default(&'a str),
}

#[derive(Debug)]
struct RawParam<'a> {
    name: &'a str,
    suffix: Option<ParamSuffix<'a>>,
    ty: Option<&'a str>,
    description: &'a str,
}

fn param_suffix<'a>(input: &mut &'a str) -> ModalResult<ParamSuffix<'a>> {
    alt((
        "...".value(ParamSuffix::Sequenced),
        preceded('=', take_till(1.., |c: char| c.is_whitespace() || c == '{'))
            .verify(|default: &str| !default.ends_with("..."))
            .map(ParamSuffix::Default),
    ))
    .parse_next(input)
}

fn param<'a>(input: &mut &'a str) -> ModalResult<RawParam<'a>> {
    (
        preceded(multispace0, word),
        opt(param_suffix),
        preceded(
            peek(alt((multispace1.void(), "{".void(), eof.void()))),
            preceded(multispace0, opt(braced)),
        ),
        preceded((multispace0, opt('-')), rest),
    )
        .map(|(name, suffix, ty, description)| RawParam {
            name,
            suffix,
            ty,
            description,
        })
        .parse_next(input)
}

fn return_value<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    (
        preceded(multispace0, braced),
        preceded((multispace0, opt('-')), rest),
    )
        .parse_next(input)
}

fn example<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str, &'a str)> {
    (take_till(1.., '{'), braced, rest).parse_next(input)
}

/// Splits a trailing `#lang` token off an example heading.
fn split_language(heading: &str) -> (&str, Option<&str>) {
    let heading = heading.trim();
    let (title, last) = match heading.rsplit_once(char::is_whitespace) {
        Some((title, last)) => (title.trim_end(), last),
        None => ("", heading),
    };
    match last.strip_prefix('#') {
        Some(language) if !language.is_empty() => (title, Some(language)),
        _ => (heading, None),
    }
}

/// Builds a [`TypeRef`] from the text between the braces of `{type}`.
///
/// `#path` makes the whole type a reference to `path`. Otherwise each
/// embedded `{#path}` is replaced by `path`, and the first one becomes the
/// reference.
pub fn type_ref(text: &str) -> TypeRef {
    let text = text.trim();
    if let Some(reference) = text.strip_prefix('#') {
        return TypeRef::new(reference, Some(reference.to_string()));
    }

    let mut display = String::new();
    let mut reference = None;
    let mut remaining = text;

    while let Some(start) = remaining.find("{#") {
        let after = &remaining[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        let target = &after[..end];
        display.push_str(&remaining[..start]);
        display.push_str(target);
        reference.get_or_insert_with(|| target.to_string());
        remaining = &after[end + 1..];
    }
    display.push_str(remaining);

    TypeRef::new(display, reference)
}
