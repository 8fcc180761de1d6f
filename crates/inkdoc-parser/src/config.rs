//! Parser configuration.
//!
//! [`ParserConfig`] is the user-facing, deserializable form. It is compiled
//! once into [`Patterns`] when a [`DocParser`](crate::DocParser) is built, so
//! invalid patterns are reported before any file is read.

use regex::Regex;
use serde::Deserialize;

use crate::error::{Diagnostic, ErrorCode, Result};

/// Name of the capture group that holds the tag name in the tag pattern.
pub const TAG_GROUP: &str = "tag";

/// Configuration of the doc block scanner and tag tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Pattern that opens a doc block. Only whitespace may precede it.
    pub open_pattern: String,
    /// Pattern that closes a doc block.
    pub close_pattern: String,
    /// Pattern of a tag marker; the tag name is the `tag` group.
    pub tag_pattern: String,
    /// Drop unknown tags instead of failing.
    pub ignore_invalid_tags: bool,
    /// Characters stripped from both ends of every block line.
    ///
    /// Selects the prefix-stripping line mode instead of the fixed column
    /// offset taken from the opening delimiter.
    pub line_prefix: Option<String>,
    /// Replacement for newlines in descriptions and free-text values.
    pub newline_replacement: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            open_pattern: r"/\*\*".to_string(),
            close_pattern: r"\*/".to_string(),
            tag_pattern: r"@(?P<tag>\S+)\s".to_string(),
            ignore_invalid_tags: false,
            line_prefix: None,
            newline_replacement: None,
        }
    }
}

impl ParserConfig {
    pub fn with_open_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.open_pattern = pattern.into();
        self
    }

    pub fn with_close_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.close_pattern = pattern.into();
        self
    }

    pub fn with_tag_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.tag_pattern = pattern.into();
        self
    }

    pub fn with_ignore_invalid_tags(mut self, ignore: bool) -> Self {
        self.ignore_invalid_tags = ignore;
        self
    }

    pub fn with_line_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.line_prefix = Some(prefix.into());
        self
    }

    pub fn with_newline_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.newline_replacement = Some(replacement.into());
        self
    }
}

/// Compiled delimiter and tag patterns.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub(crate) open: Regex,
    pub(crate) close: Regex,
    pub(crate) tag: Regex,
}

impl Patterns {
    /// Compiles the patterns of `config`.
    ///
    /// The open pattern is anchored so that only whitespace may precede the
    /// delimiter on its line.
    pub fn compile(config: &ParserConfig) -> Result<Self> {
        let open = compile("open_pattern", &format!(r"^\s*?(?:{})", config.open_pattern))?;
        let close = compile("close_pattern", &config.close_pattern)?;
        let tag = compile("tag_pattern", &config.tag_pattern)?;

        if !tag.capture_names().flatten().any(|name| name == TAG_GROUP) {
            return Err(Diagnostic::error(format!(
                "tag pattern `{}` has no `{TAG_GROUP}` group",
                config.tag_pattern
            ))
            .with_code(ErrorCode::E002)
            .with_help(r"capture the tag name with `(?P<tag>...)`, as in `@(?P<tag>\S+)\s`"));
        }

        Ok(Self { open, close, tag })
    }
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| {
        Diagnostic::error(format!("invalid `{field}`: {err}")).with_code(ErrorCode::E001)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_compile() {
        let patterns = Patterns::compile(&ParserConfig::default()).unwrap();

        assert!(patterns.open.is_match("    /**"));
        assert!(!patterns.open.is_match("x = 1; /**"));
        assert!(patterns.close.is_match(" */"));
        let caps = patterns.tag.captures("@param x").unwrap();
        assert_eq!(&caps[TAG_GROUP], "param");
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let config = ParserConfig::default().with_close_pattern("(");
        let err = Patterns::compile(&config).unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E001));
        assert!(err.message().contains("close_pattern"));
    }

    #[test]
    fn test_tag_pattern_requires_tag_group() {
        let config = ParserConfig::default().with_tag_pattern(r"@(\S+)\s");
        let err = Patterns::compile(&config).unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ParserConfig = toml::from_str(
            r#"
            ignore_invalid_tags = true
            newline_replacement = "<br/>"
            "#,
        )
        .unwrap();

        assert!(config.ignore_invalid_tags);
        assert_eq!(config.newline_replacement.as_deref(), Some("<br/>"));
        assert_eq!(config.open_pattern, ParserConfig::default().open_pattern);
    }
}
