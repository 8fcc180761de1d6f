//! Tag tokenizer.
//!
//! Splits the text of one doc block into a description and an ordered list
//! of tag segments. The description is everything before the first tag
//! marker. Each segment runs from its marker to the start of the next marker
//! or the end of the text.

use std::ops::Range;

use regex::Regex;

use crate::{config::TAG_GROUP, span::Span};

/// One tag of a doc block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSegment<'a> {
    name: &'a str,
    value: &'a str,
    range: Range<usize>,
}

impl<'a> TagSegment<'a> {
    /// Returns the tag name as written, without the marker.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the text following the marker, up to the next tag.
    pub fn value(&self) -> &'a str {
        self.value
    }

    /// Returns the byte range of the whole segment within the block text.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// A doc block split into description and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedBlock<'a> {
    description: &'a str,
    tags: Vec<TagSegment<'a>>,
}

impl<'a> TokenizedBlock<'a> {
    /// Returns the description, trimmed of surrounding whitespace.
    pub fn description(&self) -> &'a str {
        self.description
    }

    /// Returns the tag segments in block order.
    pub fn tags(&self) -> &[TagSegment<'a>] {
        &self.tags
    }
}

/// Splits block text on a tag-marker pattern.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    marker: Regex,
}

impl Tokenizer {
    /// Creates a tokenizer.
    ///
    /// `marker` must have a `tag` capture group.
    pub fn new(marker: Regex) -> Self {
        Self { marker }
    }

    /// Tokenizes `text`.
    ///
    /// Returns `None` when the text has no tag marker at all: such a block
    /// is not a doc element.
    pub fn tokenize<'a>(&self, text: &'a str) -> Option<TokenizedBlock<'a>> {
        let markers: Vec<(Range<usize>, &'a str)> = self
            .marker
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.name(TAG_GROUP)?;
                Some((whole.range(), name.as_str()))
            })
            .collect();

        let first = markers.first()?;
        let description = text[..first.0.start].trim();

        let tags = markers
            .iter()
            .enumerate()
            .map(|(idx, (marker, name))| {
                let end = markers
                    .get(idx + 1)
                    .map_or(text.len(), |(next, _)| next.start);
                TagSegment {
                    name: *name,
                    value: &text[marker.end.min(end)..end],
                    range: marker.start..end,
                }
            })
            .collect();

        Some(TokenizedBlock { description, tags })
    }

    /// Finds the tag markers of a block in the unstripped source.
    ///
    /// Each span runs from the marker start to the end of the tag name.
    /// Stripping only removes indentation and line prefixes, so the markers
    /// appear in the same order as the segments of the tokenized block.
    pub fn marker_spans(&self, source: &str, block: Span) -> Vec<Span> {
        let Some(text) = source.get(block.range()) else {
            return Vec::new();
        };

        self.marker
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.name(TAG_GROUP)?;
                Some(Span::new(
                    block.start() + whole.start()..block.start() + name.end(),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParserConfig, Patterns};

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(Patterns::compile(&ParserConfig::default()).unwrap().tag)
    }

    #[test]
    fn test_description_and_tags() {
        let text = "\nReads a chunk.\n\n@method read\n@param size {int} - bytes\n";
        let block = tokenizer().tokenize(text).unwrap();

        assert_eq!(block.description(), "Reads a chunk.");
        let names: Vec<_> = block.tags().iter().map(TagSegment::name).collect();
        assert_eq!(names, ["method", "param"]);
        assert_eq!(block.tags()[0].value(), "read\n");
        assert_eq!(block.tags()[1].value(), "size {int} - bytes\n");
        assert_eq!(&text[block.tags()[1].range()], "@param size {int} - bytes\n");
    }

    #[test]
    fn test_block_without_tags_is_dropped() {
        assert!(tokenizer().tokenize("\nJust a comment.\n").is_none());
        assert!(tokenizer().tokenize("").is_none());
    }

    #[test]
    fn test_tag_without_value() {
        let block = tokenizer().tokenize("@method run\n@private\n").unwrap();

        assert_eq!(block.description(), "");
        assert_eq!(block.tags()[1].name(), "private");
        assert_eq!(block.tags()[1].value(), "");
    }

    #[test]
    fn test_marker_spans_in_source() {
        let source = "let a;\n/**\n * @class A\n * @retrun {int}\n */\n";
        let start = source.find("/**").unwrap();
        let block = Span::new(start..source.len() - 1);

        let spans = tokenizer().marker_spans(source, block);
        let markers: Vec<_> = spans.iter().map(|span| &source[span.range()]).collect();
        assert_eq!(markers, ["@class", "@retrun"]);
    }

    #[test]
    fn test_bare_at_sign_is_not_a_marker() {
        let block = tokenizer().tokenize("Use the @ operator.\n@class Matrix\n").unwrap();

        assert_eq!(block.tags().len(), 1);
        assert_eq!(block.description(), "Use the @ operator.");
    }
}
