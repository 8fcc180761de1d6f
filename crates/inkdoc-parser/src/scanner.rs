//! Doc block scanner.
//!
//! The scanner walks a source file once, line by line, and yields every
//! complete doc block together with its line range and byte span. It is a
//! two-state machine: outside a block it looks for the open delimiter, which
//! only whitespace may precede; inside a block it looks for the close
//! delimiter.
//!
//! Block lines are stripped in one of two modes:
//!
//! - **Column mode** (default). The column at which the open delimiter ends
//!   is the strip offset, and that many characters are removed from the
//!   start of every following line. Relative indentation inside the block,
//!   such as example code, survives.
//! - **Prefix mode** (`line_prefix` set). Every line is trimmed of spaces and
//!   tabs, then of the prefix characters, then of spaces and tabs again.
//!
//! Every line of the block text is newline-terminated, and a line stripped to
//! nothing becomes a bare newline so paragraph breaks are kept. A block still
//! open at the end of the file is discarded.

use std::{iter::Enumerate, str::SplitInclusive};

use log::trace;
use regex::Regex;

use crate::span::Span;

/// A raw doc block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    start_line: usize,
    end_line: usize,
    span: Span,
    text: String,
}

impl Block {
    /// Returns the 1-based line of the open delimiter.
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// Returns the 1-based line of the close delimiter.
    pub fn end_line(&self) -> usize {
        self.end_line
    }

    /// Returns the byte span from the start of the first line to the end of
    /// the last line.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the stripped block text between the delimiters.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Line scanner configured with a pair of delimiter patterns.
#[derive(Debug, Clone)]
pub struct Scanner {
    open: Regex,
    close: Regex,
    line_prefix: Option<String>,
}

impl Scanner {
    /// Creates a scanner.
    ///
    /// `open` must already be anchored to the start of the line.
    pub fn new(open: Regex, close: Regex, line_prefix: Option<String>) -> Self {
        Self {
            open,
            close,
            line_prefix,
        }
    }

    /// Returns an iterator over the doc blocks of `source`.
    pub fn scan<'s, 'a>(&'s self, source: &'a str) -> Blocks<'s, 'a> {
        Blocks {
            scanner: self,
            lines: source.split_inclusive('\n').enumerate(),
            offset: 0,
            state: State::Outside,
        }
    }

    /// Strips one block line according to the configured mode.
    fn strip<'a>(&self, line: &'a str, column: usize) -> &'a str {
        match &self.line_prefix {
            Some(prefix) => line
                .trim_matches(is_blank)
                .trim_matches(|c| prefix.contains(c))
                .trim_matches(is_blank),
            None => skip_chars(line, column).trim_end_matches(is_blank),
        }
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Removes up to `count` leading characters.
fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

fn push_line(text: &mut String, line: &str) {
    text.push_str(line);
    text.push('\n');
}

#[derive(Debug)]
enum State {
    Outside,
    Inside {
        start_line: usize,
        start_offset: usize,
        column: usize,
        text: String,
    },
}

/// Iterator over the doc blocks of one source, created by [`Scanner::scan`].
pub struct Blocks<'s, 'a> {
    scanner: &'s Scanner,
    lines: Enumerate<SplitInclusive<'a, char>>,
    offset: usize,
    state: State,
}

impl Iterator for Blocks<'_, '_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        for (index, raw) in self.lines.by_ref() {
            let line_number = index + 1;
            let line_start = self.offset;
            self.offset += raw.len();

            let content = raw.strip_suffix('\n').unwrap_or(raw);
            let content = content.strip_suffix('\r').unwrap_or(content);
            let line_end = line_start + content.len();

            match &mut self.state {
                State::Outside => {
                    let Some(open) = self.scanner.open.find(content) else {
                        continue;
                    };
                    let rest = &content[open.end()..];
                    let column = content[..open.end()].chars().count();

                    if let Some(close) = self.scanner.close.find(rest) {
                        let mut text = String::new();
                        let line = self.scanner.strip(&rest[..close.start()], 0);
                        if !line.is_empty() {
                            push_line(&mut text, line.trim_start_matches(is_blank));
                        }
                        return Some(Block {
                            start_line: line_number,
                            end_line: line_number,
                            span: Span::new(line_start..line_end),
                            text,
                        });
                    }

                    let mut text = String::new();
                    push_line(&mut text, self.scanner.strip(rest, 0));
                    self.state = State::Inside {
                        start_line: line_number,
                        start_offset: line_start,
                        column,
                        text,
                    };
                }
                State::Inside { column, text, .. } => {
                    if let Some(close) = self.scanner.close.find(content) {
                        let line = self.scanner.strip(&content[..close.start()], *column);
                        if !line.is_empty() {
                            push_line(text, line);
                        }

                        let State::Inside {
                            start_line,
                            start_offset,
                            text,
                            ..
                        } = std::mem::replace(&mut self.state, State::Outside)
                        else {
                            unreachable!("scanner state checked above");
                        };

                        trace!(start_line, end_line = line_number; "Scanned doc block");
                        return Some(Block {
                            start_line,
                            end_line: line_number,
                            span: Span::new(start_offset..line_end),
                            text,
                        });
                    }

                    let line = self.scanner.strip(content, *column);
                    push_line(text, line);
                }
            }
        }

        if let State::Inside { start_line, .. } = std::mem::replace(&mut self.state, State::Outside)
        {
            trace!(start_line; "Discarding unterminated doc block");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::{ParserConfig, Patterns};

    fn scanner(config: &ParserConfig) -> Scanner {
        let patterns = Patterns::compile(config).unwrap();
        Scanner::new(patterns.open, patterns.close, config.line_prefix.clone())
    }

    fn scan(source: &str) -> Vec<Block> {
        scanner(&ParserConfig::default()).scan(source).collect()
    }

    #[test]
    fn test_multi_line_block() {
        let source = "let a = 1;\n/**\n * Reads things.\n * @method read\n */\nfunction read() {}\n";
        let blocks = scan(source);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_line(), 2);
        assert_eq!(blocks[0].end_line(), 5);
        assert_eq!(blocks[0].text(), "\nReads things.\n@method read\n");
        assert_eq!(&source[blocks[0].span().range()], "/**\n * Reads things.\n * @method read\n */");
    }

    #[test]
    fn test_column_offset_keeps_relative_indentation() {
        let source = "    /** Example.\n         {\n             run();\n         }\n    */\n";
        let blocks = scan(source);

        assert_eq!(blocks[0].text(), " Example.\n  {\n      run();\n  }\n");
    }

    #[test]
    fn test_blank_lines_become_newlines() {
        let source = "/**\n   first\n\n   second\n*/";
        let blocks = scan(source);

        assert_eq!(blocks[0].text(), "\nfirst\n\nsecond\n");
    }

    #[test]
    fn test_single_line_block() {
        let blocks = scan("  /** @method run */ function run() {}\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_line(), 1);
        assert_eq!(blocks[0].end_line(), 1);
        assert_eq!(blocks[0].text(), "@method run\n");
    }

    #[test]
    fn test_text_before_close_on_last_line() {
        let blocks = scan("/**\n * @method run\n * @private */\n");

        assert_eq!(blocks[0].text(), "\n@method run\n@private\n");
    }

    #[test]
    fn test_open_delimiter_must_lead_the_line() {
        assert!(scan("x = 1; /** @method run */\n").is_empty());
    }

    #[test]
    fn test_unterminated_block_is_discarded() {
        let blocks = scan("/** @method a */\n/**\n * @method b\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "@method a\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = scan("/**\r\n * @method a\r\n */\r\n");

        assert_eq!(blocks[0].text(), "\n@method a\n");
        assert_eq!(blocks[0].end_line(), 3);
    }

    #[test]
    fn test_prefix_mode_strips_prefix_characters() {
        let config = ParserConfig::default().with_line_prefix("*");
        let blocks: Vec<_> = scanner(&config)
            .scan("/**\n   * Reads.\n\t*  @method read\n   */\n")
            .collect();

        assert_eq!(blocks[0].text(), "\nReads.\n@method read\n");
    }

    #[test]
    fn test_custom_delimiters() {
        let config = ParserConfig::default()
            .with_open_pattern(r#"""""#)
            .with_close_pattern(r#"""""#);
        let blocks: Vec<_> = scanner(&config)
            .scan("def f():\n    \"\"\"* Doc.\n       @function f\n    \"\"\"\n")
            .collect();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "* Doc.\n@function f\n");
    }

    proptest! {
        #[test]
        fn blocks_are_ordered_and_inside_source(
            chunks in prop::collection::vec(
                prop_oneof![
                    Just("code();\n"),
                    Just("/**\n"),
                    Just(" * text @tag\n"),
                    Just(" */\n"),
                    Just("/** one line */\n"),
                    Just("\n"),
                ],
                0..40,
            )
        ) {
            let source: String = chunks.concat();
            let blocks = scan(&source);
            let line_count = source.lines().count();

            let mut previous_end = 0;
            for block in &blocks {
                prop_assert!(block.start_line() > previous_end);
                prop_assert!(block.start_line() <= block.end_line());
                prop_assert!(block.end_line() <= line_count);
                prop_assert!(block.span().end() <= source.len());
                prop_assert!(source[block.span().range()].contains("*/"));
                previous_end = block.end_line();
            }
        }
    }
}
