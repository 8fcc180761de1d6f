//! # Inkdoc Parser
//!
//! Parser for annotated doc comments. This crate turns the source text of
//! one file into element records with resolved absolute paths, ready to be
//! merged into an [`inkdoc_core::tree::DocTree`].
//!
//! The pipeline for each file:
//!
//! 1. **Scan** - Find doc blocks between the open and close delimiters
//! 2. **Tokenize** - Split each block into a description and tag segments
//! 3. **Classify** - Pick the element tag and parse property tags into attributes
//! 4. **Resolve** - Turn the declared, possibly relative, name into an absolute path
//!
//! ## Usage
//!
//! ```
//! # use indexmap::IndexMap;
//! # use inkdoc_core::settings::{TagSettingsTable, TagTypeDefinition};
//! # use inkdoc_parser::{DocParser, ParseError, ParserConfig};
//! fn main() -> Result<(), ParseError> {
//!     let mut definitions = IndexMap::new();
//!     definitions.insert(
//!         "function".to_string(),
//!         TagTypeDefinition::default()
//!             .with_separate(false)
//!             .with_list(true)
//!             .with_callable(true)
//!             .with_source_visible(true)
//!             .with_list_order(0)
//!             .with_title("functions")
//!             .with_display_name("function"),
//!     );
//!     let tags = TagSettingsTable::new(definitions).expect("valid tag settings");
//!
//!     let source = r#"
//!         /**
//!          * Adds two numbers.
//!          * @function math.add
//!          * @param a {number} - first operand
//!          * @param b {number} - second operand
//!          */
//!     "#;
//!
//!     let parser = DocParser::new(&ParserConfig::default(), tags)?;
//!     let file = parser.parse("math.js", source)?;
//!     assert_eq!(file.elements()[0].path(), "math.add");
//!     Ok(())
//! }
//! ```

mod classifier;
mod config;
pub mod error;
pub mod grammar;
mod parser;
mod resolve;
mod scanner;
mod span;
mod tokenizer;

pub use config::{ParserConfig, TAG_GROUP};
pub use error::{Diagnostic, ErrorCode, ParseError};
pub use parser::{DocParser, ParsedFile, ResolvedElement};
pub use resolve::{DeclarationHistory, PathError};
pub use scanner::{Block, Blocks, Scanner};
pub use span::Span;
pub use tokenizer::{TagSegment, TokenizedBlock, Tokenizer};
