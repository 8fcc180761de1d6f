//! Integration tests for the DocBuilder API
//!
//! These tests verify that the public API works and is usable.

use std::fs;

use inkdoc::{
    DocBuilder, InkdocError,
    attribute::AttributeKey,
    config::{AppConfig, ParserConfig},
    tag_settings,
};
use inkdoc_parser::ErrorCode;

fn builder() -> DocBuilder {
    let tags = tag_settings::builtin().expect("Built-in tags should be valid");
    DocBuilder::new(&ParserConfig::default(), tags).expect("Default config should compile")
}

#[test]
fn test_builder_from_default_config() {
    let builder = DocBuilder::from_config(&AppConfig::default());
    assert!(builder.is_ok(), "Should build from defaults: {:?}", builder.err());
}

#[test]
fn test_parse_source_merges_elements() {
    let mut builder = builder();
    let source = r#"
/**
 * Geometry helpers.
 * @module geometry
 */

/**
 * A point in the plane.
 * @class .Point
 * @param x {number} - horizontal position
 * @param y {number} - vertical position
 */

/**
 * Distance to another point.
 * @method ..distance
 * @param other {#geometry.Point}
 * @return {number}
 */
"#;

    builder
        .parse_source("geometry.js", source)
        .expect("Failed to parse");

    let tree = builder.tree();
    assert_eq!(tree.len(), 3);

    let distance = tree
        .get("geometry.Point.distance")
        .expect("method should be in the tree");
    assert_eq!(distance.tag_type(), Some("method"));
    assert_eq!(distance.description(), Some("Distance to another point."));
}

#[test]
fn test_builtin_defaults_apply_to_elements() {
    let mut builder = builder();
    builder
        .parse_source("consts.js", "/** @num MAX_SIZE */\n")
        .expect("Failed to parse");

    let element = builder.tree().get("MAX_SIZE").expect("element exists");
    assert_eq!(element.tag_type(), Some("number"));

    let valtype = element
        .effective_attribute(builder.tags(), AttributeKey::Valtype)
        .expect("known tag type")
        .and_then(|value| value.as_type())
        .map(|ty| ty.type_name().to_string());
    assert_eq!(valtype.as_deref(), Some("number"));
}

#[test]
fn test_failing_file_is_not_merged() {
    let mut builder = builder();
    builder
        .parse_source("a.js", "/** @class Good */\n")
        .expect("Failed to parse a.js");

    let source = "/** @class Partial */\n/** @class .Child\n */\n/** @bogus tag */\n";
    let err = builder
        .parse_source("b.js", source)
        .expect_err("b.js should fail");

    match err {
        InkdocError::Parse { err, path, src } => {
            assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E103));
            assert_eq!(path.to_str(), Some("b.js"));
            assert_eq!(src, source);
        }
        other => panic!("Expected a parse error, got {other:?}"),
    }

    assert!(builder.tree().get("Good").is_some());
    assert!(builder.tree().get("Partial").is_none());
}

#[test]
fn test_last_write_wins_across_files() {
    let mut builder = builder();
    builder
        .parse_source("a.js", "/**\n * First.\n * @class Shape\n */\n/** @method .area */\n")
        .expect("Failed to parse a.js");
    builder
        .parse_source("b.js", "/**\n * Second.\n * @class Shape\n */\n")
        .expect("Failed to parse b.js");

    let docs = builder.finish();
    let shape = docs.tree().get("Shape").expect("Shape exists");
    assert_eq!(shape.description(), Some("Second."));
    assert!(shape.child("area").is_some());
    assert_eq!(docs.source_files().len(), 2);
}

#[test]
fn test_parse_file_tracks_source_files() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let with_docs = dir.path().join("lib.js");
    let without_docs = dir.path().join("util.js");
    fs::write(&with_docs, "/** @function lib.init */\nfunction init() {}\n").unwrap();
    fs::write(&without_docs, "function helper() {}\n").unwrap();

    let mut builder = builder();
    builder.parse_file(&with_docs).expect("Failed to parse lib.js");
    builder.parse_file(&without_docs).expect("Failed to parse util.js");

    let docs = builder.finish();
    assert_eq!(docs.source_files(), [with_docs.clone()]);
    assert_eq!(docs.discovered_files(), [with_docs, without_docs]);
}

#[test]
fn test_parse_missing_file_is_io_error() {
    let mut builder = builder();
    let result = builder.parse_file("/nonexistent/file.js");
    assert!(matches!(result, Err(InkdocError::Io(_))));
}

#[test]
fn test_invalid_parser_config() {
    let tags = tag_settings::builtin().unwrap();
    let config = ParserConfig::default().with_tag_pattern(r"@(\S+)\s");

    let result = DocBuilder::new(&config, tags);
    assert!(matches!(result, Err(InkdocError::Config(_))));
}

#[test]
fn test_custom_tag_settings_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tags_path = dir.path().join("tags.toml");
    fs::write(
        &tags_path,
        r#"
[default]
separate = false
list = true
callable = false
source_visible = true
list_order = 0
title = "widgets"
display_name = "widget"

[widget]
parent_type = "default"
alias = ["w"]
"#,
    )
    .unwrap();

    let config: AppConfig = toml::from_str(&format!(
        "[tags]\npath = {:?}\n",
        tags_path.to_str().unwrap()
    ))
    .unwrap();

    let mut builder = DocBuilder::from_config(&config).expect("Failed to build");
    builder
        .parse_source("ui.js", "/** @w ui.Button */\n")
        .expect("Failed to parse");

    assert_eq!(
        builder.tree().get("ui.Button").and_then(|e| e.tag_type()),
        Some("widget")
    );
}
