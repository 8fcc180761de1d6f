use inkdoc_core::{
    attribute::{AttributeKey, TypeRef},
    settings::TagSettingsTable,
    tree::DocTree,
};
use inkdoc_parser::{DocParser, ErrorCode, ParserConfig};

const TAGS: &str = r#"
[default]
separate = false
list = false
callable = false
source_visible = true
list_order = 0
title = "elements"
display_name = "element"

[module]
parent_type = "default"
separate = true
list = true
list_order = -1
title = "modules"
display_name = "module"

[class]
parent_type = "default"
separate = true
list = true
title = "classes"
display_name = "class"

[method]
parent_type = "default"
callable = true
title = "methods"
display_name = "method"

[attribute]
parent_type = "default"
title = "attributes"
display_name = "attribute"
alias = ["attr"]

[attribute.attributes]
access = "public"
"#;

fn parser() -> DocParser {
    let tags: TagSettingsTable = toml::from_str(TAGS).expect("Failed to load tag settings");
    DocParser::new(&ParserConfig::default(), tags).expect("Failed to build parser")
}

#[test]
fn test_module_with_class_and_members() {
    let source = r#"
/**
 * Document generation.
 * @module core.docgenerator
 * @author Ada
 */

/**
 * Drives extraction.
 * @class .DocumentationGenerator
 */

/**
 * Creates the generator.
 * @method ..__init__
 * @param config {#core.Config} - settings to use
 * @return {#core.docgenerator.DocumentationGenerator}
 */

/**
 * @attr ..verbose
 * @valtype {bool}
 */
"#;

    let file = parser().parse("core/docgenerator.py", source).expect("Failed to parse");
    let paths: Vec<_> = file.elements().iter().map(|e| e.path()).collect();
    assert_eq!(
        paths,
        [
            "core.docgenerator",
            "core.docgenerator.DocumentationGenerator",
            "core.docgenerator.DocumentationGenerator.__init__",
            "core.docgenerator.DocumentationGenerator.verbose",
        ]
    );

    let init = file.elements()[2].record();
    assert_eq!(init.tag_type(), "method");
    assert_eq!(init.description(), "Creates the generator.");
    let param = &init.attributes().params()[0];
    assert_eq!(param.ty().and_then(TypeRef::reference), Some("core.Config"));
    assert_eq!(param.description(), "settings to use");

    let verbose = file.elements()[3].record();
    assert_eq!(verbose.tag_type(), "attribute");
    assert_eq!(
        verbose
            .attributes()
            .get(AttributeKey::Valtype)
            .and_then(|v| v.as_type())
            .map(TypeRef::type_name),
        Some("bool")
    );
}

#[test]
fn test_files_merge_into_one_tree() {
    let parser = parser();
    let mut tree = DocTree::new();

    let first = parser
        .parse("a.js", "/** @class pkg.Reader */\n")
        .expect("Failed to parse a.js");
    let second = parser
        .parse(
            "b.js",
            "/**\n * Writer.\n * @class pkg.Writer\n */\n/** @method .write */\n",
        )
        .expect("Failed to parse b.js");

    tree.merge_all(first.into_records());
    tree.merge_all(second.into_records());

    let pkg = tree.get("pkg").expect("pkg exists");
    assert!(!pkg.is_declared());
    let children: Vec<_> = pkg.children().keys().map(String::as_str).collect();
    assert_eq!(children, ["Reader", "Writer"]);

    let write = tree.get("pkg.Writer.write").expect("write exists");
    assert_eq!(write.tag_type(), Some("method"));
    assert_eq!(write.source_path(), Some(std::path::Path::new("b.js")));
    assert_eq!(write.start_line(), Some(5));
}

#[test]
fn test_redeclaration_last_write_wins() {
    let parser = parser();
    let mut tree = DocTree::new();

    for (path, source) in [
        ("a.js", "/**\n * Old.\n * @class Shape\n */\n/** @method .area */\n"),
        ("b.js", "/**\n * New.\n * @class Shape\n */\n"),
    ] {
        tree.merge_all(parser.parse(path, source).expect("Failed to parse").into_records());
    }

    let shape = tree.get("Shape").expect("Shape exists");
    assert_eq!(shape.description(), Some("New."));
    assert!(shape.child("area").is_some());
}

#[test]
fn test_attribute_defaults_come_from_tag_type() {
    let parser = parser();
    let mut tree = DocTree::new();
    let file = parser
        .parse("a.js", "/** @attr width */\n/**\n * @attr height\n * @private\n */\n")
        .expect("Failed to parse");
    tree.merge_all(file.into_records());

    let access = |path: &str| {
        tree.get(path)
            .and_then(|element| {
                element
                    .effective_attribute(parser.tags(), AttributeKey::Access)
                    .expect("known tag type")
            })
            .and_then(|value| value.as_text())
            .map(str::to_string)
    };

    assert_eq!(access("width").as_deref(), Some("public"));
    assert_eq!(access("height").as_deref(), Some("private"));
}

#[test]
fn test_index_lists_follow_settings() {
    let parser = parser();
    let mut tree = DocTree::new();
    let source = "/** @module io */\n/** @class .File */\n/** @method ..open */\n/** @class .Dir */\n";
    tree.merge_all(parser.parse("io.js", source).expect("Failed to parse").into_records());

    let lists = tree.lists(parser.tags()).expect("lists resolve");
    let summary: Vec<_> = lists
        .iter()
        .map(|list| (list.tag_type(), list.elements().len()))
        .collect();

    assert_eq!(summary, [("module", 1), ("class", 2)]);
    assert_eq!(lists[1].title(), "classes");
}

#[test]
fn test_failure_reports_block_location() {
    let source = "/** @module io */\n\n/**\n * @class .File\n * @param {int} broken\n */\n";
    let err = parser().parse("io.js", source).expect_err("Expected a failure");

    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E104));
    assert_eq!(diagnostic.labels()[0].span().start(), source.find("/**\n").unwrap());
    assert!(err.to_string().starts_with("error[E104]"));
}
