//! Loading of tag settings tables.
//!
//! The built-in table is embedded in the crate. Custom tables are read from
//! TOML or JSON files, chosen by extension, and validated while loading.

use std::{fs, path::Path};

use indexmap::IndexMap;
use log::debug;

use inkdoc_core::settings::{TagSettingsTable, TagTypeDefinition};

use crate::error::InkdocError;

const BUILTIN: &str = include_str!("default_tags.toml");

/// Returns the built-in tag settings table.
///
/// # Errors
///
/// Fails only if the embedded table is invalid.
pub fn builtin() -> Result<TagSettingsTable, InkdocError> {
    let definitions = toml::from_str(BUILTIN)
        .map_err(|err| InkdocError::Config(format!("Invalid built-in tag settings: {err}")))?;
    Ok(TagSettingsTable::new(definitions)?)
}

/// Loads a tag settings table from `path`.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
///
/// # Errors
///
/// Returns [`InkdocError::Io`] if the file cannot be read,
/// [`InkdocError::Config`] if it is not a well-formed settings file and
/// [`InkdocError::Settings`] if the table it describes is invalid.
pub fn load(path: &Path) -> Result<TagSettingsTable, InkdocError> {
    let content = fs::read_to_string(path)?;
    let invalid = |err: &dyn std::fmt::Display| {
        InkdocError::Config(format!("Invalid tag settings in {}: {err}", path.display()))
    };

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let definitions: IndexMap<String, TagTypeDefinition> = if is_json {
        serde_json::from_str(&content).map_err(|err| invalid(&err))?
    } else {
        toml::from_str(&content).map_err(|err| invalid(&err))?
    };

    let table = TagSettingsTable::new(definitions)?;
    debug!(path:? = path, tag_types = table.len(); "Loaded tag settings");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use inkdoc_core::{
        attribute::{AttributeKey, AttributeValue, TypeRef},
        settings::SettingsError,
    };
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = builtin().unwrap();

        assert_eq!(table.len(), 16);
        assert_eq!(table.canonical_name("a"), Some("article"));
        assert_eq!(table.canonical_name("num"), Some("number"));
        assert!(table.separate("article").unwrap());
        assert!(!table.separate("class").unwrap());
        assert!(table.callable("method").unwrap());
        assert_eq!(table.title("number").unwrap(), "attributes");
        assert_eq!(table.list_order("article").unwrap(), -1);
    }

    #[test]
    fn test_builtin_attribute_defaults() {
        let table = builtin().unwrap();

        let valtype = table
            .attribute_default("number", AttributeKey::Valtype)
            .unwrap()
            .and_then(|value| value.as_type())
            .map(TypeRef::type_name);
        assert_eq!(valtype, Some("number"));

        let access = table
            .attribute_default("dict", AttributeKey::Access)
            .unwrap()
            .and_then(|value| value.as_text());
        assert_eq!(access, Some("public"));

        let ret = table
            .attribute_default("method", AttributeKey::Return)
            .unwrap()
            .and_then(|value| value.as_return())
            .unwrap();
        assert_eq!(ret.ty(), None);
    }

    #[test]
    fn test_load_json_table() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(
            file,
            r#"{{
                "default": {{
                    "separate": false, "list": false, "callable": false,
                    "source_visible": true, "list_order": 0,
                    "title": "things", "name": "thing"
                }},
                "widget": {{ "parent_type": "default", "alias": ["w"] }}
            }}"#
        )
        .unwrap();

        let table = load(file.path()).unwrap();
        assert_eq!(table.canonical_name("w"), Some("widget"));
        assert_eq!(table.display_name("widget").unwrap(), "thing");
    }

    #[test]
    fn test_load_json_table_with_null_defaults() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(
            file,
            r#"{{
                "default": {{
                    "parent_type": null, "alias": [],
                    "separate": false, "list": false, "list_order": 0,
                    "name": "default name", "title": "default plural name",
                    "source_visible": true, "callable": false,
                    "attributes": {{
                        "access": "public", "example": null, "params": [],
                        "return": null, "inherits": null, "default": null,
                        "valtype": null, "author": null, "license": null,
                        "version": null
                    }}
                }},
                "method": {{
                    "parent_type": "default", "name": "method", "title": "methods",
                    "callable": true,
                    "attributes": {{ "return": {{ "type": null, "description": null }} }}
                }},
                "instance": {{
                    "parent_type": "default", "name": "instance", "title": "instances",
                    "attributes": {{ "valtype": "instance" }}
                }}
            }}"#
        )
        .unwrap();

        let table = load(file.path()).unwrap();
        assert!(table.callable("method").unwrap());

        let examples = table
            .attribute_default("method", AttributeKey::Examples)
            .unwrap();
        assert!(matches!(examples, Some(AttributeValue::Examples(list)) if list.is_empty()));

        let valtype = table
            .attribute_default("instance", AttributeKey::Valtype)
            .unwrap()
            .and_then(|value| value.as_type())
            .map(TypeRef::type_name);
        assert_eq!(valtype, Some("instance"));
    }

    #[test]
    fn test_load_rejects_invalid_table() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[orphan]\nparent_type = \"missing\"").unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            InkdocError::Settings(SettingsError::UnknownParentType { .. })
        ));

        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[widget]\ncolour = \"red\"").unwrap();
        assert!(matches!(load(file.path()), Err(InkdocError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/tags.toml")).unwrap_err();
        assert!(matches!(err, InkdocError::Io(_)));
    }
}
