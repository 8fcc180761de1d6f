//! JSON export of built documentation.
//!
//! The exported document is the hand-off to a renderer:
//!
//! ```json
//! {
//!   "elements": { "core": { "path": "core", "type": "module", ... } },
//!   "lists": [ { "tag_type": "module", "title": "modules", ... } ],
//!   "source_files": ["src/core.js"],
//!   "discovered_files": ["src/core.js", "src/empty.js"]
//! }
//! ```
//!
//! `discovered_files` is only present when requested.

use std::{fs, path::Path, path::PathBuf};

use log::info;
use serde::Serialize;

use inkdoc_core::{
    settings::TagSettingsTable,
    tree::{DocTree, ElementList},
};

use crate::{Documentation, InkdocError};

#[derive(Serialize)]
struct Export<'a> {
    elements: &'a DocTree,
    lists: Vec<ElementList>,
    source_files: &'a [PathBuf],
    #[serde(skip_serializing_if = "Option::is_none")]
    discovered_files: Option<&'a [PathBuf]>,
}

/// Serializes `docs` to pretty-printed JSON.
///
/// # Arguments
///
/// * `docs` - The documentation to export
/// * `tags` - Tag settings used to build the index lists
/// * `all_source_files` - Include every discovered file in the output
///
/// # Errors
///
/// Returns [`InkdocError::Settings`] if an element's tag type is not in
/// `tags`, or [`InkdocError::Export`] if serialization fails.
pub fn to_json(
    docs: &Documentation,
    tags: &TagSettingsTable,
    all_source_files: bool,
) -> Result<String, InkdocError> {
    let export = Export {
        elements: docs.tree(),
        lists: docs.tree().lists(tags)?,
        source_files: docs.source_files(),
        discovered_files: all_source_files.then(|| docs.discovered_files()),
    };

    Ok(serde_json::to_string_pretty(&export)?)
}

/// Writes the JSON export of `docs` to `path`.
///
/// # Errors
///
/// Returns the errors of [`to_json`], or [`InkdocError::Io`] if the file
/// cannot be written.
pub fn write_json(
    path: &Path,
    docs: &Documentation,
    tags: &TagSettingsTable,
    all_source_files: bool,
) -> Result<(), InkdocError> {
    let json = to_json(docs, tags, all_source_files)?;
    fs::write(path, json)?;

    info!(path:? = path; "Documentation written");
    Ok(())
}
