//! CLI logic for the Inkdoc documentation extractor.
//!
//! This module contains the core CLI logic: configuration loading, source
//! discovery, parsing and JSON export.

pub mod error_adapter;

mod args;
mod config;
mod discover;

pub use args::Args;

use std::path::{Path, PathBuf};

use log::{error, info, warn};

use inkdoc::{DocBuilder, InkdocError, export};

use discover::Discovery;

/// Run the Inkdoc CLI application
///
/// This function discovers the source files, parses each of them through
/// the Inkdoc pipeline and writes the resulting documentation as JSON to the
/// output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `InkdocError` for:
/// - File I/O errors
/// - Configuration and tag settings loading errors
/// - Reading or parsing a source file, unless `--keep-going` is set
/// - Export errors
pub fn run(args: &Args) -> Result<(), InkdocError> {
    info!(
        inputs:? = args.inputs,
        output_path = args.output;
        "Extracting documentation"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;
    let discovery_config = app_config.discovery();

    // Discover source files
    let inputs: Vec<PathBuf> = if args.inputs.is_empty() {
        discovery_config.inputs().to_vec()
    } else {
        args.inputs.iter().map(PathBuf::from).collect()
    };
    let files = Discovery::new(discovery_config)?.discover(&inputs)?;
    if files.is_empty() {
        warn!(inputs:? = inputs; "No source files found");
    }

    // Parse every file into one tree
    let mut builder = DocBuilder::from_config(&app_config)?;
    let mut skipped = 0usize;
    for file in &files {
        match builder.parse_file(file) {
            Ok(()) => {}
            Err(err @ (InkdocError::Parse { .. } | InkdocError::Io(_))) if args.keep_going => {
                skipped += 1;
                for report in error_adapter::render(&err) {
                    error!(path:? = file; "Skipping file: {report}");
                }
            }
            Err(err) => return Err(err),
        }
    }

    // Write output file
    let tags = builder.tags().clone();
    let docs = builder.finish();
    export::write_json(
        Path::new(&args.output),
        &docs,
        &tags,
        discovery_config.all_source_files(),
    )?;

    info!(
        output_file = args.output,
        files = files.len(),
        skipped;
        "Documentation exported successfully"
    );

    Ok(())
}
