//! Command-line argument definitions for the Inkdoc CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, failure handling and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Inkdoc documentation extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Files or directories to scan for doc blocks
    #[arg(help = "Files or directories to scan [default: configured inputs]")]
    pub inputs: Vec<String>,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "docs.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Skip files that fail to parse instead of stopping
    #[arg(long)]
    pub keep_going: bool,
}
