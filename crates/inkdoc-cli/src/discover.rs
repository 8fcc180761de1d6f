//! Source file discovery.
//!
//! Directories are walked recursively with `walkdir`, visiting entries in
//! file name order, so the parse order, and with it last-write-wins merging,
//! is stable across platforms. File names are matched against the configured patterns;
//! files given explicitly on the command line are always kept.

use std::{fs, io, path::PathBuf};

use log::{debug, trace};
use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use inkdoc::{InkdocError, config::DiscoveryConfig};

/// Compiled file and directory filters.
#[derive(Debug)]
pub struct Discovery {
    file_pattern: Regex,
    ignore_file_pattern: Option<Regex>,
    ignore_dir_patterns: Vec<Regex>,
}

impl Discovery {
    /// Compiles the patterns of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`InkdocError::Config`] naming the first pattern that does
    /// not compile.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, InkdocError> {
        Ok(Self {
            file_pattern: compile("file_pattern", config.file_pattern())?,
            ignore_file_pattern: config
                .ignore_file_pattern()
                .map(|pattern| compile("ignore_file_pattern", pattern))
                .transpose()?,
            ignore_dir_patterns: config
                .ignore_dir_patterns()
                .iter()
                .map(|pattern| compile("ignore_dir_patterns", pattern))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Returns the source files under `inputs`, in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`InkdocError::Io`] if an input does not exist or a directory
    /// cannot be read.
    pub fn discover(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>, InkdocError> {
        let mut files = Vec::new();

        for input in inputs {
            if !fs::metadata(input)?.is_dir() {
                files.push(input.clone());
                continue;
            }

            let walker = WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !self.is_ignored_dir(entry));
            for entry in walker {
                let entry = entry.map_err(io::Error::from)?;
                if entry.file_type().is_file() && self.accepts(&entry.file_name().to_string_lossy()) {
                    files.push(entry.into_path());
                }
            }
        }

        debug!(inputs = inputs.len(), files = files.len(); "Discovered source files");
        Ok(files)
    }

    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        let ignored = self.ignore_dir_patterns.iter().any(|re| re.is_match(&name));
        if ignored {
            trace!(path:? = entry.path(); "Skipping ignored directory");
        }
        ignored
    }

    fn accepts(&self, name: &str) -> bool {
        if self
            .ignore_file_pattern
            .as_ref()
            .is_some_and(|re| re.is_match(name))
        {
            return false;
        }
        self.file_pattern.is_match(name)
    }
}

fn compile(field: &str, pattern: &str) -> Result<Regex, InkdocError> {
    Regex::new(pattern)
        .map_err(|err| InkdocError::Config(format!("Invalid `{field}` pattern `{pattern}`: {err}")))
}
