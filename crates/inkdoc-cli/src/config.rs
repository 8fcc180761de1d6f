//! Configuration file lookup for the CLI.
//!
//! The first existing candidate wins: the `--config` path, then
//! `inkdoc/config.toml` in the working directory, then `config.toml` in the
//! platform configuration directory. Without any file the defaults apply.
//! An explicit path that does not exist is an error rather than a fallback.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};

use inkdoc::{InkdocError, config::AppConfig};

/// Relative path of the project-local configuration file.
const LOCAL_CONFIG: &str = "inkdoc/config.toml";

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigLocation {
    Explicit(PathBuf),
    Local(PathBuf),
    System(PathBuf),
}

impl ConfigLocation {
    fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(path)
            | ConfigLocation::Local(path)
            | ConfigLocation::System(path) => path,
        }
    }
}

/// Finds the configuration file to use, if any.
fn locate(explicit: Option<&Path>) -> Option<ConfigLocation> {
    if let Some(path) = explicit {
        return Some(ConfigLocation::Explicit(path.to_path_buf()));
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.is_file() {
        return Some(ConfigLocation::Local(local.to_path_buf()));
    }

    let Some(dirs) = ProjectDirs::from("com", "inkdoc", "inkdoc") else {
        debug!("No platform configuration directory");
        return None;
    };
    let system = dirs.config_dir().join("config.toml");
    if system.is_file() {
        return Some(ConfigLocation::System(system));
    }

    debug!(path:? = system; "No system configuration file");
    None
}

/// Loads the application configuration.
///
/// # Errors
///
/// Returns [`InkdocError::Config`] if `explicit_path` does not exist or the
/// chosen file is not a valid configuration, and [`InkdocError::Io`] if it
/// cannot be read.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, InkdocError> {
    let explicit: Option<&Path> = explicit_path.as_ref().map(|path| path.as_ref());

    let Some(location) = locate(explicit) else {
        debug!("No configuration file found, using defaults");
        return Ok(AppConfig::default());
    };

    let path = location.path();
    if !path.exists() {
        return Err(InkdocError::Config(format!(
            "Missing configuration file: {}",
            path.display()
        )));
    }

    info!(location:? = location; "Loading configuration");
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| {
        InkdocError::Config(format!("Invalid configuration in {}: {err}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let location = locate(Some(Path::new("custom.toml")));
        assert_eq!(
            location,
            Some(ConfigLocation::Explicit(PathBuf::from("custom.toml")))
        );
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[discovery]\nall_source_files = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(config.discovery().all_source_files());
    }

    #[test]
    fn test_missing_explicit_path() {
        let err = load_config(Some("/nonexistent/inkdoc.toml")).unwrap_err();

        assert!(matches!(err, InkdocError::Config(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_config_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parser]\nunknown_option = 1\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, InkdocError::Config(_)));
        assert!(err.to_string().contains("config.toml"));
    }
}
