//! Run configuration.
//!
//! Configuration is optional and read from TOML. It sets where results are
//! written and, optionally, which files are left alone during a run. The
//! category table is not configurable.
//!
//! # Configuration File Format
//!
//! ```toml
//! results_dir = "results"
//!
//! [exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["**/node_modules/**"]
//! extensions = ["tmp"]
//! ```
//!
//! Excluded files stay where they are and are neither sorted nor reported.
//! With no `[exclude]` table every file takes part.

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".dirsortrc.toml";

/// Default results container, relative to the working directory.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// Directory that receives one `result_<timestamp>` folder per run.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    #[serde(default)]
    pub exclude: ExcludeRules,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_DIR)
}

/// Files left out of sorting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns, matched against the path relative to the sorted folder.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions without the dot, any case.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl SortConfig {
    /// Load configuration, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (must exist)
    /// 2. `.dirsortrc.toml` in the current directory
    /// 3. `~/.config/dirsort/config.toml`
    /// 4. defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dirsort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the exclude rules for matching.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.exclude)
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            exclude: ExcludeRules::default(),
        }
    }
}

/// Exclude rules with glob patterns pre-compiled.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &ExcludeRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            filenames: rules.filenames.iter().cloned().collect(),
            extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            patterns,
        })
    }

    /// Whether a file takes part in sorting.
    ///
    /// `relative_path` is the file's path below the folder being sorted.
    pub fn should_include(&self, relative_path: &Path) -> bool {
        if let Some(name) = relative_path.file_name()
            && self.filenames.contains(name.to_string_lossy().as_ref())
        {
            return false;
        }

        if let Some(ext) = relative_path.extension()
            && self
                .extensions
                .contains(&ext.to_string_lossy().to_lowercase())
        {
            return false;
        }

        !self
            .patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn compiled(exclude: ExcludeRules) -> CompiledFilters {
        SortConfig {
            exclude,
            ..Default::default()
        }
        .compile_filters()
        .unwrap()
    }

    #[test]
    fn test_defaults_include_everything() {
        let config = SortConfig::default();
        assert_eq!(config.results_dir, PathBuf::from("results"));

        let filters = config.compile_filters().unwrap();
        assert!(filters.should_include(Path::new(".hidden.txt")));
        assert!(filters.should_include(Path::new("a/b/photo.jpg")));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
results_dir = "/srv/sorted"

[exclude]
extensions = ["tmp"]
"#,
        )
        .unwrap();

        let config = SortConfig::load(Some(&path)).unwrap();
        assert_eq!(config.results_dir, PathBuf::from("/srv/sorted"));
        assert_eq!(config.exclude.extensions, vec!["tmp".to_string()]);
        assert!(config.exclude.patterns.is_empty());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[exclude]\nfilenames = [\"Thumbs.db\"]\n").unwrap();

        let config = SortConfig::load(Some(&path)).unwrap();
        assert_eq!(config.results_dir, PathBuf::from(DEFAULT_RESULTS_DIR));
        assert_eq!(config.exclude.filenames, vec!["Thumbs.db".to_string()]);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = SortConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "results_dir = [").unwrap();

        let result = SortConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_exclude_filename_and_extension() {
        let filters = compiled(ExcludeRules {
            filenames: vec!["Thumbs.db".to_string()],
            extensions: vec!["TMP".to_string()],
            ..Default::default()
        });

        assert!(!filters.should_include(Path::new("pics/Thumbs.db")));
        assert!(!filters.should_include(Path::new("draft.tmp")));
        assert!(!filters.should_include(Path::new("draft.Tmp")));
        assert!(filters.should_include(Path::new("draft.txt")));
    }

    #[test]
    fn test_exclude_glob_on_relative_path() {
        let filters = compiled(ExcludeRules {
            patterns: vec!["**/node_modules/**".to_string()],
            ..Default::default()
        });

        assert!(!filters.should_include(Path::new("node_modules/pkg/logo.png")));
        assert!(!filters.should_include(Path::new("web/node_modules/pkg/logo.png")));
        assert!(filters.should_include(Path::new("web/my_node_modules/logo.png")));
    }

    #[test]
    fn test_invalid_glob_is_an_error() {
        let config = SortConfig {
            exclude: ExcludeRules {
                patterns: vec!["[invalid".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.compile_filters(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }
}
