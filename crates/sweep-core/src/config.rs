//! Configuration loading and parsing for Sweep
//!
//! Provides functionality to load and parse `sweep.toml` configuration files.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "sweep.toml";

pub const DEFAULT_MARKER: &str = "TODO: Unused";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["exclude", "analysis", "rewrite"];
const KNOWN_ANALYSIS_KEYS: &[&str] = &["ignore_names", "ignore_underscore", "report_exports"];
const KNOWN_REWRITE_KEYS: &[&str] = &["marker"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory names skipped while enumerating files.
    pub exclude: Vec<String>,
    pub analysis: AnalysisConfig,
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Names never reported, whatever their usage.
    pub ignore_names: Vec<String>,
    /// Skip names starting with `_`.
    pub ignore_underscore: bool,
    pub report_exports: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ignore_names: Vec::new(),
            ignore_underscore: false,
            report_exports: true,
        }
    }
}

impl AnalysisConfig {
    pub fn is_ignored(&self, name: &str) -> bool {
        (self.ignore_underscore && name.starts_with('_'))
            || self.ignore_names.iter().any(|n| n == name)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewriteConfig {
    /// Text opening every annotation comment.
    pub marker: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_warnings(path).map(|result| result.config)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let warnings = detect_unknown_keys(&content);

    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    for (section, known) in [
        ("analysis", KNOWN_ANALYSIS_KEYS),
        ("rewrite", KNOWN_REWRITE_KEYS),
    ] {
        if let Some(toml::Value::Table(entries)) = table.get(section) {
            for key in entries.keys() {
                if !known.contains(&key.as_str()) {
                    warnings.push(format!(
                        "Unknown config option in [{}]: '{}'",
                        section, key
                    ));
                }
            }
        }
    }

    warnings
}

/// Discovers `sweep.toml` above `start_dir`. A missing file yields defaults;
/// an unreadable or invalid one is an error.
pub fn discover_config(start_dir: &Path) -> Result<ConfigResult, ConfigError> {
    match find_config_file(start_dir) {
        Some(path) => load_config_with_warnings(&path),
        None => Ok(ConfigResult::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    #[test]
    fn load_config_from_file() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
exclude = ["dist", "vendor"]

[analysis]
ignore_names = ["React"]
ignore_underscore = true
report_exports = false

[rewrite]
marker = "FIXME: dead"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();

        assert_eq!(config.exclude, vec!["dist", "vendor"]);
        assert_eq!(config.analysis.ignore_names, vec!["React"]);
        assert!(config.analysis.ignore_underscore);
        assert!(!config.analysis.report_exports);
        assert_eq!(config.rewrite.marker, "FIXME: dead");
    }

    #[test]
    fn default_config_when_missing() {
        let dir = create_temp_dir();
        let result = discover_config(dir.path()).unwrap();

        assert_eq!(result.config, Config::default());
        assert!(result.warnings.is_empty());
        assert!(result.config.analysis.report_exports);
        assert_eq!(result.config.rewrite.marker, DEFAULT_MARKER);
    }

    #[test]
    fn error_on_invalid_toml() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "this is not valid { toml }").unwrap();

        let result = load_config(&config_path);

        match result.unwrap_err() {
            ConfigError::ParseError { path, message } => {
                assert_eq!(path, config_path);
                assert!(!message.is_empty());
            }
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn discover_surfaces_invalid_config() {
        let dir = create_temp_dir();
        fs::write(dir.path().join(CONFIG_FILENAME), "exclude = 3").unwrap();

        assert!(discover_config(dir.path()).is_err());
    }

    #[test]
    fn find_config_file_in_parent_directory() {
        let parent = create_temp_dir();
        let child = parent.path().join("subdir");
        fs::create_dir(&child).unwrap();
        let config_path = parent.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "").unwrap();

        let found = find_config_file(&child);

        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "[analysis]\nignore_underscore = true").unwrap();

        let config = load_config(&config_path).unwrap();

        assert!(config.exclude.is_empty());
        assert!(config.analysis.ignore_underscore);
        assert!(config.analysis.report_exports);
        assert_eq!(config.rewrite, RewriteConfig::default());
    }

    #[test]
    fn unknown_keys_produce_warnings() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            "colour = true\n[analysis]\nignore = []\n[rewrite]\nstyle = \"block\"",
        )
        .unwrap();

        let result = load_config_with_warnings(&config_path).unwrap();

        assert_eq!(
            result.warnings,
            vec![
                "Unknown config option: 'colour'",
                "Unknown config option in [analysis]: 'ignore'",
                "Unknown config option in [rewrite]: 'style'",
            ]
        );
    }

    #[test]
    fn ignore_rules() {
        let analysis = AnalysisConfig {
            ignore_names: vec!["React".to_string()],
            ignore_underscore: true,
            report_exports: true,
        };

        assert!(analysis.is_ignored("React"));
        assert!(analysis.is_ignored("_private"));
        assert!(!analysis.is_ignored("visible"));
        assert!(!AnalysisConfig::default().is_ignored("_private"));
    }

    #[test]
    fn config_error_display_is_helpful() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("/path/to/sweep.toml"),
            message: "expected `=`".to_string(),
        };

        let msg = format!("{}", err);

        assert!(msg.contains("/path/to/sweep.toml"));
        assert!(msg.contains("expected `=`"));
    }
}
