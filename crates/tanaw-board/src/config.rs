//! Board configuration, read from an optional YAML file.
//!
//! ```yaml
//! page_size: 20
//! data_dir: ./mock
//! format: json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output format for list results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Aligned table for the terminal.
    #[default]
    Text,
    /// The query state and result page as pretty JSON.
    Json,
}

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Rows per page when `--page-size` is not given.
    pub page_size: usize,
    /// Directory with the JSON datasets. The embedded mock data is used when unset.
    pub data_dir: Option<PathBuf>,
    pub format: Format,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            page_size: tanaw_query::Page::DEFAULT_SIZE,
            data_dir: None,
            format: Format::Text,
        }
    }
}

impl BoardConfig {
    /// Loads and validates a config file.
    ///
    /// A relative `data_dir` is resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = BoardConfig::from_yaml(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        if let (Some(dir), Some(base)) = (&config.data_dir, path.parent()) {
            if dir.is_relative() {
                config.data_dir = Some(base.join(dir));
            }
        }
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Parses and validates config from a YAML string.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(BoardConfig::default());
        }
        let config: BoardConfig =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "page_size",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.format, Format::Text);
        assert!(config.data_dir.is_none());
        assert_eq!(BoardConfig::from_yaml("").unwrap(), config);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = BoardConfig::from_yaml("format: json\n").unwrap();
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn zero_page_size_rejected() {
        let err = BoardConfig::from_yaml("page_size: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "page_size", .. }));
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = BoardConfig::from_yaml("pagesize: 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_resolves_relative_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tanaw.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "page_size: 5\ndata_dir: mock").unwrap();

        let config = BoardConfig::load(&path).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.data_dir, Some(dir.path().join("mock")));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = BoardConfig::load(Path::new("/nonexistent/tanaw.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/tanaw.yaml"));
    }
}
