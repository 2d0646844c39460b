use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Replay configuration loaded from YAML; every field can also be set (or
/// overridden) on the command line.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ReplayConfig {
    /// Player to reconstruct the table from when folding states.
    #[serde(default)]
    pub self_player_id: Option<String>,
    /// Restrict printed records to one namespace.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Directory receiving one record file per namespace.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Fold game messages into table states and print each change.
    #[serde(default)]
    pub states: bool,
}

impl ReplayConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let cfg: ReplayConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(namespace) = &self.namespace {
            if !namespace.starts_with('/') {
                return Err(ValidationError::InvalidField {
                    field: "namespace".to_owned(),
                    message: format!("namespaces start with '/', got {namespace:?}"),
                });
            }
        }
        if let Some(self_player_id) = &self.self_player_id {
            if self_player_id.is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "self_player_id".to_owned(),
                    message: "player id must not be empty".to_owned(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
