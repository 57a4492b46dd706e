pub mod manifest;
pub mod resolve;

pub use manifest::{KeyList, Manifest, StepEntry};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("manifest not found (looked for precedence.toml in the current directory and its ancestors)")]
    ManifestNotFound,
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("unsupported manifest format: {0} (expected .toml, .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid include pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
