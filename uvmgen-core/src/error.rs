//! Error types for uvmgen-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file did not exist at the given path.
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure while reading the file.
    #[error("cannot read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with the file path and serde_yaml's line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required top-level section is absent.
    #[error("config is missing required section `{section}`")]
    MissingSection { section: &'static str },

    /// An agent or environment name cannot be used as a file prefix.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Two agents share a name; their files would overwrite each other.
    #[error("duplicate agent name '{name}'")]
    DuplicateAgent { name: String },

    /// A `globalSettings` entry cannot become a SystemVerilog parameter.
    #[error("invalid global setting '{key}': {reason}")]
    InvalidGlobal { key: String, reason: &'static str },
}
