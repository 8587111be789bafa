//! Error types for uvmgen-generate.

use std::path::PathBuf;

use thiserror::Error;

use uvmgen_core::ConfigError;
use uvmgen_renderer::{RenderError, SplitError};

/// Errors that stop a whole generation run.
///
/// Per-file problems (a missing component, a failed write, a failed pass)
/// are not errors; they are collected in a [`crate::RunReport`].
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The template engine could not be built.
    #[error("template error: {0}")]
    Render(#[from] RenderError),

    /// A component descriptor set was ambiguous.
    #[error("component split error: {0}")]
    Split(#[from] SplitError),

    /// A destination directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`GenerateError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> GenerateError {
    GenerateError::Io {
        path: path.into(),
        source,
    }
}
