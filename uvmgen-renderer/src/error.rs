//! Error types for uvmgen-renderer.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::TemplateFamily;

/// All errors that can arise from template loading and rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (syntax, undefined variable, ...).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while loading templates from a directory.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    /// The template directory passed on the command line does not exist.
    #[error("template directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No template with this name is loaded.
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// The template exists but belongs to the other family.
    #[error("template '{name}' is not in the {expected} template family")]
    WrongFamily { name: String, expected: TemplateFamily },
}

impl RenderError {
    /// `true` when a template could not be located or used at all, as opposed
    /// to a failure while rendering it.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            RenderError::TemplateNotFound { .. }
                | RenderError::WrongFamily { .. }
                | RenderError::DirectoryNotFound { .. }
        )
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}
