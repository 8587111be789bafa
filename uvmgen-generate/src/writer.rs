//! Atomic single-file writer.
//!
//! ## `atomic_write`
//!
//! 1. Normalise line endings to LF.
//! 2. Write to `<path>.uvmgen.tmp` next to the target.
//! 3. Rename to the final path (atomic on POSIX), replacing any old file.
//!
//! The parent directory must already exist; creating it is the planner's job.

use std::path::{Path, PathBuf};

use crate::error::{io_err, GenerateError};

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written.
    Written { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::WouldWrite { path } => path,
        }
    }
}

/// Atomically write `content` to `path`, overwriting whatever is there.
pub fn atomic_write(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult, GenerateError> {
    let tmp = PathBuf::from(format!("{}.uvmgen.tmp", path.display()));
    atomic_write_with_tmp(path, content, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, GenerateError> {
    if dry_run {
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    let normalized = content.replace("\r\n", "\n");
    std::fs::write(tmp, normalized).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
