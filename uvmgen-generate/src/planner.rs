//! Output locations.
//!
//! ```text
//! <dest>/
//!   agents/
//!     <agent>/
//!       <agent>_<suffix>           one per agent component
//!   <env>_<file>                   environment templates at the tree root
//!   <dir>/<env>_<file>             environment templates under <dir>/
//!   global_config.sv               only when globalSettings is present
//! ```
//!
//! Agent names are a mandatory prefix of every agent file and name the
//! agent's own directory, so two agents never target the same path.

use std::path::{Path, PathBuf};

use uvmgen_core::{AgentName, EnvironmentName};
use uvmgen_renderer::AGENT_FAMILY_DIR;

use crate::error::GenerateError;
use crate::global_settings::GLOBAL_SETTINGS_FILE;

/// Computes output paths under one destination root.
#[derive(Debug, Clone)]
pub struct DirectoryPlanner {
    root: PathBuf,
}

impl DirectoryPlanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<dest>/agents/<agent>/`
    pub fn agent_dir(&self, agent: &AgentName) -> PathBuf {
        self.root.join(AGENT_FAMILY_DIR).join(&agent.0)
    }

    /// `<dest>/agents/<agent>/<agent>_<suffix>`
    pub fn agent_file(&self, agent: &AgentName, suffix: &str) -> PathBuf {
        self.agent_dir(agent).join(format!("{}_{}", agent, suffix))
    }

    /// Mirror of an environment template directory, e.g. `tests` → `<dest>/tests`.
    pub fn environment_dir(&self, template_dir: &str) -> PathBuf {
        join_relative(&self.root, template_dir)
    }

    /// `tests/base_test.sv` for environment `tb` → `<dest>/tests/tb_base_test.sv`.
    pub fn environment_file(&self, env: &EnvironmentName, template_name: &str) -> PathBuf {
        let (dir, file) = match template_name.rsplit_once('/') {
            Some((dir, file)) => (dir, file),
            None => ("", template_name),
        };
        self.environment_dir(dir).join(format!("{}_{}", env, file))
    }

    /// `<dest>/global_config.sv`
    pub fn global_settings_file(&self) -> PathBuf {
        self.root.join(GLOBAL_SETTINGS_FILE)
    }

    /// Create `dir` and its parents. Existing contents are left alone.
    /// Nothing is created in dry-run mode.
    pub fn ensure_dir(&self, dir: &Path, dry_run: bool) -> Result<(), GenerateError> {
        if dry_run {
            return Ok(());
        }
        std::fs::create_dir_all(dir).map_err(|source| GenerateError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
    }
}

fn join_relative(root: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
