//! What a generation run did, and what it could not do.

use std::fmt;
use std::path::PathBuf;

use uvmgen_core::AgentConfig;

use crate::writer::WriteResult;

/// One generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Agents,
    Environment,
    GlobalSettings,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Agents => write!(f, "agent"),
            Pass::Environment => write!(f, "environment"),
            Pass::GlobalSettings => write!(f, "global settings"),
        }
    }
}

/// A recoverable problem. Each one makes the run exit non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A component marker never appeared in the agent's rendered blob.
    MissingComponent { agent: String, suffix: String },
    /// A template rendered with an error; only its outputs were skipped.
    Render { template: String, owner: String, message: String },
    /// A file could not be written.
    Write { path: PathBuf, message: String },
    /// A template could not be resolved; the rest of the pass was abandoned.
    Pass { pass: Pass, message: String },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::MissingComponent { agent, suffix } => {
                write!(f, "agent '{agent}': component '{suffix}' not found in rendered template")
            }
            Failure::Render { template, owner, message } => {
                write!(f, "'{owner}': rendering {template} failed: {message}")
            }
            Failure::Write { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
            Failure::Pass { pass, message } => write!(f, "{pass} pass aborted: {message}"),
        }
    }
}

/// Per-agent outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReport {
    pub name: String,
    pub setting_count: usize,
    pub files: Vec<WriteResult>,
    pub missing: Vec<String>,
    pub repeated_markers: Vec<String>,
}

impl AgentReport {
    pub fn new(agent: &AgentConfig) -> Self {
        AgentReport {
            name: agent.name.0.clone(),
            setting_count: agent.settings.len(),
            files: Vec::new(),
            missing: Vec::new(),
            repeated_markers: Vec::new(),
        }
    }
}

/// Aggregated outcome of all passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub agents: Vec<AgentReport>,
    /// `true` when the configuration had no `agents` section.
    pub agent_pass_skipped: bool,
    pub environment_files: Vec<WriteResult>,
    pub global_settings: Option<WriteResult>,
    pub failures: Vec<Failure>,
}

impl RunReport {
    /// `true` when nothing recoverable went wrong.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every file written (or, in dry-run, that would have been).
    pub fn files(&self) -> impl Iterator<Item = &WriteResult> {
        self.agents
            .iter()
            .flat_map(|a| a.files.iter())
            .chain(self.environment_files.iter())
            .chain(self.global_settings.iter())
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_cover_every_pass() {
        let mut report = RunReport::default();
        let mut agent = AgentReport::new(&AgentConfig::new("spi"));
        agent.files.push(WriteResult::Written { path: "a".into() });
        report.agents.push(agent);
        report.environment_files.push(WriteResult::Written { path: "b".into() });
        report.global_settings = Some(WriteResult::Written { path: "c".into() });
        assert_eq!(report.file_count(), 3);
        assert!(report.is_clean());
    }

    #[test]
    fn failure_messages_name_the_resource() {
        let f = Failure::MissingComponent { agent: "spi".into(), suffix: "if.sv".into() };
        assert!(f.to_string().contains("spi"));
        assert!(f.to_string().contains("if.sv"));
        let f = Failure::Pass { pass: Pass::Environment, message: "template not found: x".into() };
        assert_eq!(f.to_string(), "environment pass aborted: template not found: x");
    }
}
