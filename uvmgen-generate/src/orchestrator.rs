//! Generation passes.
//!
//! A run is: agent pass → environment pass → global-settings pass. Each pass
//! records what it wrote and what went wrong in a [`RunReport`]; only
//! directory creation failures (and ambiguous component descriptors) stop
//! the run outright.
//!
//! Template resolution failures abandon the pass they occur in. The next
//! pass still runs.

use std::error::Error;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use uvmgen_core::{AgentConfig, Configuration};
use uvmgen_renderer::{
    split, AgentComponent, AgentContext, EnvironmentContext, RenderError, Segment,
    TemplateEngine, TemplateFamily, AGENT_FAMILY_DIR, DEFAULT_AGENT_TEMPLATE,
};

use crate::error::GenerateError;
use crate::global_settings;
use crate::planner::DirectoryPlanner;
use crate::report::{AgentReport, Failure, Pass, RunReport};
use crate::writer::{atomic_write, WriteResult};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How agent files are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStrategy {
    /// Render one blob template per agent and split it on `// File:` markers.
    Markers { template: String },
    /// Render every template directly under `agents/` separately; the output
    /// file is `<agent>_<template file name>`.
    PerFile,
}

impl Default for AgentStrategy {
    fn default() -> Self {
        AgentStrategy::Markers {
            template: DEFAULT_AGENT_TEMPLATE.to_string(),
        }
    }
}

/// Run-wide switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub strategy: AgentStrategy,
    /// Plan and render everything but write nothing.
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Everything a run needs, built once and passed through every pass.
pub struct Generator<'a> {
    engine: &'a TemplateEngine,
    planner: DirectoryPlanner,
    options: GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(engine: &'a TemplateEngine, dest_root: impl Into<PathBuf>, options: GenerateOptions) -> Self {
        Generator {
            engine,
            planner: DirectoryPlanner::new(dest_root),
            options,
        }
    }

    pub fn planner(&self) -> &DirectoryPlanner {
        &self.planner
    }

    /// Run every pass against `config`.
    pub fn run(&self, config: &Configuration) -> Result<RunReport, GenerateError> {
        let mut report = RunReport::default();
        self.planner.ensure_dir(self.planner.root(), self.options.dry_run)?;

        self.generate_agents(config, &mut report)?;
        self.generate_environment(config, &mut report)?;
        self.generate_global_settings(config, &mut report)?;

        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Agent pass
    // -----------------------------------------------------------------------

    /// Generate every agent's files, in declaration order.
    pub fn generate_agents(
        &self,
        config: &Configuration,
        report: &mut RunReport,
    ) -> Result<(), GenerateError> {
        let Some(agents) = &config.agents else {
            warn!("configuration has no `agents` section; skipping agent pass");
            report.agent_pass_skipped = true;
            return Ok(());
        };

        match &self.options.strategy {
            AgentStrategy::Markers { template } => {
                self.generate_agents_from_blob(config, agents, template, report)
            }
            AgentStrategy::PerFile => self.generate_agents_per_file(config, agents, report),
        }
    }

    fn generate_agents_from_blob(
        &self,
        config: &Configuration,
        agents: &[AgentConfig],
        template: &str,
        report: &mut RunReport,
    ) -> Result<(), GenerateError> {
        for agent in agents {
            let mut agent_report = AgentReport::new(agent);
            let ctx = AgentContext::new(agent, config.global_settings.as_ref());
            let blob = match self.engine.render_agent(template, &ctx) {
                Ok(blob) => blob,
                Err(err) if err.is_resolution() => {
                    report.agents.push(agent_report);
                    abandon_pass(Pass::Agents, &err, report);
                    return Ok(());
                }
                Err(err) => {
                    record_render_failure(template, &agent.name.0, &err, report);
                    report.agents.push(agent_report);
                    continue;
                }
            };

            self.planner
                .ensure_dir(&self.planner.agent_dir(&agent.name), self.options.dry_run)?;
            let outcome = split(&blob, &AgentComponent::descriptors(&agent.name))?;
            for marker in &outcome.repeated_markers {
                warn!(agent = %agent.name, marker = %marker, "marker repeated; later occurrence ignored");
            }
            agent_report.repeated_markers = outcome.repeated_markers;

            for (descriptor, segment) in outcome.segments {
                match segment {
                    Segment::Found(text) => {
                        let path = self.planner.agent_file(&agent.name, &descriptor.file_name_suffix);
                        if let Some(result) = self.write(path, &format!("{text}\n"), report) {
                            agent_report.files.push(result);
                        }
                    }
                    Segment::Missing => {
                        warn!(
                            agent = %agent.name,
                            component = %descriptor.file_name_suffix,
                            "component marker not found; file skipped"
                        );
                        report.failures.push(Failure::MissingComponent {
                            agent: agent.name.0.clone(),
                            suffix: descriptor.file_name_suffix.clone(),
                        });
                        agent_report.missing.push(descriptor.file_name_suffix);
                    }
                }
            }
            report.agents.push(agent_report);
        }
        Ok(())
    }

    fn generate_agents_per_file(
        &self,
        config: &Configuration,
        agents: &[AgentConfig],
        report: &mut RunReport,
    ) -> Result<(), GenerateError> {
        let templates: Vec<&str> = self
            .engine
            .family_templates(TemplateFamily::Agent)
            .into_iter()
            .filter(|name| Path::new(name).parent() == Some(Path::new(AGENT_FAMILY_DIR)))
            .collect();
        if templates.is_empty() {
            let err = RenderError::TemplateNotFound {
                name: format!("{AGENT_FAMILY_DIR}/*"),
            };
            abandon_pass(Pass::Agents, &err, report);
            return Ok(());
        }

        for agent in agents {
            let mut agent_report = AgentReport::new(agent);
            let ctx = AgentContext::new(agent, config.global_settings.as_ref());
            for template in &templates {
                let content = match self.engine.render_agent(template, &ctx) {
                    Ok(content) => content,
                    Err(err) if err.is_resolution() => {
                        report.agents.push(agent_report);
                        abandon_pass(Pass::Agents, &err, report);
                        return Ok(());
                    }
                    Err(err) => {
                        record_render_failure(template, &agent.name.0, &err, report);
                        continue;
                    }
                };
                self.planner
                    .ensure_dir(&self.planner.agent_dir(&agent.name), self.options.dry_run)?;
                let file_name = template.rsplit('/').next().unwrap_or(template);
                let path = self.planner.agent_file(&agent.name, file_name);
                if let Some(result) = self.write(path, &content, report) {
                    agent_report.files.push(result);
                }
            }
            report.agents.push(agent_report);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Environment pass
    // -----------------------------------------------------------------------

    /// Generate the environment tree: every non-agent template, mirrored
    /// under the destination root with the environment name as prefix.
    pub fn generate_environment(
        &self,
        config: &Configuration,
        report: &mut RunReport,
    ) -> Result<(), GenerateError> {
        for dir in self.engine.environment_directories() {
            self.planner
                .ensure_dir(&self.planner.environment_dir(dir), self.options.dry_run)?;
        }

        let env = &config.environment;
        let ctx = EnvironmentContext::from_config(config);
        for template in self.engine.family_templates(TemplateFamily::Environment) {
            let content = match self.engine.render_environment(template, &ctx) {
                Ok(content) => content,
                Err(err) if err.is_resolution() => {
                    abandon_pass(Pass::Environment, &err, report);
                    return Ok(());
                }
                Err(err) => {
                    record_render_failure(template, &env.name.0, &err, report);
                    continue;
                }
            };
            let path = self.planner.environment_file(&env.name, template);
            if let Some(result) = self.write(path, &content, report) {
                report.environment_files.push(result);
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Global settings pass
    // -----------------------------------------------------------------------

    /// Write `global_config.sv` when the configuration has global settings.
    pub fn generate_global_settings(
        &self,
        config: &Configuration,
        report: &mut RunReport,
    ) -> Result<(), GenerateError> {
        let Some(settings) = &config.global_settings else {
            return Ok(());
        };
        let content = global_settings::render(settings);
        let path = self.planner.global_settings_file();
        let written = self.write(path, &content, report);
        report.global_settings = written;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Write one file; a failure is logged and recorded, never propagated.
    fn write(&self, path: PathBuf, content: &str, report: &mut RunReport) -> Option<WriteResult> {
        match atomic_write(&path, content, self.options.dry_run) {
            Ok(result) => {
                match &result {
                    WriteResult::Written { path } => info!("generated: {}", path.display()),
                    WriteResult::WouldWrite { path } => {
                        info!("[dry-run] would generate: {}", path.display())
                    }
                }
                Some(result)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "write failed");
                report.failures.push(Failure::Write {
                    path,
                    message: describe(&err),
                });
                None
            }
        }
    }
}

fn abandon_pass(pass: Pass, err: &RenderError, report: &mut RunReport) {
    tracing::error!(pass = %pass, error = %err, "pass aborted");
    report.failures.push(Failure::Pass {
        pass,
        message: describe(err),
    });
}

fn record_render_failure(template: &str, owner: &str, err: &RenderError, report: &mut RunReport) {
    let message = describe(err);
    warn!(template = %template, owner = %owner, error = %message, "render failed; outputs skipped");
    report.failures.push(Failure::Render {
        template: template.to_string(),
        owner: owner.to_string(),
        message,
    });
}

/// Error message followed by any source messages it does not already contain.
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
