//! The generate command: render the templates for one configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use uvmgen_generate::{pipeline, AgentStrategy, GenerateOptions, RunReport, Summary, WriteResult};
use uvmgen_renderer::DEFAULT_AGENT_TEMPLATE;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// YAML testbench description.
    #[arg(short, long, value_name = "CONFIG")]
    pub config: PathBuf,

    /// Destination directory; created if missing, existing files overwritten.
    #[arg(short, long, value_name = "DEST_DIR")]
    pub output: PathBuf,

    /// Template directory replacing the built-in templates.
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Render each template under `agents/` into its own file instead of
    /// splitting one template on `// File:` markers.
    #[arg(long, conflicts_with = "agent_template")]
    pub per_file: bool,

    /// Agent template split on markers.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_AGENT_TEMPLATE)]
    pub agent_template: String,

    /// Show what would be written without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print a per-agent summary table.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "agent")]
    name: String,
    #[tabled(rename = "settings")]
    settings: usize,
    #[tabled(rename = "files")]
    files: usize,
    #[tabled(rename = "missing")]
    missing: String,
}

impl GenerateArgs {
    fn options(&self) -> GenerateOptions {
        let strategy = if self.per_file {
            AgentStrategy::PerFile
        } else {
            AgentStrategy::Markers {
                template: self.agent_template.clone(),
            }
        };
        GenerateOptions {
            strategy,
            dry_run: self.dry_run,
        }
    }

    /// Run generation. `Ok(false)` means the run finished with recoverable
    /// problems.
    pub fn run(self) -> Result<bool> {
        let report = pipeline::run(
            &self.config,
            &self.output,
            self.templates.as_deref(),
            self.options(),
        )
        .with_context(|| format!("generation from '{}' failed", self.config.display()))?;

        print_files(&report, self.dry_run);
        if self.summary {
            print_summary(&report);
        }
        print_failures(&report);
        Ok(report.is_clean())
    }
}

fn print_files(report: &RunReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let verb = if dry_run { "would generate" } else { "generated" };
    let mark = if report.is_clean() { "✓".green() } else { "!".yellow() };
    println!("{prefix}{mark} {verb} {} file(s)", report.file_count());
    for file in report.files() {
        match file {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
        }
    }
}

fn print_summary(report: &RunReport) {
    let summary = Summary::from_report(report);
    println!("{}", format!("{} agent(s)", summary.agent_count).bold());
    if !summary.rows.is_empty() {
        let rows: Vec<AgentRow> = summary
            .rows
            .iter()
            .map(|row| AgentRow {
                name: row.name.clone(),
                settings: row.settings,
                files: row.files,
                missing: if row.missing.is_empty() {
                    "-".to_string()
                } else {
                    row.missing.join(", ")
                },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }
    println!("{} environment file(s)", summary.environment_files);
    if summary.global_settings {
        println!("global settings written");
    }
}

fn print_failures(report: &RunReport) {
    if report.is_clean() {
        return;
    }
    eprintln!(
        "{}",
        format!("{} problem(s) during generation:", report.failures.len())
            .yellow()
            .bold()
    );
    for failure in &report.failures {
        eprintln!("  {} {failure}", "✗".red());
    }
}
