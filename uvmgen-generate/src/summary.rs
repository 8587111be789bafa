//! Per-agent run summary, rendered as a table by the CLI.

use crate::report::RunReport;

/// One line per agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub name: String,
    pub settings: usize,
    pub files: usize,
    pub missing: Vec<String>,
}

/// Counts distilled from a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub agent_count: usize,
    pub rows: Vec<SummaryRow>,
    pub environment_files: usize,
    pub global_settings: bool,
    pub failures: usize,
}

impl Summary {
    pub fn from_report(report: &RunReport) -> Self {
        let rows = report
            .agents
            .iter()
            .map(|agent| SummaryRow {
                name: agent.name.clone(),
                settings: agent.setting_count,
                files: agent.files.len(),
                missing: agent.missing.clone(),
            })
            .collect::<Vec<_>>();
        Summary {
            agent_count: rows.len(),
            rows,
            environment_files: report.environment_files.len(),
            global_settings: report.global_settings.is_some(),
            failures: report.failures.len(),
        }
    }
}
