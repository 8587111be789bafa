//! Single entrypoint used by the CLI: load, build the engine, run every pass.

use std::path::Path;

use tracing::info;

use uvmgen_core::config;
use uvmgen_renderer::TemplateEngine;

use crate::error::GenerateError;
use crate::orchestrator::{GenerateOptions, Generator};
use crate::report::RunReport;

/// Generate the testbench described by `config_path` under `dest_root`.
///
/// `template_dir` replaces the embedded template set when given. Errors
/// returned here are fatal; everything recoverable lands in the report.
pub fn run(
    config_path: &Path,
    dest_root: &Path,
    template_dir: Option<&Path>,
    options: GenerateOptions,
) -> Result<RunReport, GenerateError> {
    let config = config::load(config_path)?;
    info!(
        config = %config_path.display(),
        agents = config.agents().len(),
        environment = %config.environment.name,
        "configuration loaded"
    );

    let engine = TemplateEngine::new(template_dir)?;
    Generator::new(&engine, dest_root, options).run(&config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use uvmgen_core::ConfigError;

    use super::*;

    #[test]
    fn missing_config_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = run(
            &tmp.path().join("absent.yaml"),
            &tmp.path().join("out"),
            None,
            GenerateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::Config(ConfigError::NotFound { .. })), "got: {err}");
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn missing_template_dir_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let cfg = tmp.path().join("cfg.yaml");
        fs::write(&cfg, "environment:\n  name: tb\n").unwrap();
        let err = run(
            &cfg,
            &tmp.path().join("out"),
            Some(&tmp.path().join("no_templates")),
            GenerateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::Render(_)), "got: {err}");
    }

    #[test]
    fn run_with_embedded_templates() {
        let tmp = TempDir::new().unwrap();
        let cfg = tmp.path().join("cfg.yaml");
        fs::write(
            &cfg,
            "agents:\n  - name: spi\n    data_width: 8\nenvironment:\n  name: tb\n",
        )
        .unwrap();
        let report = run(&cfg, &tmp.path().join("out"), None, GenerateOptions::default()).unwrap();
        assert!(report.is_clean(), "failures: {:?}", report.failures);
        assert!(tmp.path().join("out/agents/spi/spi_agent.sv").is_file());
        assert!(tmp.path().join("out/tb_env.sv").is_file());
    }
}
