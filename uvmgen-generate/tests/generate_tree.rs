//! End-to-end generation from a YAML file into a scratch directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uvmgen_generate::{pipeline, AgentStrategy, Failure, GenerateOptions, Pass};

const CONFIG: &str = r#"
agents:
  - name: spi
    data_width: 8
    active: true
  - name: i2c
    addr_width: 7
environment:
  name: tb
  timeout_ns: 1000
globalSettings:
  CLK_PERIOD: 10
  BUS: apb
"#;

fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("testbench.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

/// Every file under `root`, keyed by its `/`-separated relative path.
fn snapshot(root: &Path) -> BTreeMap<String, String> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                out.insert(rel, fs::read_to_string(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn spi_i2c_tb_layout() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), CONFIG);
    let out = tmp.path().join("out");

    let report = pipeline::run(&cfg, &out, None, GenerateOptions::default()).unwrap();
    assert!(report.is_clean(), "failures: {:?}", report.failures);

    let files = snapshot(&out);
    for agent in ["spi", "i2c"] {
        for suffix in ["seq_item.sv", "config.sv", "driver.sv", "monitor.sv", "sequencer.sv", "agent.sv", "if.sv"] {
            let key = format!("agents/{agent}/{agent}_{suffix}");
            assert!(files.contains_key(&key), "missing {key}");
        }
    }
    assert!(files.contains_key("tb_env.sv"));
    assert!(files.contains_key("tests/tb_base_test.sv"));
    assert!(files.contains_key("global_config.sv"));
    assert!(
        !files.keys().any(|k| k.starts_with("agents/") && k.contains("/tb_")),
        "environment files must not land under agents/"
    );

    let driver = &files["agents/spi/spi_driver.sv"];
    assert!(driver.starts_with("// File: spi_driver.sv\n"));
    assert!(!driver.contains("// File: spi_monitor.sv"), "segments must be disjoint");
    assert!(files["tb_env.sv"].contains("i2c"), "environment sees every agent");
}

#[test]
fn regeneration_is_byte_identical() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), CONFIG);
    let out = tmp.path().join("out");

    pipeline::run(&cfg, &out, None, GenerateOptions::default()).unwrap();
    let first = snapshot(&out);
    pipeline::run(&cfg, &out, None, GenerateOptions::default()).unwrap();
    assert_eq!(first, snapshot(&out));
}

#[test]
fn regeneration_keeps_foreign_files() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), CONFIG);
    let out = tmp.path().join("out");

    pipeline::run(&cfg, &out, None, GenerateOptions::default()).unwrap();
    fs::write(out.join("agents/spi/notes.txt"), "mine").unwrap();
    pipeline::run(&cfg, &out, None, GenerateOptions::default()).unwrap();
    assert_eq!(fs::read_to_string(out.join("agents/spi/notes.txt")).unwrap(), "mine");
}

#[test]
fn user_templates_with_nested_directories() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    fs::create_dir_all(templates.join("agents")).unwrap();
    fs::create_dir_all(templates.join("seq/lib")).unwrap();
    fs::write(
        templates.join("agents/agent.sv"),
        "{% for c in [\"if.sv\", \"driver.sv\"] %}// File: {{ agent.name }}_{{ c }}\n{{ c }}\n{% endfor %}",
    )
    .unwrap();
    fs::write(templates.join("seq/lib/seq_lib.sv"), "// {{ env.name }} sequences\n").unwrap();

    let cfg = write_config(tmp.path(), CONFIG);
    let out = tmp.path().join("out");
    let report = pipeline::run(&cfg, &out, Some(&templates), GenerateOptions::default()).unwrap();

    assert_eq!(
        fs::read_to_string(out.join("seq/lib/tb_seq_lib.sv")).unwrap(),
        "// tb sequences\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("agents/i2c/i2c_if.sv")).unwrap(),
        "// File: i2c_if.sv\nif.sv\n"
    );
    let missing = report
        .failures
        .iter()
        .filter(|f| matches!(f, Failure::MissingComponent { .. }))
        .count();
    assert_eq!(missing, 2 * 5);
}

#[test]
fn per_file_mode_with_missing_agent_templates_still_builds_environment() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("env.sv"), "class {{ env.name }}_env;\n").unwrap();

    let cfg = write_config(tmp.path(), CONFIG);
    let out = tmp.path().join("out");
    let options = GenerateOptions { strategy: AgentStrategy::PerFile, dry_run: false };
    let report = pipeline::run(&cfg, &out, Some(&templates), options).unwrap();

    assert!(matches!(
        report.failures.as_slice(),
        [Failure::Pass { pass: Pass::Agents, .. }]
    ));
    assert_eq!(fs::read_to_string(out.join("tb_env.sv")).unwrap(), "class tb_env;\n");
    assert!(out.join("global_config.sv").is_file());
}
