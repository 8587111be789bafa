//! YAML configuration loading.
//!
//! # Document layout
//!
//! ```yaml
//! agents:            # alias: uvcs
//!   - name: spi
//!     data_width: 32
//!   - name: i2c
//! environment:       # alias: env
//!   name: tb
//!   clock_period: 10
//! globalSettings:    # alias: global_settings (optional)
//!   BUS_NAME: "apb"
//!   TIMEOUT: 1000
//! ```
//!
//! A missing `agents` section is allowed and reported as `None`; a missing
//! `environment` section is a [`ConfigError::MissingSection`].

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;
use crate::types::{
    AgentConfig, Configuration, EnvironmentConfig, GlobalSetting, GlobalSettings, GlobalValue,
};

/// Shape of the document as written, before validation.
#[derive(Debug, Deserialize)]
struct RawConfiguration {
    #[serde(default, alias = "uvcs")]
    agents: Option<Vec<AgentConfig>>,
    #[serde(default, alias = "env")]
    environment: Option<EnvironmentConfig>,
    #[serde(default, rename = "globalSettings", alias = "global_settings")]
    global_settings: Option<Mapping>,
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load and validate the configuration at `path`.
///
/// Returns [`ConfigError::NotFound`] if `path` is not an existing file and
/// [`ConfigError::Parse`] (with path + line context) if the YAML is malformed.
pub fn load(path: &Path) -> Result<Configuration, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_yaml_str(&contents, path)
}

/// Parse and validate a configuration held in memory.
///
/// `origin` is only used to annotate parse errors.
pub fn from_yaml_str(contents: &str, origin: &Path) -> Result<Configuration, ConfigError> {
    let raw: RawConfiguration = serde_yaml::from_str(contents).map_err(|source| {
        ConfigError::Parse { path: origin.to_path_buf(), source }
    })?;
    validate(raw)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(raw: RawConfiguration) -> Result<Configuration, ConfigError> {
    let environment = raw
        .environment
        .ok_or(ConfigError::MissingSection { section: "environment" })?;
    validate_name(&environment.name.0)?;

    if let Some(agents) = &raw.agents {
        let mut seen = HashSet::new();
        for agent in agents {
            validate_name(&agent.name.0)?;
            if !seen.insert(agent.name.0.as_str()) {
                return Err(ConfigError::DuplicateAgent { name: agent.name.0.clone() });
            }
        }
    }

    let global_settings = raw.global_settings.map(convert_globals).transpose()?;

    Ok(Configuration {
        agents: raw.agents,
        environment,
        global_settings,
    })
}

/// Names become path components and file prefixes, so they must be a single
/// non-empty component.
fn validate_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.contains('/') || name.contains('\\') {
        "must not contain path separators"
    } else if name == "." || name == ".." {
        "must not be a relative path component"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidName { name: name.to_string(), reason })
}

fn convert_globals(mapping: Mapping) -> Result<GlobalSettings, ConfigError> {
    let mut settings = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = match key {
            Value::String(s) => s,
            other => {
                return Err(ConfigError::InvalidGlobal {
                    key: format!("{other:?}"),
                    reason: "key must be a string",
                });
            }
        };
        if !is_identifier(&name) {
            return Err(ConfigError::InvalidGlobal {
                key: name,
                reason: "key must be a SystemVerilog identifier",
            });
        }
        let value: GlobalValue = match serde_yaml::from_value(value) {
            Ok(value) => value,
            Err(_) => {
                return Err(ConfigError::InvalidGlobal {
                    key: name,
                    reason: "expected a string or number",
                });
            }
        };
        if let GlobalValue::Real(r) = &value {
            if !r.is_finite() {
                return Err(ConfigError::InvalidGlobal {
                    key: name,
                    reason: "real values must be finite",
                });
            }
        }
        settings.push(GlobalSetting { name, value });
    }
    Ok(GlobalSettings(settings))
}

/// `[A-Za-z_][A-Za-z0-9_$]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentName;

    fn parse(yaml: &str) -> Result<Configuration, ConfigError> {
        from_yaml_str(yaml, Path::new("test.yaml"))
    }

    #[test]
    fn full_document_parses_in_order() {
        let cfg = parse(
            "agents:\n  - name: spi\n    data_width: 32\n  - name: i2c\n\
             environment:\n  name: tb\n\
             globalSettings:\n  ZETA: 1\n  ALPHA: \"a\"\n",
        )
        .expect("parse");
        let names: Vec<_> = cfg.agents().iter().map(|a| a.name.0.as_str()).collect();
        assert_eq!(names, ["spi", "i2c"]);
        assert_eq!(cfg.environment.name.0, "tb");
        let globals = cfg.global_settings.expect("globals");
        let keys: Vec<_> = globals.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(keys, ["ZETA", "ALPHA"], "insertion order must be kept");
    }

    #[test]
    fn legacy_section_names_are_accepted() {
        let cfg = parse("uvcs:\n  - name: apb\nenv:\n  name: top\n").expect("parse");
        assert_eq!(cfg.agents()[0].name, AgentName::from("apb"));
        assert_eq!(cfg.environment.name.0, "top");
    }

    #[test]
    fn missing_agents_is_none_not_error() {
        let cfg = parse("environment:\n  name: tb\n").expect("parse");
        assert!(cfg.agents.is_none());
        assert!(cfg.agents().is_empty());
    }

    #[test]
    fn missing_environment_is_fatal() {
        let err = parse("agents:\n  - name: spi\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection { section: "environment" }));
    }

    #[test]
    fn duplicate_agent_names_are_rejected() {
        let err = parse("agents:\n  - name: spi\n  - name: spi\nenvironment:\n  name: tb\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateAgent { ref name } if name == "spi"));
    }

    #[test]
    fn boolean_global_is_rejected() {
        let err = parse("environment:\n  name: tb\nglobalSettings:\n  FLAG: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlobal { ref key, .. } if key == "FLAG"));
    }

    #[test]
    fn integers_above_i64_stay_integers() {
        let cfg = parse(
            "environment:\n  name: tb\n\
             globalSettings:\n  MASK: 18446744073709551615\n  BIG: 9223372036854775808\n",
        )
        .expect("parse");
        let globals = cfg.global_settings.expect("globals");
        assert_eq!(globals.get("MASK"), Some(&GlobalValue::Unsigned(u64::MAX)));
        assert_eq!(globals.get("BIG"), Some(&GlobalValue::Unsigned(1 << 63)));
    }

    #[test]
    fn non_finite_reals_are_rejected() {
        for literal in [".inf", "-.inf", ".nan"] {
            let yaml = format!("environment:\n  name: tb\nglobalSettings:\n  X: {literal}\n");
            let err = parse(&yaml).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidGlobal { ref key, reason } if key == "X" && reason.contains("finite")),
                "{literal}: got {err}"
            );
        }
    }

    #[test]
    fn global_keys_must_be_identifiers() {
        for key in ["my key", "1WIDTH", "a-b", "\"\""] {
            let yaml = format!("environment:\n  name: tb\nglobalSettings:\n  {key}: 1\n");
            let err = parse(&yaml).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidGlobal { .. }), "{key}: got {err}");
        }
        assert!(parse("environment:\n  name: tb\nglobalSettings:\n  _W$1: 1\n").is_ok());
    }
}
