//! Template bindings — serializable rendering payloads.
//!
//! Agent templates see `agent`, `globals`, and `meta`. Environment templates
//! see `env`, `agents`, `globals`, and `meta`. Nothing here depends on the
//! clock, so rendering the same configuration twice gives identical text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use uvmgen_core::{AgentConfig, Configuration, EnvironmentConfig, GlobalSettings, GlobalValue};

use crate::error::RenderError;

/// Bindings for one render of the agent template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    /// `{ name, <setting>... }` exactly as configured.
    pub agent: AgentConfig,
    /// Global settings keyed by name.
    pub globals: BTreeMap<String, GlobalValue>,
    pub meta: MetaCtx,
}

/// Bindings for environment templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentContext {
    /// `{ name, <setting>... }` exactly as configured.
    pub env: EnvironmentConfig,
    /// Every agent in declaration order, so the testbench can instantiate them.
    pub agents: Vec<AgentConfig>,
    pub globals: BTreeMap<String, GlobalValue>,
    pub meta: MetaCtx,
}

/// Generator metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaCtx {
    pub generator_version: String,
}

impl Default for MetaCtx {
    fn default() -> Self {
        MetaCtx {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

fn globals_map(globals: Option<&GlobalSettings>) -> BTreeMap<String, GlobalValue> {
    globals
        .map(|g| g.iter().map(|s| (s.name.clone(), s.value.clone())).collect())
        .unwrap_or_default()
}

impl AgentContext {
    pub fn new(agent: &AgentConfig, globals: Option<&GlobalSettings>) -> Self {
        AgentContext {
            agent: agent.clone(),
            globals: globals_map(globals),
            meta: MetaCtx::default(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

impl EnvironmentContext {
    pub fn from_config(config: &Configuration) -> Self {
        EnvironmentContext {
            env: config.environment.clone(),
            agents: config.agents().to_vec(),
            globals: globals_map(config.global_settings.as_ref()),
            meta: MetaCtx::default(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uvmgen_core::{GlobalSetting, GlobalSettings};

    fn config() -> Configuration {
        Configuration {
            agents: Some(vec![
                AgentConfig::new("spi").with_setting("data_width", 16),
                AgentConfig::new("i2c"),
            ]),
            environment: EnvironmentConfig::new("tb"),
            global_settings: Some(GlobalSettings(vec![GlobalSetting {
                name: "TIMEOUT".to_string(),
                value: GlobalValue::Integer(100),
            }])),
        }
    }

    #[test]
    fn agent_context_flattens_settings() {
        let cfg = config();
        let ctx = AgentContext::new(&cfg.agents()[0], cfg.global_settings.as_ref());
        let json = serde_json::to_value(&ctx).expect("serialize");
        assert_eq!(json["agent"]["name"], "spi");
        assert_eq!(json["agent"]["data_width"], 16);
        assert_eq!(json["globals"]["TIMEOUT"], 100);
        ctx.to_tera_context().expect("tera context");
    }

    #[test]
    fn environment_context_lists_agents_in_order() {
        let ctx = EnvironmentContext::from_config(&config());
        let names: Vec<_> = ctx.agents.iter().map(|a| a.name.0.as_str()).collect();
        assert_eq!(names, ["spi", "i2c"]);
        assert_eq!(ctx.env.name.0, "tb");
        ctx.to_tera_context().expect("tera context");
    }
}
