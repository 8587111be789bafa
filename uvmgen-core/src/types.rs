//! Domain types for a generator configuration.
//!
//! [`AgentConfig`] and [`EnvironmentConfig`] serialize back into the flat
//! `{ name, <setting>... }` shape they were read from, which is exactly the
//! binding shape templates see.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed agent name. Used as a directory name and a file prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentName(pub String);

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AgentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AgentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed environment (testbench) name. Used as a file prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentName(pub String);

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EnvironmentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EnvironmentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// One verification agent. Every key besides `name` is a setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: AgentName,
    #[serde(flatten)]
    pub settings: Mapping,
}

impl AgentConfig {
    pub fn new(name: impl Into<AgentName>) -> Self {
        Self { name: name.into(), settings: Mapping::new() }
    }

    /// Builder-style setter, mostly useful in tests.
    pub fn with_setting(mut self, key: &str, value: impl Into<serde_yaml::Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

/// The shared testbench configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub name: EnvironmentName,
    #[serde(flatten)]
    pub settings: Mapping,
}

impl EnvironmentConfig {
    pub fn new(name: impl Into<EnvironmentName>) -> Self {
        Self { name: name.into(), settings: Mapping::new() }
    }
}

// ---------------------------------------------------------------------------
// Global settings
// ---------------------------------------------------------------------------

/// A scalar global setting. Variant order matters for untagged parsing:
/// signed integers are tried first, then unsigned ones above `i64::MAX`,
/// then reals, then text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GlobalValue {
    Integer(i64),
    Unsigned(u64),
    Real(f64),
    Text(String),
}

impl GlobalValue {
    /// `true` for values rendered without quotes.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, GlobalValue::Text(_))
    }
}

impl fmt::Display for GlobalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalValue::Integer(i) => write!(f, "{i}"),
            GlobalValue::Unsigned(u) => write!(f, "{u}"),
            GlobalValue::Real(r) => write!(f, "{r:?}"),
            GlobalValue::Text(s) => f.write_str(s),
        }
    }
}

/// One `name: value` entry of the `globalSettings` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSetting {
    pub name: String,
    pub value: GlobalValue,
}

/// Ordered global settings; order is the order of the source document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalSettings(pub Vec<GlobalSetting>);

impl GlobalSettings {
    pub fn iter(&self) -> impl Iterator<Item = &GlobalSetting> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&GlobalValue> {
        self.0.iter().find(|s| s.name == name).map(|s| &s.value)
    }
}

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

/// A validated configuration. Read-only once loaded.
///
/// `agents` is `None` when the section was absent from the document, which
/// is distinct from an empty list: the agent pass is skipped with a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub agents: Option<Vec<AgentConfig>>,
    pub environment: EnvironmentConfig,
    pub global_settings: Option<GlobalSettings>,
}

impl Configuration {
    /// Agents in declaration order; empty when the section is absent.
    pub fn agents(&self) -> &[AgentConfig] {
        self.agents.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
