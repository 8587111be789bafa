//! uvmgen core library — configuration types, loading, validation, errors.
//!
//! - [`types`] — newtypes and the validated [`Configuration`]
//! - [`config`] — load a YAML document from disk or a string
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::{
    AgentConfig, AgentName, Configuration, EnvironmentConfig, EnvironmentName, GlobalSetting,
    GlobalSettings, GlobalValue,
};
