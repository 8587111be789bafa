//! # uvmgen-generate
//!
//! Output planning, file writing, and pass orchestration.
//!
//! Call [`pipeline::run`] to load a configuration, build the template engine,
//! and run every pass, or drive a [`Generator`] directly with an already
//! loaded [`uvmgen_core::Configuration`].

pub mod error;
pub mod global_settings;
pub mod orchestrator;
pub mod pipeline;
pub mod planner;
pub mod report;
pub mod summary;
pub mod writer;

pub use error::GenerateError;
pub use orchestrator::{AgentStrategy, GenerateOptions, Generator};
pub use planner::DirectoryPlanner;
pub use report::{AgentReport, Failure, Pass, RunReport};
pub use summary::{Summary, SummaryRow};
pub use writer::WriteResult;
