//! # uvmgen-renderer
//!
//! Tera-based template engine plus the marker splitter that turns one
//! rendered agent template into its component files.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use uvmgen_core::AgentConfig;
//! use uvmgen_renderer::{
//!     split, AgentComponent, AgentContext, TemplateEngine, DEFAULT_AGENT_TEMPLATE,
//! };
//!
//! fn render_spi() {
//!     let agent = AgentConfig::new("spi");
//!     let engine = TemplateEngine::new(None).expect("embedded templates");
//!     let ctx = AgentContext::new(&agent, None);
//!     let blob = engine.render_agent(DEFAULT_AGENT_TEMPLATE, &ctx).expect("render");
//!     let descriptors = AgentComponent::descriptors(&agent.name);
//!     let outcome = split(&blob, &descriptors).expect("valid descriptors");
//!     for (descriptor, segment) in &outcome.segments {
//!         println!("{}: {}", descriptor.file_name_suffix, segment.is_found());
//!     }
//! }
//! ```

pub mod component;
pub mod context;
pub mod engine;
pub mod error;
pub mod splitter;

pub use component::{AgentComponent, MARKER_PREFIX};
pub use context::{AgentContext, EnvironmentContext};
pub use engine::{TemplateEngine, TemplateFamily, AGENT_FAMILY_DIR, DEFAULT_AGENT_TEMPLATE};
pub use error::RenderError;
pub use splitter::{
    split, validate_descriptors, ComponentDescriptor, Segment, SplitError, SplitOutcome,
};
