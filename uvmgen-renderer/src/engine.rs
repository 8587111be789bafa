//! Tera rendering engine — [`TemplateFamily`] and [`TemplateEngine`].
//!
//! # Template layout
//!
//! ```text
//! <templates>/
//!   agents/            agent family (reserved name)
//!     agent.sv         one blob per agent, split by `// File:` markers
//!   env.sv             everything else is the environment family;
//!   pkg.sv             its directory tree is mirrored in the output
//!   tests/base_test.sv
//!   top/top.sv
//! ```
//!
//! Templates are either the embedded defaults or, when a directory is given,
//! exactly the files found under it. Template names are relative paths with
//! `/` separators and keep their original case since they become file names.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::{AgentContext, EnvironmentContext};
use crate::error::{io_err, RenderError};

/// Directory name that marks the agent template family.
pub const AGENT_FAMILY_DIR: &str = "agents";

/// Agent blob template used by the marker front-end unless overridden.
pub const DEFAULT_AGENT_TEMPLATE: &str = "agents/agent.sv";

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("agents/agent.sv", include_str!("templates/agents/agent.sv")),
    ("env.sv", include_str!("templates/env.sv")),
    ("pkg.sv", include_str!("templates/pkg.sv")),
    ("scoreboard.sv", include_str!("templates/scoreboard.sv")),
    ("tests/base_test.sv", include_str!("templates/tests/base_test.sv")),
    ("top/top.sv", include_str!("templates/top/top.sv")),
];

// ---------------------------------------------------------------------------
// TemplateFamily
// ---------------------------------------------------------------------------

/// Which generation pass a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateFamily {
    Agent,
    Environment,
}

impl TemplateFamily {
    /// A template is in the agent family iff any path segment is `agents`.
    pub fn of(name: &str) -> TemplateFamily {
        if name.split('/').any(|segment| segment == AGENT_FAMILY_DIR) {
            TemplateFamily::Agent
        } else {
            TemplateFamily::Environment
        }
    }
}

impl fmt::Display for TemplateFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateFamily::Agent => write!(f, "agent"),
            TemplateFamily::Environment => write!(f, "environment"),
        }
    }
}

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Recursively collect files and directories under `dir`, sorted.
fn collect_template_tree(
    root: &Path,
    dir: &Path,
    files: &mut Vec<PathBuf>,
    dirs: &mut Vec<PathBuf>,
) -> Result<(), RenderError> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            dirs.push(path.strip_prefix(root).unwrap_or(path.as_path()).to_path_buf());
            collect_template_tree(root, &path, files, dirs)?;
        } else if meta.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

/// Every ancestor directory of each name, e.g. `a/b/c.sv` → `a`, `a/b`.
fn parent_dirs<'a>(names: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
    let mut dirs = BTreeSet::new();
    for name in names {
        let mut parent = Path::new(name.as_str()).parent();
        while let Some(p) = parent {
            if p.as_os_str().is_empty() {
                break;
            }
            dirs.insert(normalize_template_name(p));
            parent = p.parent();
        }
    }
    dirs
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine over one template tree.
pub struct TemplateEngine {
    tera: Tera,
    names: BTreeSet<String>,
    directories: BTreeSet<String>,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`] from the templates under
    /// `template_dir`, or from the embedded defaults when `None`.
    pub fn new(template_dir: Option<&Path>) -> Result<Self, RenderError> {
        match template_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    /// Engine over the embedded default templates.
    pub fn embedded() -> Result<Self, RenderError> {
        let templates = TPLS
            .iter()
            .map(|(name, content)| ((*name).to_string(), (*content).to_string()))
            .collect::<Vec<_>>();
        let directories = parent_dirs(templates.iter().map(|(name, _)| name));
        Self::build(templates, directories)
    }

    /// Engine over every file under `dir`. Empty directories are kept so the
    /// environment tree can be mirrored exactly.
    pub fn from_dir(dir: &Path) -> Result<Self, RenderError> {
        if !dir.is_dir() {
            return Err(RenderError::DirectoryNotFound { path: dir.to_path_buf() });
        }
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        collect_template_tree(dir, dir, &mut files, &mut dirs)?;

        let mut templates = Vec::with_capacity(files.len());
        for path in files {
            let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
            let name = normalize_template_name(rel);
            let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            tracing::debug!(template = %name, "loaded template");
            templates.push((name, contents));
        }
        let directories = dirs.iter().map(|d| normalize_template_name(d)).collect();
        Self::build(templates, directories)
    }

    fn build(
        templates: Vec<(String, String)>,
        directories: BTreeSet<String>,
    ) -> Result<Self, RenderError> {
        let names = templates.iter().map(|(name, _)| name.clone()).collect();
        let mut tera = Tera::default();
        // Generated files are source code, never HTML.
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(templates)?;
        Ok(TemplateEngine { tera, names, directories })
    }

    /// All template names, sorted.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Templates of one family, sorted by name.
    pub fn family_templates(&self, family: TemplateFamily) -> Vec<&str> {
        self.template_names()
            .filter(|name| TemplateFamily::of(name) == family)
            .collect()
    }

    /// Directories of the environment tree (agent subtree excluded), sorted
    /// so parents precede children.
    pub fn environment_directories(&self) -> Vec<&str> {
        self.directories
            .iter()
            .map(String::as_str)
            .filter(|dir| TemplateFamily::of(dir) == TemplateFamily::Environment)
            .collect()
    }

    /// Render an agent-family template.
    pub fn render_agent(&self, name: &str, ctx: &AgentContext) -> Result<String, RenderError> {
        self.check_family(name, TemplateFamily::Agent)?;
        self.render(name, &ctx.to_tera_context()?)
    }

    /// Render an environment-family template.
    pub fn render_environment(
        &self,
        name: &str,
        ctx: &EnvironmentContext,
    ) -> Result<String, RenderError> {
        self.check_family(name, TemplateFamily::Environment)?;
        self.render(name, &ctx.to_tera_context()?)
    }

    /// Render any loaded template with a prepared context.
    pub fn render(&self, name: &str, ctx: &tera::Context) -> Result<String, RenderError> {
        if !self.has_template(name) {
            return Err(RenderError::TemplateNotFound { name: name.to_string() });
        }
        Ok(self.tera.render(name, ctx)?)
    }

    fn check_family(&self, name: &str, expected: TemplateFamily) -> Result<(), RenderError> {
        if !self.has_template(name) {
            return Err(RenderError::TemplateNotFound { name: name.to_string() });
        }
        if TemplateFamily::of(name) != expected {
            return Err(RenderError::WrongFamily { name: name.to_string(), expected });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
