//! Typed calls into Julia.
//!
//! Sessions never build Julia source by hand. They describe what they need as
//! [`Statement`]s and at most one [`Query`]; [`render_program`] is the single
//! place that turns those into a program for `julia -e`.

use std::fmt;
use std::path::PathBuf;

use juliaenv_core::{DepotPath, Error, JuliaProject, JuliaVersion, Result};
use serde::Serialize;

/// Printed on its own line before a query result so that anything else a
/// package writes to stdout can be skipped.
pub const RESULT_MARKER: &str = "__JULIAENV_RESULT__";

/// A package to add to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    pub name: String,
    /// Pkg version specifier, e.g. "0.4" or "0.22.1".
    pub version: Option<String>,
}

impl PackageSpec {
    pub fn new(name: &str) -> Result<Self> {
        if !is_valid_package_name(name) {
            return Err(Error::InvalidPackage(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            version: None,
        })
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// `Name` or `Name@version`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().split_once('@') {
            Some((name, version)) if !version.trim().is_empty() => {
                Ok(Self::new(name.trim())?.with_version(version.trim()))
            }
            Some(_) => Err(Error::InvalidPackage(s.to_string())),
            None => Self::new(s.trim()),
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Packages the symbolic-regression backend needs in its project.
pub fn default_packages() -> Vec<PackageSpec> {
    vec![
        PackageSpec {
            name: "SymbolicRegression".to_string(),
            version: None,
        },
        PackageSpec {
            name: "ClusterManagers".to_string(),
            version: Some("0.4".to_string()),
        },
    ]
}

/// Julia identifiers as Pkg accepts them for package names.
pub fn is_valid_package_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Side-effecting call; produces no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `using Name`
    Using(String),
    /// `Pkg.activate(...)`
    Activate { project: JuliaProject, quiet: bool },
    /// `Pkg.add([...])`
    AddPackages {
        packages: Vec<PackageSpec>,
        quiet: bool,
    },
    Instantiate { quiet: bool },
    Precompile { quiet: bool },
}

impl Statement {
    fn needs_pkg(&self) -> bool {
        !matches!(self, Self::Using(_))
    }

    fn render(&self) -> String {
        match self {
            Self::Using(name) => format!("using {name}"),
            Self::Activate { project, quiet } => {
                let (mut args, mut kwargs) = (Vec::new(), Vec::new());
                match project {
                    JuliaProject::Default => {}
                    JuliaProject::Shared(name) => {
                        args.push(julia_string(name));
                        kwargs.push("shared=true".to_string());
                    }
                    JuliaProject::Path(p) => args.push(julia_string(&p.to_string_lossy())),
                }
                if *quiet {
                    kwargs.push("io=devnull".to_string());
                }
                call_with("Pkg.activate", &args, &kwargs)
            }
            Self::AddPackages { packages, quiet } => {
                let specs: Vec<String> = packages
                    .iter()
                    .map(|p| match &p.version {
                        Some(v) => format!(
                            "Pkg.PackageSpec(name={}, version={})",
                            julia_string(&p.name),
                            julia_string(v)
                        ),
                        None => format!("Pkg.PackageSpec(name={})", julia_string(&p.name)),
                    })
                    .collect();
                call_with(
                    "Pkg.add",
                    &[format!("[{}]", specs.join(", "))],
                    &io_kwarg(*quiet),
                )
            }
            Self::Instantiate { quiet } => call_with("Pkg.instantiate", &[], &io_kwarg(*quiet)),
            Self::Precompile { quiet } => call_with("Pkg.precompile", &[], &io_kwarg(*quiet)),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Call that returns one string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `string(VERSION)`
    Version,
    /// Path of the active `Project.toml`, empty when none is active.
    ActiveProject,
    /// `Pkg.envdir(depot)`
    EnvDir(PathBuf),
}

impl Query {
    fn needs_pkg(&self) -> bool {
        matches!(self, Self::EnvDir(_))
    }

    fn expr(&self) -> String {
        match self {
            Self::Version => "string(VERSION)".to_string(),
            Self::ActiveProject => "something(Base.active_project(), \"\")".to_string(),
            Self::EnvDir(depot) => format!("Pkg.envdir({})", julia_string(&depot.to_string_lossy())),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr())
    }
}

/// One run of the runtime: the environment it starts in plus what it executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Becomes `JULIA_DEPOT_PATH`; empty means unset.
    pub depot: DepotPath,
    pub project: JuliaProject,
    /// Becomes `JULIA_PROJECT`; `None` means unset.
    pub julia_project: Option<String>,
    pub statements: Vec<Statement>,
    pub query: Option<Query>,
}

impl Invocation {
    /// Start-up probe: default project, only asks for the version.
    pub fn probe(depot: DepotPath) -> Self {
        Self {
            depot,
            project: JuliaProject::Default,
            julia_project: None,
            statements: Vec::new(),
            query: Some(Query::Version),
        }
    }

    pub fn new(depot: DepotPath, project: JuliaProject, version: &JuliaVersion) -> Self {
        let julia_project = project.julia_project_env(&depot, version);
        Self {
            depot,
            project,
            julia_project,
            statements: Vec::new(),
            query: None,
        }
    }

    pub fn with_statements(mut self, statements: impl IntoIterator<Item = Statement>) -> Self {
        self.statements.extend(statements);
        self
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    /// Short human description for logs and errors.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self.statements.iter().map(Statement::to_string).collect();
        if let Some(q) = &self.query {
            parts.push(q.to_string());
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Julia source for `julia -e`.
pub fn render_program(invocation: &Invocation) -> String {
    let mut lines = Vec::new();
    let needs_pkg = invocation.statements.iter().any(Statement::needs_pkg)
        || invocation.query.as_ref().map_or(false, Query::needs_pkg);
    if needs_pkg {
        lines.push("import Pkg".to_string());
    }
    lines.extend(invocation.statements.iter().map(Statement::render));
    if let Some(query) = &invocation.query {
        lines.push(format!(
            "let r = {}; print(\"\\n{}\\n\", r) end",
            query.expr(),
            RESULT_MARKER
        ));
    }
    lines.join("\n")
}

/// Text after the last result marker, without the trailing newline.
pub fn extract_result(stdout: &str) -> Option<String> {
    let needle = format!("{RESULT_MARKER}\n");
    let idx = stdout.rfind(&needle)?;
    let rest = &stdout[idx + needle.len()..];
    Some(rest.trim_end_matches(['\r', '\n']).to_string())
}

/// Double-quoted Julia string literal.
pub fn julia_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn io_kwarg(quiet: bool) -> Vec<String> {
    if quiet {
        vec!["io=devnull".to_string()]
    } else {
        Vec::new()
    }
}

fn call_with(func: &str, args: &[String], kwargs: &[String]) -> String {
    match (args.is_empty(), kwargs.is_empty()) {
        (_, true) => format!("{func}({})", args.join(", ")),
        (true, false) => format!("{func}(; {})", kwargs.join(", ")),
        (false, false) => format!("{func}({}; {})", args.join(", "), kwargs.join(", ")),
    }
}
