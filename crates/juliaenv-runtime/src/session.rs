//! Interpreter sessions bound to one project and one explicit depot list.
//!
//! Every call runs with the session's own [`DepotPath`], never the ambient
//! `JULIA_DEPOT_PATH`, so popping an entry here only affects this session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use juliaenv_core::config::JuliaConfig;
use juliaenv_core::version::MIN_SUPPORTED;
use juliaenv_core::{DepotPath, Error, JuliaProject, JuliaVersion, Result};

use crate::backend::{run_query, BackendError, JuliaBackend};
use crate::call::{is_valid_package_name, Invocation, Query, Statement};
use crate::env::builder::{self, InstallOptions, InstalledProject};
use crate::info_log;
use crate::process::ProcessBackend;

/// Entry point: knows how to reach Julia and how to launch it.
#[derive(Clone)]
pub struct JuliaRuntime {
    backend: Arc<dyn JuliaBackend>,
    config: JuliaConfig,
}

impl std::fmt::Debug for JuliaRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JuliaRuntime")
            .field("backend", &self.backend.describe())
            .field("config", &self.config)
            .finish()
    }
}

impl JuliaRuntime {
    pub fn new(backend: Arc<dyn JuliaBackend>, config: JuliaConfig) -> Self {
        Self { backend, config }
    }

    /// Runtime backed by a real `julia` executable.
    pub fn from_config(config: JuliaConfig) -> Result<Self> {
        let backend = ProcessBackend::from_config(&config)?;
        Ok(Self::new(Arc::new(backend), config))
    }

    pub fn config(&self) -> &JuliaConfig {
        &self.config
    }

    /// Start a session on `depot`, with `project` active (default project if `None`).
    ///
    /// Fails with [`Error::Initialization`] when Julia cannot be launched or is
    /// older than the supported minimum.
    pub fn initialize_interpreter(
        &self,
        depot: DepotPath,
        project: Option<JuliaProject>,
    ) -> Result<InterpreterSession> {
        let project = project.unwrap_or(JuliaProject::Default);
        let raw = run_query(self.backend.as_ref(), &Invocation::probe(depot.clone()))
            .map_err(|e| Error::initialization(e.to_string()))?;
        let version = JuliaVersion::parse(&raw)?;
        if !version.is_supported() {
            return Err(Error::initialization(format!(
                "Julia {version} is too old, need at least {MIN_SUPPORTED}"
            )));
        }
        info_log!(
            "[INFO] Julia {} ready (project {}, depot {})",
            version,
            project,
            depot
        );
        Ok(InterpreterSession {
            backend: Arc::clone(&self.backend),
            depot,
            project,
            version,
            loaded: Vec::new(),
        })
    }

    /// Install `project` into the first entry of `depot`.
    pub fn install_project(
        &self,
        depot: &DepotPath,
        project: &JuliaProject,
        options: &InstallOptions,
    ) -> Result<InstalledProject> {
        let session = self.initialize_interpreter(depot.clone(), None)?;
        builder::install_project(&session, project, options)
    }
}

pub struct InterpreterSession {
    backend: Arc<dyn JuliaBackend>,
    depot: DepotPath,
    project: JuliaProject,
    version: JuliaVersion,
    loaded: Vec<String>,
}

impl std::fmt::Debug for InterpreterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpreterSession")
            .field("depot", &self.depot)
            .field("project", &self.project)
            .field("version", &self.version)
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl InterpreterSession {
    pub fn version(&self) -> &JuliaVersion {
        &self.version
    }

    pub fn project(&self) -> &JuliaProject {
        &self.project
    }

    pub fn depot_path(&self) -> &DepotPath {
        &self.depot
    }

    /// Remove the most recently added (last) depot entry from this session.
    pub fn pop_depot_path(&mut self) -> Option<PathBuf> {
        let popped = self.depot.pop();
        if let Some(p) = &popped {
            tracing::debug!(depot = %p.display(), "popped depot entry");
        }
        popped
    }

    pub fn loaded_packages(&self) -> &[String] {
        &self.loaded
    }

    /// `using name`; later calls in this session load it too.
    pub fn load_package(&mut self, name: &str) -> Result<()> {
        if !is_valid_package_name(name) {
            return Err(Error::InvalidPackage(name.to_string()));
        }
        if self.loaded.iter().any(|p| p == name) {
            return Ok(());
        }
        let inv = self
            .invocation()
            .with_statements([Statement::Using(name.to_string())]);
        self.backend
            .run(&inv)
            .map_err(|e| evaluation_error(&format!("using {name}"), e))?;
        self.loaded.push(name.to_string());
        Ok(())
    }

    /// Path of the active `Project.toml`, `None` if Julia reports no active project.
    pub fn active_project(&self) -> Result<Option<PathBuf>> {
        let raw = self.query(Query::ActiveProject)?;
        Ok(if raw.is_empty() {
            None
        } else {
            Some(PathBuf::from(raw))
        })
    }

    /// Directory of the active project.
    pub fn active_project_dir(&self) -> Result<PathBuf> {
        let file = self.active_project()?.ok_or_else(|| Error::Evaluation {
            call: Query::ActiveProject.to_string(),
            reason: "no active project".to_string(),
        })?;
        Ok(parent_of(&file))
    }

    /// Directory containing the active project's directory.
    pub fn active_project_parent(&self) -> Result<PathBuf> {
        Ok(parent_of(&self.active_project_dir()?))
    }

    /// Julia's own answer for where shared environments of `depot_entry` live.
    pub fn shared_env_dir(&self, depot_entry: &Path) -> Result<PathBuf> {
        self.query(Query::EnvDir(depot_entry.to_path_buf()))
            .map(PathBuf::from)
    }

    /// Run statements in this session's environment (used by installation).
    pub(crate) fn run_statements(
        &self,
        statements: Vec<Statement>,
    ) -> std::result::Result<(), BackendError> {
        self.backend
            .run(&self.invocation().with_statements(statements))
            .map(|_| ())
    }

    fn query(&self, query: Query) -> Result<String> {
        let call = query.to_string();
        run_query(self.backend.as_ref(), &self.invocation().with_query(query))
            .map_err(|e| evaluation_error(&call, e))
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(self.depot.clone(), self.project.clone(), &self.version)
            .with_statements(self.loaded.iter().cloned().map(Statement::Using))
    }
}

fn evaluation_error(call: &str, e: BackendError) -> Error {
    Error::Evaluation {
        call: call.to_string(),
        reason: e.to_string(),
    }
}

fn parent_of(p: &Path) -> PathBuf {
    p.parent().map(Path::to_path_buf).unwrap_or_default()
}
