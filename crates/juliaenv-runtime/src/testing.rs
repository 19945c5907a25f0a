//! In-memory Julia for tests.
//!
//! [`FakeJulia`] interprets typed invocations against the real filesystem:
//! shared environments are created under `<depot>/environments/<name>` with a
//! `Project.toml`/`Manifest.toml`, exactly where Pkg would put them, so install
//! and verification logic can be exercised without a Julia toolchain.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use juliaenv_core::depot::{default_depot, environments_dir};
use juliaenv_core::{DepotPath, JuliaProject, JuliaVersion};

use crate::backend::{BackendError, JuliaBackend};
use crate::call::{Invocation, Query, Statement};
use crate::env::manifest::{ProjectFile, MANIFEST_FILE, PROJECT_FILE};

#[derive(Debug)]
pub struct FakeJulia {
    version: JuliaVersion,
    unavailable: bool,
    install_failure: Option<String>,
    calls: Mutex<Vec<Invocation>>,
}

impl Default for FakeJulia {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeJulia {
    pub fn new() -> Self {
        Self::with_version(JuliaVersion::new(1, 10, 4))
    }

    pub fn with_version(version: JuliaVersion) -> Self {
        Self {
            version,
            unavailable: false,
            install_failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every run fails as if the executable were missing.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// `Pkg.add` fails with `reason`.
    pub fn failing_install(mut self, reason: &str) -> Self {
        self.install_failure = Some(reason.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn run_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Where Pkg would put `project` given `depot`: an existing shared env in
    /// any depot wins, otherwise the first depot.
    fn project_dir(&self, project: &JuliaProject, depot: &DepotPath) -> Result<PathBuf, BackendError> {
        let primary = || {
            depot
                .primary()
                .map(Path::to_path_buf)
                .or_else(default_depot)
                .ok_or_else(|| failed("no depot available"))
        };
        match project {
            JuliaProject::Path(p) => Ok(p.clone()),
            JuliaProject::Shared(name) => {
                if let Some(existing) = depot
                    .entries()
                    .iter()
                    .map(|d| environments_dir(d).join(name))
                    .find(|p| p.is_dir())
                {
                    return Ok(existing);
                }
                Ok(environments_dir(&primary()?).join(name))
            }
            JuliaProject::Default => {
                Ok(environments_dir(&primary()?).join(self.version.default_env_name()))
            }
        }
    }
}

impl JuliaBackend for FakeJulia {
    fn run(&self, invocation: &Invocation) -> Result<Option<String>, BackendError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(invocation.clone());
        if self.unavailable {
            return Err(BackendError::Spawn {
                program: "julia".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            });
        }

        let mut current = invocation.project.clone();
        for statement in &invocation.statements {
            match statement {
                Statement::Using(name) => {
                    if name == "Pkg" {
                        continue;
                    }
                    let dir = self.project_dir(&current, &invocation.depot)?;
                    let found = ProjectFile::read(&dir)?
                        .map_or(false, |p| p.deps.contains_key(name));
                    if !found {
                        return Err(failed(&format!(
                            "ERROR: ArgumentError: Package {name} not found in current path."
                        )));
                    }
                }
                Statement::Activate { project, .. } => current = project.clone(),
                Statement::AddPackages { packages, .. } => {
                    if let Some(reason) = &self.install_failure {
                        return Err(failed(&format!("ERROR: {reason}")));
                    }
                    let dir = self.project_dir(&current, &invocation.depot)?;
                    let mut file = ProjectFile::read(&dir)?.unwrap_or_default();
                    for p in packages {
                        file.deps
                            .entry(p.name.clone())
                            .or_insert_with(|| fake_uuid(&p.name));
                    }
                    file.write(&dir)?;
                }
                Statement::Instantiate { .. } => {
                    let dir = self.project_dir(&current, &invocation.depot)?;
                    if ProjectFile::read(&dir)?.is_none() {
                        ProjectFile::default().write(&dir)?;
                    }
                    std::fs::write(dir.join(MANIFEST_FILE), "# fake manifest\n")
                        .map_err(juliaenv_core::Error::from)?;
                }
                Statement::Precompile { .. } => {}
            }
        }

        let result = match &invocation.query {
            None => return Ok(None),
            Some(Query::Version) => self.version.to_string(),
            Some(Query::ActiveProject) => self
                .project_dir(&current, &invocation.depot)?
                .join(PROJECT_FILE)
                .display()
                .to_string(),
            Some(Query::EnvDir(depot)) => environments_dir(depot).display().to_string(),
        };
        Ok(Some(result))
    }

    fn describe(&self) -> String {
        format!("fake julia {}", self.version)
    }
}

fn failed(stderr: &str) -> BackendError {
    BackendError::Failed {
        status: "exit status: 1".to_string(),
        stderr: stderr.to_string(),
    }
}

fn fake_uuid(name: &str) -> String {
    let sum = name
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    format!("{sum:08x}-0000-4000-8000-000000000000")
}
