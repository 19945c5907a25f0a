//! Check that a session's active project is a real shared environment of its
//! first depot, not a project that happens to live somewhere else.

use std::path::PathBuf;

use juliaenv_core::{Error, JuliaProject, Result};
use serde::Serialize;

use crate::session::InterpreterSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedEnvReport {
    pub project: JuliaProject,
    /// Depot entry the environment directory was computed for.
    pub depot_entry: PathBuf,
    /// Parent of the active project's directory, as Julia reports it.
    pub project_parent: PathBuf,
    /// `Pkg.envdir(depot_entry)`
    pub env_dir: PathBuf,
    pub matches: bool,
}

impl SharedEnvReport {
    /// Turn a mismatch into [`Error::EnvironmentMismatch`].
    pub fn into_result(self) -> Result<Self> {
        if self.matches {
            Ok(self)
        } else {
            Err(Error::EnvironmentMismatch {
                project_parent: self.project_parent,
                env_dir: self.env_dir,
            })
        }
    }
}

/// Query both directories and compare them.
pub fn shared_environment_report(session: &InterpreterSession) -> Result<SharedEnvReport> {
    let depot_entry = session
        .depot_path()
        .effective_primary()
        .ok_or_else(|| Error::DepotPath("session has no depot entry".to_string()))?;
    let project_parent = session.active_project_parent()?;
    let env_dir = session.shared_env_dir(&depot_entry)?;
    let matches = project_parent == env_dir;
    if matches {
        tracing::debug!(env_dir = %env_dir.display(), "shared environment verified");
    } else {
        tracing::warn!(
            project_parent = %project_parent.display(),
            env_dir = %env_dir.display(),
            "active project is not in the depot's shared environments"
        );
    }
    Ok(SharedEnvReport {
        project: session.project().clone(),
        depot_entry,
        project_parent,
        env_dir,
        matches,
    })
}

/// `true` iff the active project's parent directory is `Pkg.envdir` of the
/// session's first depot entry.
pub fn verify_shared_environment(session: &InterpreterSession) -> Result<bool> {
    Ok(shared_environment_report(session)?.matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::builder::InstallOptions;
    use crate::session::JuliaRuntime;
    use crate::testing::FakeJulia;
    use juliaenv_core::config::JuliaConfig;
    use juliaenv_core::DepotPath;
    use std::sync::Arc;

    fn runtime() -> JuliaRuntime {
        JuliaRuntime::new(Arc::new(FakeJulia::new()), JuliaConfig::default())
    }

    #[test]
    fn test_installed_shared_env_verifies() {
        let runtime = runtime();
        let tmp = tempfile::tempdir().unwrap();
        let depot = DepotPath::new(vec![tmp.path().to_path_buf()]);
        let project = JuliaProject::Shared("pysr_test_env".into());
        runtime
            .install_project(&depot, &project, &InstallOptions::default())
            .unwrap();
        let session = runtime
            .initialize_interpreter(depot, Some(project.clone()))
            .unwrap();
        assert!(verify_shared_environment(&session).unwrap());
        let report = shared_environment_report(&session).unwrap();
        assert_eq!(report.project, project);
        assert_eq!(report.env_dir, tmp.path().join("environments"));
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_path_project_outside_depot_does_not_verify() {
        let runtime = runtime();
        let depot_dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let depot = DepotPath::new(vec![depot_dir.path().to_path_buf()]);
        let project = JuliaProject::Path(elsewhere.path().join("proj"));
        let session = runtime
            .initialize_interpreter(depot, Some(project))
            .unwrap();
        assert!(!verify_shared_environment(&session).unwrap());
        let err = shared_environment_report(&session)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(matches!(err, Error::EnvironmentMismatch { .. }));
        assert!(!err.is_infrastructure());
    }

    #[test]
    fn test_shared_env_in_second_depot_does_not_verify() {
        let runtime = runtime();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let project = JuliaProject::Shared("env".into());
        runtime
            .install_project(
                &DepotPath::new(vec![second.path().to_path_buf()]),
                &project,
                &InstallOptions::default(),
            )
            .unwrap();
        let depot = DepotPath::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        let session = runtime
            .initialize_interpreter(depot, Some(project))
            .unwrap();
        assert!(!verify_shared_environment(&session).unwrap());
    }
}
