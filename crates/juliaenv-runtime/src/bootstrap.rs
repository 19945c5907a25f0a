//! End-to-end shared-environment check.
//!
//! Overrides `JULIA_DEPOT_PATH` with a fresh depot, installs a named project
//! there, activates it in a new session and verifies it sits in the depot's
//! shared environments. The override is a guard, so the variable is restored
//! on every exit path, including errors.

use std::path::{Path, PathBuf};

use juliaenv_core::{compose_path_variable, JuliaProject, Result};
use serde::Serialize;

use crate::env::builder::{self, InstallOptions, InstalledProject};
use crate::info_log;
use crate::session::JuliaRuntime;
use crate::verify::{shared_environment_report, SharedEnvReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    NoDepotOverride,
    DepotOverrideSet,
    InterpreterInitializedDefault,
    ProjectInstalled,
    InterpreterInitializedNamed,
    Verified,
    EnvironmentRestored,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub depot_dir: PathBuf,
    pub installed: InstalledProject,
    pub shared_env: SharedEnvReport,
    /// Entry the session popped from its depot list before restoring.
    pub popped_depot: Option<PathBuf>,
    pub states: Vec<LifecycleState>,
}

/// Run the full lifecycle with `depot_dir` prepended to `JULIA_DEPOT_PATH`.
///
/// A mismatch is returned as [`juliaenv_core::Error::EnvironmentMismatch`].
pub fn run_shared_env_scenario(
    runtime: &JuliaRuntime,
    depot_dir: &Path,
    project: &JuliaProject,
    options: &InstallOptions,
) -> Result<ScenarioReport> {
    let mut states = vec![LifecycleState::NoDepotOverride];

    let guard = compose_path_variable(depot_dir)?;
    advance(&mut states, LifecycleState::DepotOverrideSet);
    let depot = guard.depot().clone();

    let default_session = runtime.initialize_interpreter(depot.clone(), None)?;
    advance(&mut states, LifecycleState::InterpreterInitializedDefault);

    let installed = builder::install_project(&default_session, project, options)?;
    advance(&mut states, LifecycleState::ProjectInstalled);

    let mut session = runtime.initialize_interpreter(depot, Some(project.clone()))?;
    for package in &options.packages {
        session.load_package(&package.name)?;
    }
    session.load_package("Pkg")?;
    advance(&mut states, LifecycleState::InterpreterInitializedNamed);

    let shared_env = shared_environment_report(&session)?.into_result()?;
    advance(&mut states, LifecycleState::Verified);

    let popped_depot = session.pop_depot_path();
    guard.restore();
    advance(&mut states, LifecycleState::EnvironmentRestored);

    info_log!(
        "[INFO] {} verified in {}",
        project,
        shared_env.env_dir.display()
    );
    Ok(ScenarioReport {
        depot_dir: depot_dir.to_path_buf(),
        installed,
        shared_env,
        popped_depot,
        states,
    })
}

fn advance(states: &mut Vec<LifecycleState>, next: LifecycleState) {
    tracing::debug!(from = ?states.last(), to = ?next, "bootstrap transition");
    states.push(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeJulia;
    use juliaenv_core::config::env_keys::julia::JULIA_DEPOT_PATH;
    use juliaenv_core::config::{remove_env_var, set_env_var, JuliaConfig};
    use juliaenv_core::Error;
    use serial_test::serial;
    use std::sync::Arc;

    fn runtime(fake: FakeJulia) -> JuliaRuntime {
        JuliaRuntime::new(Arc::new(fake), JuliaConfig::default())
    }

    #[test]
    #[serial(process_env)]
    fn test_scenario_from_unset_depot_path() {
        remove_env_var(JULIA_DEPOT_PATH);
        let tmp = tempfile::tempdir().unwrap();
        let project = JuliaProject::parse("@pysr_test_env").unwrap();
        let report = run_shared_env_scenario(
            &runtime(FakeJulia::new()),
            tmp.path(),
            &project,
            &InstallOptions::default(),
        )
        .unwrap();

        assert!(report.shared_env.matches);
        assert_eq!(report.popped_depot, Some(tmp.path().to_path_buf()));
        assert_eq!(
            report.states,
            vec![
                LifecycleState::NoDepotOverride,
                LifecycleState::DepotOverrideSet,
                LifecycleState::InterpreterInitializedDefault,
                LifecycleState::ProjectInstalled,
                LifecycleState::InterpreterInitializedNamed,
                LifecycleState::Verified,
                LifecycleState::EnvironmentRestored,
            ]
        );
        assert!(std::env::var_os(JULIA_DEPOT_PATH).is_none());
    }

    #[test]
    #[serial(process_env)]
    fn test_scenario_keeps_existing_depots_after_new_one() {
        let old_a = tempfile::tempdir().unwrap();
        let old = std::env::join_paths([old_a.path()]).unwrap();
        set_env_var(JULIA_DEPOT_PATH, &old);
        let tmp = tempfile::tempdir().unwrap();
        let report = run_shared_env_scenario(
            &runtime(FakeJulia::new()),
            tmp.path(),
            &JuliaProject::Shared("pysr_test_env".into()),
            &InstallOptions::default(),
        )
        .unwrap();
        assert_eq!(report.shared_env.depot_entry, tmp.path());
        assert_eq!(report.popped_depot, Some(old_a.path().to_path_buf()));
        assert_eq!(std::env::var_os(JULIA_DEPOT_PATH).unwrap(), old);
        remove_env_var(JULIA_DEPOT_PATH);
    }

    #[test]
    #[serial(process_env)]
    fn test_failed_install_still_restores_environment() {
        remove_env_var(JULIA_DEPOT_PATH);
        let tmp = tempfile::tempdir().unwrap();
        let err = run_shared_env_scenario(
            &runtime(FakeJulia::new().failing_install("Unsatisfiable requirements")),
            tmp.path(),
            &JuliaProject::Shared("pysr_test_env".into()),
            &InstallOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Installation { .. }));
        assert!(std::env::var_os(JULIA_DEPOT_PATH).is_none());
    }

    #[test]
    #[serial(process_env)]
    fn test_unavailable_julia_restores_environment() {
        let prior = tempfile::tempdir().unwrap();
        set_env_var(JULIA_DEPOT_PATH, prior.path());
        let tmp = tempfile::tempdir().unwrap();
        let err = run_shared_env_scenario(
            &runtime(FakeJulia::new().unavailable()),
            tmp.path(),
            &JuliaProject::Shared("pysr_test_env".into()),
            &InstallOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Initialization { .. }));
        assert_eq!(
            std::env::var_os(JULIA_DEPOT_PATH).unwrap(),
            prior.path().as_os_str()
        );
        remove_env_var(JULIA_DEPOT_PATH);
    }
}
