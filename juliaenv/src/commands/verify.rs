//! `juliaenv verify` and `juliaenv check`

use std::path::Path;

use anyhow::{Context, Result};
use juliaenv_runtime::{
    run_shared_env_scenario, shared_environment_report, InstallOptions, JuliaRuntime,
    ScenarioReport, SharedEnvReport,
};

use super::{parse_project, resolve_depot};

/// Activate `project` and compare its parent directory with `Pkg.envdir`.
/// A mismatch is an error.
pub fn cmd_verify(
    runtime: &JuliaRuntime,
    project: &str,
    depot_dir: Option<&Path>,
) -> Result<SharedEnvReport> {
    let project = parse_project(project)?;
    let depot = resolve_depot(depot_dir)?;
    let session = runtime
        .initialize_interpreter(depot, Some(project.clone()))
        .context("Start Julia")?;
    let report = shared_environment_report(&session)
        .with_context(|| format!("Inspect {project}"))?;
    Ok(report.into_result()?)
}

/// Full round trip in `depot_dir`, or in a temporary depot removed afterwards.
pub fn cmd_check(
    runtime: &JuliaRuntime,
    project: &str,
    depot_dir: Option<&Path>,
) -> Result<ScenarioReport> {
    let project = parse_project(project)?;
    let options = InstallOptions::from_config(runtime.config());
    let scratch;
    let dir = match depot_dir {
        Some(d) => {
            std::fs::create_dir_all(d)
                .with_context(|| format!("Create depot dir {}", d.display()))?;
            d
        }
        None => {
            scratch = tempfile::Builder::new()
                .prefix("juliaenv-depot-")
                .tempdir()
                .context("Create temporary depot")?;
            scratch.path()
        }
    };
    tracing::info!(depot = %dir.display(), project = %project, "starting shared environment check");
    let report = run_shared_env_scenario(runtime, dir, &project, &options)?;
    Ok(report)
}

pub fn render_report(report: &SharedEnvReport) -> String {
    format!(
        "✓ {} is a shared environment of {}\n  project parent: {}\n  Pkg.envdir:     {}",
        report.project,
        report.depot_entry.display(),
        report.project_parent.display(),
        report.env_dir.display()
    )
}

pub fn render_scenario(report: &ScenarioReport) -> String {
    let states: Vec<String> = report
        .states
        .iter()
        .map(|s| format!("{s:?}"))
        .collect();
    format!(
        "{}\n  installed: {}\n  lifecycle: {}",
        render_report(&report.shared_env),
        report.installed.dir.display(),
        states.join(" → ")
    )
}
