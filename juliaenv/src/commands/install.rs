//! `juliaenv install PROJECT`

use std::path::Path;

use anyhow::{Context, Result};
use juliaenv_runtime::{InstallOptions, InstalledProject, JuliaRuntime, PackageSpec};

use super::{parse_project, resolve_depot};

pub fn cmd_install(
    runtime: &JuliaRuntime,
    project: &str,
    depot_dir: Option<&Path>,
    packages: &[String],
    no_precompile: bool,
) -> Result<InstalledProject> {
    let project = parse_project(project)?;
    let depot = resolve_depot(depot_dir)?;
    let packages = packages
        .iter()
        .map(|p| PackageSpec::parse(p))
        .collect::<Result<Vec<_>, _>>()
        .context("Parse --package")?;

    let mut options = InstallOptions::from_config(runtime.config()).with_packages(packages);
    if no_precompile {
        options.precompile = false;
    }

    runtime
        .install_project(&depot, &project, &options)
        .with_context(|| format!("Install {project}"))
}

pub fn render_installed(installed: &InstalledProject) -> String {
    let verb = if installed.freshly_installed {
        "Installed"
    } else {
        "Already installed"
    };
    format!(
        "✓ {} {} at {}\n  packages: {}",
        verb,
        installed.project,
        installed.dir.display(),
        installed.packages.join(", ")
    )
}
