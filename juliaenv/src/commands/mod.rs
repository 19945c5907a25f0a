//! CLI command handlers.
//!
//! Each handler returns the text to print, so the dispatcher in `lib.rs` owns
//! stdout and tests can call handlers with an in-memory runtime.
//!
//!   depot  : show / compose JULIA_DEPOT_PATH
//!   install: install a project into a depot
//!   verify : shared-environment verification and the full `check` round trip
//!   env    : list / remove shared environments

pub mod depot;
pub mod env;
pub mod install;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use juliaenv_core::{DepotPath, JuliaProject};

/// Depot list for a command: the current JULIA_DEPOT_PATH, with `--depot` in front.
///
/// Builds an explicit value; the process environment is left untouched.
pub fn resolve_depot(depot_dir: Option<&Path>) -> Result<DepotPath> {
    let current = DepotPath::from_env();
    match depot_dir {
        None => Ok(current),
        Some(dir) => {
            if !dir.is_dir() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Create depot dir {}", dir.display()))?;
            }
            Ok(current.prepend(dir))
        }
    }
}

pub fn parse_project(s: &str) -> Result<JuliaProject> {
    JuliaProject::parse(s).with_context(|| format!("Parse project '{s}'"))
}
