//! Shared environment management: list and remove `@name` environments.
//!
//! Shared environments live in `<first depot>/environments/` (`~/.julia/environments`
//! when JULIA_DEPOT_PATH is unset). Each subdirectory is one environment.

use anyhow::{bail, Context, Result};
use juliaenv_core::depot::environments_dir;
use juliaenv_core::JuliaProject;
use std::fs;
use std::path::{Path, PathBuf};

use super::resolve_depot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Has a `Project.toml`, i.e. Julia can activate it.
    pub has_project: bool,
}

fn environments_root(depot_dir: Option<&Path>) -> Result<PathBuf> {
    let depot = resolve_depot(depot_dir)?;
    let primary = depot
        .effective_primary()
        .context("No depot: JULIA_DEPOT_PATH is empty and no home directory")?;
    Ok(environments_dir(&primary))
}

/// Environments in the first depot, sorted by name.
pub fn list_environments(depot_dir: Option<&Path>) -> Result<(PathBuf, Vec<EnvEntry>)> {
    let root = environments_root(depot_dir)?;
    let mut entries = Vec::new();
    if let Ok(dir_entries) = fs::read_dir(&root) {
        for entry in dir_entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                entries.push(EnvEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    size: dir_size(&path),
                    has_project: path.join("Project.toml").exists(),
                    path,
                });
            }
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok((root, entries))
}

/// `juliaenv env list`
pub fn cmd_list(depot_dir: Option<&Path>) -> Result<String> {
    let (root, entries) = list_environments(depot_dir)?;
    if entries.is_empty() {
        return Ok(format!("No shared environments found at {}", root.display()));
    }
    let total: u64 = entries.iter().map(|e| e.size).sum();
    let mut out = format!("🗂  Shared environments ({}) in {}:\n\n", entries.len(), root.display());
    for e in &entries {
        let note = if e.has_project { "" } else { "  [no Project.toml]" };
        out.push_str(&format!("  • @{} ({}){}\n", e.name, format_size(e.size), note));
    }
    out.push_str(&format!(
        "\nTotal: {} ({} environments)",
        format_size(total),
        entries.len()
    ));
    Ok(out)
}

/// `juliaenv env remove NAME`. Returns whether anything was deleted.
pub fn cmd_remove(name: &str, depot_dir: Option<&Path>, dry_run: bool, force: bool) -> Result<bool> {
    let name = name.strip_prefix('@').unwrap_or(name);
    // Reuse project-name validation so "../x" can't escape the environments dir.
    let project = JuliaProject::shared(name).with_context(|| format!("Invalid environment name '{name}'"))?;
    let root = environments_root(depot_dir)?;
    let path = root.join(name);
    if !path.is_dir() {
        bail!("No shared environment {} in {}", project, root.display());
    }

    let size = dir_size(&path);
    eprintln!("  • {} ({}) at {}", project, format_size(size), path.display());
    if dry_run {
        eprintln!("(Dry run, nothing removed. Remove --dry-run to delete.)");
        return Ok(false);
    }

    if !force {
        eprint!("\nRemove {}? [y/N] ", project);
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            eprintln!("Cancelled.");
            return Ok(false);
        }
    }

    fs::remove_dir_all(&path).with_context(|| format!("Remove {}", path.display()))?;
    tracing::info!(env = %project, freed = size, "removed shared environment");
    eprintln!("✓ Removed {}, freed {}", project, format_size(size));
    Ok(true)
}

/// Compute total size of a directory recursively.
fn dir_size(path: &Path) -> u64 {
    let mut total: u64 = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let p = entry.path();
            if p.is_dir() {
                total += dir_size(&p);
            } else if let Ok(meta) = p.metadata() {
                total += meta.len();
            }
        }
    }
    total
}

/// Format byte size to human-readable string.
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_dir_size_is_recursive() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("a/x"), [0u8; 10]).unwrap();
        fs::write(tmp.path().join("a/b/y"), [0u8; 5]).unwrap();
        assert_eq!(dir_size(tmp.path()), 15);
    }
}
