//! `juliaenv depot show|compose`

use std::path::Path;

use anyhow::{bail, Result};
use juliaenv_core::config::{self, env_keys::julia::JULIA_DEPOT_PATH};
use juliaenv_core::depot::default_depot;
use juliaenv_core::{compose_value, DepotPath};
use serde_json::json;

/// `juliaenv depot show`
pub fn cmd_show(json: bool) -> Result<String> {
    let depot = DepotPath::from_env();
    let (entries, from_default) = if depot.is_empty() {
        (default_depot().into_iter().collect::<Vec<_>>(), true)
    } else {
        (depot.entries().to_vec(), false)
    };

    if json {
        let value = json!({
            "entries": entries,
            "default": from_default,
            "append_defaults": depot.appends_defaults(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut out = String::new();
    if from_default {
        out.push_str("JULIA_DEPOT_PATH is not set; Julia uses its default depot:\n");
    }
    for (i, entry) in entries.iter().enumerate() {
        let marker = if entry.is_dir() { "" } else { "  (missing)" };
        out.push_str(&format!("{:>2}. {}{}\n", i + 1, entry.display(), marker));
    }
    if depot.appends_defaults() {
        out.push_str("    (followed by Julia's default depots)\n");
    }
    Ok(out.trim_end().to_string())
}

/// `juliaenv depot compose DIR`: the value JULIA_DEPOT_PATH would have with DIR first.
pub fn cmd_compose(dir: &Path) -> Result<String> {
    if !dir.is_dir() {
        bail!("{} is not an existing directory", dir.display());
    }
    let previous = config::env_raw(JULIA_DEPOT_PATH);
    let composed = compose_value(dir, previous.as_deref())?;
    Ok(composed.to_string_lossy().into_owned())
}
