//! Julia version parsing and the feature gates that depend on it.

use std::fmt;

use semver::Version;
use serde::Serialize;

use crate::error::{Error, Result};

/// Oldest Julia the toolkit supports.
pub const MIN_SUPPORTED: JuliaVersion = JuliaVersion::new(1, 6, 0);

/// Julia's `VERSION`. Pre-release tags (`rc1`, `DEV.123`) are kept for
/// display; the feature gates only look at major.minor.patch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JuliaVersion(Version);

impl JuliaVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Accepts `string(VERSION)` ("1.10.4", "1.11.0-rc1") and `julia --version`
    /// output ("julia version 1.10.4"). A missing patch component reads as 0.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        let text = raw.strip_prefix("julia version").unwrap_or(raw).trim();
        let text = text.strip_prefix('v').unwrap_or(text);
        let split = text.find(['-', '+']).unwrap_or(text.len());
        let (core, suffix) = text.split_at(split);
        let padded = match core.matches('.').count() {
            1 => format!("{core}.0{suffix}"),
            _ => text.to_string(),
        };
        Version::parse(&padded)
            .map(Self)
            .map_err(|e| Error::initialization(format!("unparsable Julia version '{raw}': {e}")))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Pre-release tag, `None` for releases.
    pub fn pre(&self) -> Option<&str> {
        (!self.0.pre.is_empty()).then(|| self.0.pre.as_str())
    }

    pub fn at_least(&self, major: u64, minor: u64, patch: u64) -> bool {
        self.release() >= Version::new(major, minor, patch)
    }

    pub fn is_supported(&self) -> bool {
        self.release() >= MIN_SUPPORTED.0
    }

    /// `JULIA_PROJECT=@name` resolves shared envs from 1.7 on.
    pub fn supports_shared_project_env(&self) -> bool {
        self.at_least(1, 7, 0)
    }

    /// Name of the default environment directory, e.g. `v1.10`.
    pub fn default_env_name(&self) -> String {
        format!("v{}.{}", self.0.major, self.0.minor)
    }

    fn release(&self) -> Version {
        Version::new(self.0.major, self.0.minor, self.0.patch)
    }
}

impl fmt::Display for JuliaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
