use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The Julia runtime could not be started or is unusable.
    #[error("failed to initialize Julia: {reason}")]
    Initialization { reason: String },

    #[error("failed to install project {project}: {reason}")]
    Installation { project: String, reason: String },

    /// A query against a running session failed.
    #[error("Julia evaluation failed ({call}): {reason}")]
    Evaluation { call: String, reason: String },

    #[error(
        "active project lives in {} but the depot's shared environments are in {}",
        project_parent.display(),
        env_dir.display()
    )]
    EnvironmentMismatch {
        project_parent: PathBuf,
        env_dir: PathBuf,
    },

    #[error("invalid project '{0}'")]
    InvalidProject(String),

    #[error("invalid package name '{0}'")]
    InvalidPackage(String),

    #[error("depot path: {0}")]
    DepotPath(String),

    #[error("malformed manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn initialization(reason: impl Into<String>) -> Self {
        Self::Initialization {
            reason: reason.into(),
        }
    }

    pub fn installation(project: impl ToString, reason: impl Into<String>) -> Self {
        Self::Installation {
            project: project.to_string(),
            reason: reason.into(),
        }
    }

    /// Infrastructure failures (runtime or package manager), as opposed to
    /// a mismatch found by verification.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Initialization { .. } | Self::Installation { .. } | Self::Evaluation { .. }
        )
    }
}
