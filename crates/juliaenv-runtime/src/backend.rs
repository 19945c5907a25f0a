//! JuliaBackend trait: the seam between sessions and whatever actually runs Julia.
//!
//! [`crate::process::ProcessBackend`] launches a `julia` executable; the
//! `testing` module provides an in-memory stand-in.

use std::io;

use thiserror::Error;

use crate::call::Invocation;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("could not launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("julia exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("julia produced no result")]
    MissingResult,

    #[error(transparent)]
    Core(#[from] juliaenv_core::Error),
}

/// Runs one [`Invocation`] to completion.
pub trait JuliaBackend: Send + Sync {
    /// Execute the statements, then the query if there is one.
    /// Returns the query result, or `None` when the invocation had no query.
    fn run(&self, invocation: &Invocation) -> Result<Option<String>, BackendError>;

    /// Human-readable name, e.g. the executable path.
    fn describe(&self) -> String;
}

/// Run an invocation that must produce a query result.
pub fn run_query(backend: &dyn JuliaBackend, invocation: &Invocation) -> Result<String, BackendError> {
    backend.run(invocation)?.ok_or(BackendError::MissingResult)
}
