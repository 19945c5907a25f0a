//! Backend that runs each invocation in a fresh `julia` process.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use juliaenv_core::config::env_keys::julia::{JULIA_DEPOT_PATH, JULIA_PROJECT};
use juliaenv_core::config::JuliaConfig;
use juliaenv_core::{Error, Result};

use crate::backend::{BackendError, JuliaBackend};
use crate::call::{extract_result, render_program, Invocation};

/// How many trailing stderr lines are kept in errors.
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct ProcessBackend {
    program: PathBuf,
    threads: Option<String>,
    optimize: Option<u8>,
}

impl ProcessBackend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            threads: None,
            optimize: None,
        }
    }

    /// Resolve the executable from config or PATH.
    pub fn from_config(config: &JuliaConfig) -> Result<Self> {
        let program = match &config.julia_bin {
            Some(p) => {
                if !p.exists() && which::which(p).is_err() {
                    return Err(Error::initialization(format!(
                        "julia executable {} not found",
                        p.display()
                    )));
                }
                p.clone()
            }
            None => which::which("julia").map_err(|_| {
                Error::initialization("julia not found in PATH (set JULIAENV_JULIA_BIN)")
            })?,
        };
        Ok(Self {
            program,
            threads: config.threads.clone(),
            optimize: config.optimize,
        })
    }

    fn command(&self, invocation: &Invocation) -> Result<Command> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--startup-file=no").arg("--history-file=no");
        if let Some(threads) = &self.threads {
            cmd.arg(format!("--threads={threads}"));
        }
        if let Some(level) = self.optimize {
            cmd.arg(format!("-O{level}"));
        }
        cmd.arg("-e").arg(render_program(invocation));

        let depot = invocation.depot.to_os_string()?;
        if depot.is_empty() {
            cmd.env_remove(JULIA_DEPOT_PATH);
        } else {
            cmd.env(JULIA_DEPOT_PATH, depot);
        }
        match &invocation.julia_project {
            Some(project) => cmd.env(JULIA_PROJECT, project),
            None => cmd.env_remove(JULIA_PROJECT),
        };
        cmd.stdin(Stdio::null());
        Ok(cmd)
    }
}

impl JuliaBackend for ProcessBackend {
    fn run(&self, invocation: &Invocation) -> std::result::Result<Option<String>, BackendError> {
        let mut cmd = self.command(invocation)?;
        tracing::debug!(
            program = %self.program.display(),
            project = %invocation.project,
            call = %invocation.describe(),
            "running julia"
        );
        let out = cmd.output().map_err(|source| BackendError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;
        if !out.status.success() {
            return Err(BackendError::Failed {
                status: out.status.to_string(),
                stderr: stderr_tail(&String::from_utf8_lossy(&out.stderr)),
            });
        }
        if invocation.query.is_none() {
            return Ok(None);
        }
        let stdout = String::from_utf8_lossy(&out.stdout);
        extract_result(&stdout)
            .map(Some)
            .ok_or(BackendError::MissingResult)
    }

    fn describe(&self) -> String {
        self.program.display().to_string()
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
