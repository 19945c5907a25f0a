use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// juliaenv - prepare and verify shared Julia environments
#[derive(Parser, Debug)]
#[command(name = "juliaenv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Suppress informational output and Pkg progress
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect or compose JULIA_DEPOT_PATH
    Depot {
        #[command(subcommand)]
        action: DepotAction,
    },

    /// Install a project (e.g. @pysr_test_env) with the backend packages
    Install {
        /// `@name` for a shared environment, or a project directory
        #[arg(value_name = "PROJECT")]
        project: String,

        /// Depot to put in front of JULIA_DEPOT_PATH for this run
        #[arg(long, value_name = "DIR")]
        depot: Option<PathBuf>,

        /// Package to add instead of the defaults (repeatable)
        #[arg(long = "package", value_name = "NAME[@VERSION]")]
        packages: Vec<String>,

        /// Skip Pkg.precompile
        #[arg(long)]
        no_precompile: bool,
    },

    /// Check that a shared project lives in the depot's environments directory
    Verify {
        #[arg(value_name = "PROJECT")]
        project: String,

        #[arg(long, value_name = "DIR")]
        depot: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Full round trip in a scratch depot: override, install, activate, verify, restore
    Check {
        #[arg(value_name = "PROJECT", default_value = "@pysr_test_env")]
        project: String,

        /// Depot directory to use instead of a temporary one
        #[arg(long, value_name = "DIR")]
        depot: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Manage shared environments in a depot
    Env {
        #[command(subcommand)]
        action: EnvAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum DepotAction {
    /// List the effective depot entries
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Print JULIA_DEPOT_PATH with DIR prepended (for `export JULIA_DEPOT_PATH=...`)
    Compose {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum EnvAction {
    /// List shared environments with their size
    List {
        #[arg(long, value_name = "DIR")]
        depot: Option<PathBuf>,
    },

    /// Delete a shared environment
    Remove {
        /// Environment name, with or without the leading `@`
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long, value_name = "DIR")]
        depot: Option<PathBuf>,

        /// Show what would be removed without deleting
        #[arg(long)]
        dry_run: bool,

        /// Remove without confirmation
        #[arg(long, short)]
        force: bool,
    },
}
