//! juliaenv CLI library: argument parsing and command dispatch.

pub mod cli;
pub mod commands;
pub mod observability;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, DepotAction, EnvAction};
use juliaenv_core::config::JuliaConfig;
use juliaenv_runtime::JuliaRuntime;

/// Run the CLI: parse args and dispatch to command handlers.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing(cli.quiet);
    let config = JuliaConfig::from_env().with_quiet(cli.quiet);

    match cli.command {
        Commands::Depot { action } => match action {
            DepotAction::Show { json } => println!("{}", commands::depot::cmd_show(json)?),
            DepotAction::Compose { dir } => println!("{}", commands::depot::cmd_compose(&dir)?),
        },
        Commands::Install {
            project,
            depot,
            packages,
            no_precompile,
        } => {
            let runtime = JuliaRuntime::from_config(config)?;
            let installed = commands::install::cmd_install(
                &runtime,
                &project,
                depot.as_deref(),
                &packages,
                no_precompile,
            )?;
            println!("{}", commands::install::render_installed(&installed));
        }
        Commands::Verify {
            project,
            depot,
            json,
        } => {
            let runtime = JuliaRuntime::from_config(config)?;
            let report = commands::verify::cmd_verify(&runtime, &project, depot.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", commands::verify::render_report(&report));
            }
        }
        Commands::Check {
            project,
            depot,
            json,
        } => {
            let runtime = JuliaRuntime::from_config(config)?;
            let report = commands::verify::cmd_check(&runtime, &project, depot.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", commands::verify::render_scenario(&report));
            }
        }
        Commands::Env { action } => match action {
            EnvAction::List { depot } => println!("{}", commands::env::cmd_list(depot.as_deref())?),
            EnvAction::Remove {
                name,
                depot,
                dry_run,
                force,
            } => {
                commands::env::cmd_remove(&name, depot.as_deref(), dry_run, force)?;
            }
        },
    }
    Ok(())
}
