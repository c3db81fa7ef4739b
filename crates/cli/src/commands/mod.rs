//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations. Every
//! command parses a `profile/container/key` path, opens the profile's
//! location through [`crate::store`], and talks to the backend through
//! the storage traits only.

use clap::{Parser, Subcommand};

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod cat;
mod completions;
mod get;
mod ls;
mod mb;
mod profile;
mod put;
mod rb;
mod rm;
mod stat;

/// depot - backend-agnostic object storage client
///
/// A command-line interface for object storage behind a common contract.
/// The same commands work against a local directory tree and any
/// S3-compatible service, selected by profile.
#[derive(Parser, Debug)]
#[command(name = "depot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage storage profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// List containers and items
    Ls(ls::LsArgs),

    /// Create a container
    Mb(mb::MbArgs),

    /// Remove a container
    Rb(rb::RbArgs),

    /// Write item contents to stdout
    Cat(cat::CatArgs),

    /// Show item metadata
    Stat(stat::StatArgs),

    /// Upload a local file as an item
    Put(put::PutArgs),

    /// Download an item to a local file
    Get(get::GetArgs),

    /// Remove items
    Rm(rm::RmArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Profile(cmd) => profile::execute(cmd, cli.json).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Mb(args) => mb::execute(args, output_config).await,
        Commands::Rb(args) => rb::execute(args, output_config).await,
        Commands::Cat(args) => cat::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Get(args) => get::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}
