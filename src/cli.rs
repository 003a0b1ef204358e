//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// A make-style build orchestrator that rebuilds only what is stale.
#[derive(Debug, Parser)]
#[command(name = "stagemake", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the manifest file to use.
    #[arg(short, long, value_name = "FILE", default_value = "stagemake.json")]
    pub file: PathBuf,

    /// Change to this directory before doing anything.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Print long form descriptions of each step.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print debug information, including the stage tree and build sequence.
    #[arg(short, long)]
    pub debug: bool,

    /// Show a progress spinner while recipes run.
    #[arg(long, value_name = "BOOL")]
    pub progress: Option<bool>,

    /// Optional subcommand to execute; defaults to `build` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `build` as the default command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Build(GoalArgs { goal: None }));
        }
        self
    }
}

/// Arguments naming the goal to work on.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct GoalArgs {
    /// Target to build instead of the manifest's default goal.
    pub goal: Option<String>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Build the goal and every stale prerequisite (the default).
    Build(GoalArgs),

    /// Print the stage tree and build sequence without running any recipe.
    Plan(GoalArgs),
}
