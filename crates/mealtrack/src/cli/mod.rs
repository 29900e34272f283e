//! Command-line interface for mealtrack.
//!
//! This module provides the CLI structure and command handlers for the
//! `mealtrack` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ExportCommand, ListCommand, LocaleArg,
    MealFields, OutputFormat, ShowCommand, StatsCommand, SummaryCommand,
};

/// mealtrack - Keep a journal of your meals
///
/// Log meals, alcohol, exercise and how you felt, then review the totals or
/// export everything to a spreadsheet-ready CSV file.
#[derive(Debug, Parser)]
#[command(name = "mealtrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log a new meal
    Add(AddCommand),

    /// List logged meals, newest first
    List(ListCommand),

    /// Show one meal
    Show(ShowCommand),

    /// Change a logged meal
    Edit(EditCommand),

    /// Delete a logged meal
    Delete(DeleteCommand),

    /// Show totals over all meals
    Summary(SummaryCommand),

    /// Export all meals to CSV
    Export(ExportCommand),

    /// Show database statistics
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}
