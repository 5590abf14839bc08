//! Command-line interface for carrental.
//!
//! This module provides the CLI structure for the `carrent` binary and the
//! renderers for its listings.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AdminArgs, AdminCommand, ConfigCommand, LoginArgs, OutputFormat, RoleArg, SignupCommand,
    UserArgs, UserCommand,
};

use crate::logging::Verbosity;

/// carrent - Car rental inventory and bookings
///
/// Admins manage the fleet and review the rental logs; users rent and return
/// cars. Every invocation performs one action and logs in for it.
#[derive(Debug, Parser)]
#[command(name = "carrent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the record stores (overrides configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
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
    /// Create the record stores and merge the sample cars
    Init,

    /// Register an admin or user account
    Signup(SignupCommand),

    /// Log in as an admin and manage the inventory
    Admin(AdminArgs),

    /// Log in as a user and rent or return cars
    User(UserArgs),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
