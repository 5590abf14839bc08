//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::session::Role;

/// Signup command arguments.
#[derive(Debug, Args)]
pub struct SignupCommand {
    /// Which kind of account to create
    #[arg(value_enum)]
    pub role: RoleArg,

    /// New username (no spaces)
    pub username: String,

    /// New password (no spaces, stored as plain text)
    pub password: String,
}

/// Credentials for role-gated commands.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username to log in as
    #[arg(short, long)]
    pub username: String,

    /// Password for the account
    #[arg(short, long)]
    pub password: String,
}

/// Admin command arguments.
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin credentials
    #[command(flatten)]
    pub login: LoginArgs,

    /// The admin action to perform
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Actions available to admins.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Add a car to the inventory
    Add {
        /// Model name (the lookup key)
        model: String,
        /// Body type, e.g. Sedan
        #[arg(value_name = "TYPE")]
        kind: String,
        /// Model year
        year: i32,
        /// Rental rate
        rate: f64,
    },

    /// Remove cars by model
    Remove {
        /// Model to remove (prefix match unless configured otherwise)
        model: String,
    },

    /// List the inventory
    Cars {
        /// Only show available cars
        #[arg(short, long)]
        available: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the rental log
    Waiting {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the return log
    Returned {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// User command arguments.
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User credentials
    #[command(flatten)]
    pub login: LoginArgs,

    /// The user action to perform
    #[command(subcommand)]
    pub command: UserCommand,
}

/// Actions available to users.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Rent a car
    Rent {
        /// Exact model to rent
        model: String,
    },

    /// Return a rented car
    Return {
        /// Exact model to return
        model: String,
    },

    /// Show every car currently rented
    Bookings {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Role argument for signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Inventory manager
    Admin,
    /// Renter
    User,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Self::Admin,
            RoleArg::User => Self::User,
        }
    }
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One stored line per record
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
