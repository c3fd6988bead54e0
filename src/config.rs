//! Command line and environment configuration

use crate::auth::UserRole;
use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "groundworks")]
#[command(about = "Backend API for the Groundworks site: staff auth, dashboard and profile admin")]
pub struct Cli {
    /// Path to the SQLite user database (relative paths resolve against the crate directory)
    #[arg(long, env = "AUTH_DB_PATH", default_value = "groundworks_users.db", global = true)]
    pub db_path: String,

    /// Address the server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000", global = true)]
    pub bind: SocketAddr,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Sign a token and print it to stdout
    IssueToken {
        /// Subject (user id)
        #[arg(long)]
        sub: String,

        /// employee or admin
        #[arg(long)]
        role: UserRole,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        name: Option<String>,

        /// Lifetime in hours
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(i64).range(1..))]
        hours: i64,
    },

    /// Add a user to the database
    AddUser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// employee or admin
        #[arg(long)]
        role: UserRole,
    },
}

impl Cli {
    /// The selected subcommand, defaulting to `serve`
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

/// Token lifetime for `issue-token --hours`
pub fn token_lifetime(hours: i64) -> Result<Duration> {
    Duration::try_hours(hours).context("--hours out of range")
}

/// Resolve a data file path. Relative paths are taken relative to the crate
/// directory, not the caller's cwd.
pub fn resolve_data_path(raw: &str) -> String {
    let p = PathBuf::from(raw.trim());
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(p)
        .to_string_lossy()
        .to_string()
}
