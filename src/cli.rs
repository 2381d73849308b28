//! # Command Line Interface
//!
//! Flags override the environment; subcommands cover one-off maintenance.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::errors::{Error, Result};

#[derive(Debug, Parser)]
#[command(name = "linkshelf")]
#[command(about = "Linkshelf session and link metadata API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// API bind address override
    #[arg(long, global = true)]
    pub bind: Option<String>,

    /// API port override
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Load environment variables from this file instead of `.env`
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Apply database migrations and exit
    Migrate,

    /// Delete expired sessions once and exit
    PurgeSessions,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    /// Load the env file. A missing default `.env` is fine; a missing explicit file is not.
    pub fn load_env_file(&self) -> Result<()> {
        match &self.env_file {
            Some(path) => dotenvy::from_path(path).map_err(|e| {
                Error::config_with_source(
                    format!("Failed to load env file {}", path.display()),
                    Box::new(e),
                )
            }),
            None => match dotenvy::dotenv() {
                Ok(_) => Ok(()),
                Err(e) if e.not_found() => Ok(()),
                Err(e) => Err(Error::config_with_source("Failed to load .env file", Box::new(e))),
            },
        }
    }

    /// Apply flag overrides on top of environment configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.api.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
    }
}
