use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "player_registry")]
#[command(about = "REST service for browsing and editing game player records")]
pub struct Cli {
    /// Address to bind, overrides APP_HOST
    #[arg(long)]
    pub host: Option<String>,
    /// Port to bind, overrides APP_PORT
    #[arg(long)]
    pub port: Option<u16>,
    /// JSON file with player forms to create at startup, overrides PLAYERS_SEED_FILE
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub max_players: Option<usize>,
    pub seed_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("APP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let max_players = lookup("STORE_MAX_PLAYERS")
            .map(|raw| raw.parse::<usize>())
            .transpose()
            .context("STORE_MAX_PLAYERS must be a valid usize")?;

        let seed_file = lookup("PLAYERS_SEED_FILE")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            max_players,
            seed_file,
        })
    }

    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(host) = cli.host {
            self.host = host;
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(seed) = cli.seed {
            self.seed_file = Some(seed);
        }
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
