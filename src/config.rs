//! Runtime configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_PATH: &str = "soporte.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl Config {
    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SOPORTE_DATABASE_PATH`: SQLite file (default: "soporte.db")
    /// - `SOPORTE_BIND_ADDR`: listen address (default: "0.0.0.0:8080")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("SOPORTE_DATABASE_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let bind_addr = lookup("SOPORTE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid SOPORTE_BIND_ADDR: {}", bind_addr))?;

        Ok(Self {
            database_path: PathBuf::from(database_path),
            bind_addr,
        })
    }
}
