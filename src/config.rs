use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{JotpadError, Result};

pub const DB_ENV: &str = "JOTPAD_DB";
pub const BIND_ENV: &str = "JOTPAD_BIND";
pub const PUBLIC_URL_ENV: &str = "JOTPAD_PUBLIC_URL";

/// Runtime settings for the server and CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Socket address the HTTP server listens on
    pub bind_addr: String,
    /// Origin prepended to public note paths, e.g. "https://notes.example.com".
    /// Empty keeps share links site-relative.
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data").join("jotpad.db"),
            bind_addr: "127.0.0.1:3000".to_string(),
            public_base_url: String::new(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `JOTPAD_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(DB_ENV).filter(|v| !v.is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup(BIND_ENV).filter(|v| !v.is_empty()) {
            config.bind_addr = addr;
        }
        if let Some(url) = lookup(PUBLIC_URL_ENV) {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }
        config
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, db_path: Option<PathBuf>, bind_addr: Option<String>) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        if let Some(addr) = bind_addr {
            self.bind_addr = addr;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(JotpadError::Config(format!(
                "invalid bind address '{}'",
                self.bind_addr
            )));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(JotpadError::Config("database path is empty".to_string()));
        }
        Ok(())
    }

    /// Full URL for a site-relative public path.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_base_url, path)
    }
}
