//! Application settings loaded via OrthoConfig.
//!
//! Values come, lowest precedence first, from defaults, an optional config
//! file, `KUDOS_*` environment variables and command-line flags.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::inbound::http::session_config::SessionToggles;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_MEMEGEN_BASE_URL: &str = "https://api.memegen.link";
const DEFAULT_MEMEGEN_TIMEOUT_SECS: u64 = 5;
const DEFAULT_COOKIE_SECURE: bool = true;
const DEFAULT_IMPORT_MAX_BYTES: usize = 1024 * 1024;
const IMPORT_STAGING_DIR_NAME: &str = "kudotrio-imports";

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid memegen base url '{value}': {message}")]
    MemegenUrl { value: String, message: String },
}

/// Server and CLI configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KUDOS")]
pub struct Settings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. Absent selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    /// File holding the session signing key (at least 64 bytes in release).
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated key when the key file is unreadable. Debug only.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`. On unless explicitly disabled.
    pub cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    pub memegen_base_url: Option<String>,
    pub memegen_timeout_secs: Option<u64>,
    /// Where uploads wait between upload and confirmation.
    pub import_staging_dir: Option<PathBuf>,
    pub import_max_bytes: Option<usize>,
    /// Deliver notifications as files in this directory instead of logging.
    pub notification_outbox_dir: Option<PathBuf>,
    pub bcrypt_cost: Option<u32>,
}

impl Settings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(DEFAULT_COOKIE_SECURE)
    }

    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE)),
            allow_ephemeral: self.session_allow_ephemeral,
            cookie_secure: self.cookie_secure(),
            same_site: self.session_same_site.clone(),
        }
    }

    /// Parsed meme service base URL.
    pub fn memegen_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .memegen_base_url
            .as_deref()
            .unwrap_or(DEFAULT_MEMEGEN_BASE_URL);
        Url::parse(raw).map_err(|err| SettingsError::MemegenUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn memegen_timeout(&self) -> Duration {
        Duration::from_secs(
            self.memegen_timeout_secs
                .unwrap_or(DEFAULT_MEMEGEN_TIMEOUT_SECS),
        )
    }

    pub fn import_staging_dir(&self) -> PathBuf {
        self.import_staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(IMPORT_STAGING_DIR_NAME))
    }

    pub fn import_max_bytes(&self) -> usize {
        self.import_max_bytes.unwrap_or(DEFAULT_IMPORT_MAX_BYTES)
    }
}
