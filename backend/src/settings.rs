//! Process settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `POSTAPP_*` environment variables and
//! configuration files, in increasing order of precedence per OrthoConfig's
//! layering rules. Optional fields fall back to the documented defaults in
//! their accessors.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
/// Minimum length of the session master key, in bytes.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Errors raised while turning settings into runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured.
    #[error("database_url is required (set POSTAPP_DATABASE_URL)")]
    MissingDatabaseUrl,
    /// The session key file could not be read and ephemeral keys are off.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short to derive signing and encryption keys.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Runtime settings for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POSTAPP")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// File holding the session cookie master key.
    pub session_key_file: Option<PathBuf>,
    /// Generate a throwaway session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`.
    pub cookie_secure: Option<bool>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// The configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Listen address, `0.0.0.0:8080` by default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether cookies carry the `Secure` flag; on unless disabled.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Pool settings for the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no URL is set.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let config = PoolConfig::new(self.database_url()?);
        Ok(match self.db_max_connections {
            Some(max) => config.with_max_size(max),
            None => config,
        })
    }

    /// Load the session master key, or generate an ephemeral one when allowed.
    ///
    /// # Errors
    ///
    /// Fails when the key file is unreadable and ephemeral keys are disabled,
    /// or when the file holds fewer than [`SESSION_KEY_MIN_LEN`] bytes.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(&path) {
            Ok(bytes) => key_from_bytes(&path, bytes),
            Err(source) if self.session_allow_ephemeral => {
                warn!(path = %path.display(), error = %source, "using ephemeral session key");
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::KeyRead { path, source }),
        }
    }
}

fn key_from_bytes(path: &Path, mut bytes: Vec<u8>) -> Result<Key, SettingsError> {
    let length = bytes.len();
    let key = Key::try_from(bytes.as_slice()).map_err(|_| SettingsError::KeyTooShort {
        path: path.to_path_buf(),
        length,
        min_len: SESSION_KEY_MIN_LEN,
    });
    bytes.zeroize();
    key
}
