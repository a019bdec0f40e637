//! Configuration module for the PawHaven backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default invite lifetime: 7 days.
const DEFAULT_INVITE_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Default session lifetime: 14 days.
const DEFAULT_SESSION_TTL_MINUTES: i64 = 14 * 24 * 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory
    pub index_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Lifetime of a shelter invite unless the inviter specifies one
    pub invite_ttl_minutes: i64,
    /// Lifetime of a login session
    pub session_ttl_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("PAWHAVEN_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let index_path = env::var("PAWHAVEN_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let bind_addr = env::var("PAWHAVEN_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid PAWHAVEN_BIND_ADDR format");

        let log_level = env::var("PAWHAVEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let invite_ttl_minutes = env::var("PAWHAVEN_INVITE_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_INVITE_TTL_MINUTES);

        let session_ttl_minutes = env::var("PAWHAVEN_SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_MINUTES);

        Self {
            db_path,
            index_path,
            bind_addr,
            log_level,
            invite_ttl_minutes,
            session_ttl_minutes,
        }
    }
}
