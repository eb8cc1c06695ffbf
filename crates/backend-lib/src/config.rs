// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `HRMS_`-prefixed environment variables (`__` separates sections, e.g.
//! `HRMS_AUTH__JWT_SECRET`). They are loaded once at startup and never
//! reloaded.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};


/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Shortest accepted token lifetime (1 hour)
pub const MIN_TOKEN_TTL_SECS: u64 = 60 * 60;
/// Longest accepted token lifetime (24 hours)
pub const MAX_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Include error text in 500 responses
    pub expose_error_details: bool,
    /// Origins allowed to make credentialed requests
    pub cors_origins: Vec<String>,
    /// Take the client address from `X-Real-IP`; only behind a proxy that sets it
    pub trust_proxy: bool,
}

/// Which persistence strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON document per collection
    Document,
    /// SQLite database
    Sql,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Data directory; the SQL backend keeps `hrms.db` inside it
    pub path: PathBuf,
}

impl StorageSettings {
    /// SQLite database file
    pub fn database_file(&self) -> PathBuf {
        self.path.join("hrms.db")
    }
}

/// Credential and session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC signing secret; a random one is generated when empty
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    /// scrypt `log_n` cost parameter
    pub password_cost: u8,
    /// Failed logins per IP before lockout
    pub max_login_attempts: u32,
    pub lockout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3048,
            expose_error_details: false,
            cors_origins: vec!["http://localhost:3000".to_string()],
            trust_proxy: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Document,
            path: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: MAX_TOKEN_TTL_SECS,
            cookie_secure: false,
            password_cost: 15,
            max_login_attempts: 5,
            lockout_secs: 5 * 60,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from the given TOML file and the environment.
    /// A missing file is not an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("HRMS_").split("__"))
            .extract()
            .with_context(|| format!("failed to load settings from {}", path.as_ref().display()))?;
        Ok(settings)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if !(MIN_TOKEN_TTL_SECS..=MAX_TOKEN_TTL_SECS).contains(&self.auth.token_ttl_secs) {
            bail!(
                "auth.token_ttl_secs must be between {MIN_TOKEN_TTL_SECS} and {MAX_TOKEN_TTL_SECS}"
            );
        }
        if !(4..=20).contains(&self.auth.password_cost) {
            bail!("auth.password_cost must be between 4 and 20");
        }
        if self.auth.max_login_attempts == 0 {
            bail!("auth.max_login_attempts must be positive");
        }
        if self.auth.lockout_secs == 0 {
            bail!("auth.lockout_secs must be positive");
        }
        if self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!("invalid bind address {}:{}", self.server.host, self.server.port)
            })
    }
}
