// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::PasswordHasher;
pub use crate::auth::PasswordRequirements;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "authgate.toml";

/// Prefix for environment overrides, e.g. `AUTHGATE_BASE_PATH`
pub const ENV_PREFIX: &str = "AUTHGATE_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// URL prefix the app is mounted under, prepended to every redirect
    pub base_path: String,
    /// Where a successful login lands, relative to `base_path`
    pub home_path: String,
    /// Postgres connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Session cookie and lifetime settings
    pub session: SessionSettings,
    /// Password hashing algorithm and work factor
    pub hashing: HashingSettings,
    /// Password requirements
    pub password_requirements: PasswordRequirements,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session TTL in seconds
    pub ttl_secs: u64,
    /// How often expired sessions are swept
    pub cleanup_interval_secs: u64,
    pub cookie_name: String,
    /// Add the `Secure` attribute; enable when served over HTTPS
    pub cookie_secure: bool,
}

/// One-way password hashing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Argon2id,
    Scrypt,
}

/// Work factor for the configured algorithm. Existing hashes keep the
/// parameters they were created with; these apply to new hashes only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    pub algorithm: HashAlgorithm,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
    pub scrypt_log_n: u8,
    pub scrypt_r: u32,
    pub scrypt_p: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            base_path: String::new(),
            home_path: "/".to_string(),
            database_url: None,
            log_level: "info".to_string(),
            log_json: false,
            session: SessionSettings::default(),
            hashing: HashingSettings::default(),
            password_requirements: PasswordRequirements::default(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60 * 24, // 1 day
            cleanup_interval_secs: 60 * 60,
            cookie_name: "authgate_session".to_string(),
            cookie_secure: false,
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        // OWASP baseline for argon2id; scrypt values match the crate's recommended params
        Self {
            algorithm: HashAlgorithm::Argon2id,
            argon2_memory_kib: 19 * 1024,
            argon2_iterations: 2,
            argon2_parallelism: 1,
            scrypt_log_n: 15,
            scrypt_r: 8,
            scrypt_p: 1,
        }
    }
}

impl HashingSettings {
    /// Minimal work factor so test suites do not spend seconds per hash
    pub fn fast_for_tests() -> Self {
        Self {
            argon2_memory_kib: 64,
            argon2_iterations: 1,
            scrypt_log_n: 4,
            ..Self::default()
        }
    }
}

impl Settings {
    /// Load settings from defaults, `authgate.toml` and `AUTHGATE_*` env vars
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings with an explicit config file path. A missing file is
    /// not an error; the remaining layers still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        settings.base_path = normalize_base_path(&settings.base_path);
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.session.ttl_secs == 0 {
            bail!("session.ttl_secs must be greater than zero");
        }
        if self.session.cleanup_interval_secs == 0 {
            bail!("session.cleanup_interval_secs must be greater than zero");
        }
        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("session.cookie_name must be a non-empty token");
        }
        if !self.home_path.starts_with('/') {
            bail!("home_path must start with '/'");
        }
        let min_length = self.password_requirements.min_length;
        if min_length == 0 || min_length > 128 {
            bail!("password_requirements.min_length must be between 1 and 128");
        }
        PasswordHasher::new(&self.hashing)
            .map_err(|e| anyhow::anyhow!("invalid hashing settings: {e}"))?;
        Ok(())
    }

    /// Prefix an absolute app path with the configured base path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    /// Cookie `Path` attribute covering the whole app
    pub fn cookie_path(&self) -> &str {
        if self.base_path.is_empty() {
            "/"
        } else {
            &self.base_path
        }
    }
}

/// Normalize to `""` or `/prefix` with no trailing slash
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
