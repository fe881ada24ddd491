//! Shared configuration for NLT tools.
//!
//! TOML profiles, credential resolution (env + plaintext), and translation
//! to `nlt_api::ClientConfig` / `nlt_api::Credentials`. The API crate never
//! sees these types; it receives pre-built values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nlt_api::{ClientConfig, Credentials, DEFAULT_BASE_URL};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "NLT_CONFIG";

/// Password used when a profile names no `password_env`.
pub const PASSWORD_ENV: &str = "NLT_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found in {path}")]
    UnknownProfile { profile: String, path: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is requested.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

/// Values applied when a profile leaves them unset.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_max_retries() -> u32 {
    3
}
fn default_refresh_interval() -> u64 {
    600
}

/// A named account profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "https://lora.nlt-iot.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Account email.
    pub email: Option<String>,

    /// Account password (plaintext; prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Log in on client construction and keep the token fresh.
    #[serde(default)]
    pub auto_login: bool,

    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub refresh_interval_secs: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: None,
            password: None,
            password_env: None,
            auto_login: false,
            timeout_secs: None,
            max_retries: None,
            refresh_interval_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

/// Command-line values that take precedence over the profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub timeout_secs: Option<u64>,
    pub auto_login: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `NLT_CONFIG`, then platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "nlt", "nlt").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nlt");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults and `NLT_*` variables still
/// apply. A double underscore separates nesting levels, so field names
/// keep their own underscores: `NLT_DEFAULTS__TIMEOUT_SECS` sets
/// `defaults.timeout_secs` and `NLT_PROFILES__LAB__EMAIL` sets
/// `profiles.lab.email`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NLT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Profile resolution ──────────────────────────────────────────────

/// Requested profile, else the configured default, else `"default"`.
pub fn active_profile_name(requested: Option<&str>, config: &Config) -> String {
    requested
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve the password from the credential chain.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. NLT_PASSWORD
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Translate a profile plus overrides into client settings and credentials.
///
/// This is the single boundary where config types cross into API types.
/// A profile missing from the file is tolerated when the overrides carry
/// an email, so one-off invocations work without a config file.
pub fn resolve(
    config: &Config,
    profile_name: &str,
    overrides: &Overrides,
) -> Result<(ClientConfig, Credentials), ConfigError> {
    let fallback = Profile::default();
    let profile = match config.profiles.get(profile_name) {
        Some(p) => p,
        None if overrides.email.is_some() => &fallback,
        None => {
            return Err(ConfigError::UnknownProfile {
                profile: profile_name.into(),
                path: config_path().display().to_string(),
            });
        }
    };

    // 1. Base URL (flag > profile)
    let url_str = overrides.base_url.as_deref().unwrap_or(&profile.base_url);
    let base_url: url::Url = url_str.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials
    let email = overrides
        .email
        .clone()
        .or_else(|| profile.email.clone())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name)?;
    let auto_login = overrides.auto_login.unwrap_or(profile.auto_login);

    // 3. Tuning (flag > profile > defaults)
    let defaults = &config.defaults;
    let timeout = overrides
        .timeout_secs
        .or(profile.timeout_secs)
        .unwrap_or(defaults.timeout_secs);
    let refresh = profile
        .refresh_interval_secs
        .unwrap_or(defaults.refresh_interval_secs);
    if refresh == 0 {
        return Err(ConfigError::Validation {
            field: "refresh_interval_secs".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let client_config = ClientConfig {
        base_url,
        timeout: Duration::from_secs(timeout),
        max_retries: profile.max_retries.unwrap_or(defaults.max_retries),
        refresh_interval: Duration::from_secs(refresh),
    };

    Ok((client_config, Credentials::new(email, password, auto_login)))
}
