//! CLI error types with miette diagnostics.
//!
//! Maps `nlt_api::Error` and `nlt_config::ConfigError` into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use nlt_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the NLT API at {url}")]
    #[diagnostic(
        code(nlt::connection_failed),
        help(
            "Check your network and the base URL.\n\
             URL: {url}\n\
             Override with: nlt --base-url <URL> ..."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {detail}")]
    #[diagnostic(
        code(nlt::auth_failed),
        help(
            "Verify the email and password of the active profile.\n\
             The password is read from the profile's password_env, NLT_PASSWORD, or the config file."
        )
    )]
    AuthFailed { detail: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(nlt::no_credentials),
        help(
            "Set email and password in the profile, or pass --email and set NLT_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(nlt::not_found),
        help("Run: nlt {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Request rejected: {message}")]
    #[diagnostic(code(nlt::rejected))]
    Rejected { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(nlt::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nlt::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(nlt::profile_not_found),
        help(
            "Add a [profiles.{name}] section to {path},\n\
             or pass --email (with NLT_PASSWORD set) to run without a profile."
        )
    )]
    ProfileNotFound { name: String, path: String },

    #[error(transparent)]
    #[diagnostic(code(nlt::config))]
    Config(Box<figment::Error>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(nlt::timeout),
        help("Increase timeout with --timeout or retry later.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(nlt::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(nlt::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach resource context to a bare "not found".
    pub fn not_found(
        err: nlt_api::Error,
        resource_type: &str,
        identifier: &str,
        list_command: &str,
    ) -> Self {
        if err.is_not_found() {
            Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: list_command.into(),
            }
        } else {
            err.into()
        }
    }
}

// ── nlt_api::Error → CliError mapping ────────────────────────────────

impl From<nlt_api::Error> for CliError {
    fn from(err: nlt_api::Error) -> Self {
        use nlt_api::Error;

        match err {
            Error::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },

            Error::InvalidCredentials { detail } | Error::Unauthorized { detail } => {
                Self::AuthFailed { detail }
            }

            Error::Transport(e) => Self::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },

            Error::InvalidUrl(e) => Self::Validation {
                field: "base_url".into(),
                reason: e.to_string(),
            },

            Error::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            Error::NotFound => Self::NotFound {
                resource_type: "resource".into(),
                identifier: "(requested)".into(),
                list_command: "--help".into(),
            },

            Error::DeviceValidation { detail } => Self::Validation {
                field: "device".into(),
                reason: detail,
            },

            Error::Rejected { message } => Self::Rejected { message },

            Error::Unknown { status, body } => Self::ApiError {
                code: format!("http_{status}"),
                message: body,
            },

            Error::Deserialization { message, body: _ } => Self::ApiError {
                code: "decode".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { profile, path } => Self::ProfileNotFound {
                name: profile,
                path,
            },
            ConfigError::Figment(e) => Self::Config(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_exit_codes() {
        let cases = [
            (
                nlt_api::Error::InvalidCredentials {
                    detail: "bad creds".into(),
                },
                exit_code::AUTH,
            ),
            (nlt_api::Error::NotFound, exit_code::NOT_FOUND),
            (
                nlt_api::Error::Validation {
                    message: "email is required".into(),
                },
                exit_code::USAGE,
            ),
            (
                nlt_api::Error::Timeout { timeout_secs: 10 },
                exit_code::TIMEOUT,
            ),
            (
                nlt_api::Error::Unknown {
                    status: 500,
                    body: "boom".into(),
                },
                exit_code::GENERAL,
            ),
        ];

        for (err, code) in cases {
            let display = err.to_string();
            assert_eq!(CliError::from(err).exit_code(), code, "for {display}");
        }
    }

    #[test]
    fn not_found_gains_context() {
        let err = CliError::not_found(nlt_api::Error::NotFound, "device", "31", "devices list");
        assert_eq!(err.to_string(), "device '31' not found");

        let err = CliError::not_found(
            nlt_api::Error::Rejected {
                message: "busy".into(),
            },
            "device",
            "31",
            "devices list",
        );
        assert!(matches!(err, CliError::Rejected { .. }));
    }
}
