use serde::Deserialize;
use thiserror::Error;

/// Top-level error type for the `nlt-api` crate.
///
/// Covers every failure mode across the API surface: local validation,
/// transport, authentication, vendor status codes, and decoding.
#[derive(Debug, Error)]
pub enum Error {
    // ── Local input ─────────────────────────────────────────────────
    /// Bad local input (e.g. missing email or password). Raised before
    /// any network activity.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (HTTP 400 on `/token`, or 403 on any call).
    #[error("Invalid credentials: {detail}")]
    InvalidCredentials { detail: String },

    /// Bearer token missing, expired, or revoked (HTTP 401).
    #[error("Invalid token: {detail}")]
    Unauthorized { detail: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The whole request, retries included, exceeded its deadline.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Vendor status codes ─────────────────────────────────────────
    /// Resource does not exist (HTTP 404).
    #[error("Not found")]
    NotFound,

    /// Device payload rejected by the vendor (HTTP 422, or 400 on
    /// device create/update).
    #[error("Device: {detail}")]
    DeviceValidation { detail: String },

    /// The vendor answered 2xx but the body reports the operation did not
    /// take effect (activation detail, unexpected delete message).
    #[error("Operation rejected: {message}")]
    Rejected { message: String },

    /// Any other non-success status.
    #[error("Unknown error (HTTP {status}): {body}")]
    Unknown { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::InvalidCredentials { .. }
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Timeout { .. } => true,
            Self::Unknown { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Decode `body` as `T`, keeping the raw body on failure.
    pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, Self> {
        serde_json::from_str(body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Self::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.to_owned(),
            }
        })
    }
}

// ── Vendor error bodies ──────────────────────────────────────────────

/// `{ "detail": "..." }` body returned on 400/401/403.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthError {
    pub detail: String,
}

/// `{ "detail": "..." }` body returned when a device payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceCreateError {
    pub detail: String,
}

// ── Translation ──────────────────────────────────────────────────────

/// Map a non-success status and its body to a typed [`Error`].
///
/// A malformed body on a status that carries a structured payload
/// (401, 403, 422) fails with [`Error::Deserialization`].
pub fn translate(status: u16, body: &str) -> Error {
    match status {
        401 => match Error::decode::<AuthError>(body) {
            Ok(e) => Error::Unauthorized { detail: e.detail },
            Err(e) => e,
        },
        403 => invalid_credentials(body),
        404 => Error::NotFound,
        422 => device_validation(body),
        _ => Error::Unknown {
            status,
            body: body.to_owned(),
        },
    }
}

/// Like [`translate`], but treats 400 as a device payload rejection.
pub(crate) fn translate_device(status: u16, body: &str) -> Error {
    if status == 400 {
        device_validation(body)
    } else {
        translate(status, body)
    }
}

pub(crate) fn invalid_credentials(body: &str) -> Error {
    match Error::decode::<AuthError>(body) {
        Ok(e) => Error::InvalidCredentials { detail: e.detail },
        Err(e) => e,
    }
}

fn device_validation(body: &str) -> Error {
    match Error::decode::<DeviceCreateError>(body) {
        Ok(e) => Error::DeviceValidation { detail: e.detail },
        Err(e) => e,
    }
}
