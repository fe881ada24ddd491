// ── Runtime client configuration ──
//
// Describes *where* and *how* the client talks to the vendor API.
// Carries no credentials and never touches disk; `nlt-config` builds
// one of these from profiles and hands it in.

use std::time::Duration;

use url::Url;

/// The vendor's hosted endpoint.
pub const DEFAULT_BASE_URL: &str = "https://lora.nlt-iot.com";

/// Configuration for a single [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `https://lora.nlt-iot.com`.
    pub base_url: Url,
    /// Deadline for one call, retries included.
    pub timeout: Duration,
    /// Attempts per call for transient failures.
    pub max_retries: u32,
    /// Period of the background re-login when auto-login is enabled.
    pub refresh_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            refresh_interval: Duration::from_secs(10 * 60),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at a different API root.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}
