// HTTP transport
//
// The `Transport` trait is the single seam between the services and the
// network: method, URL, headers, optional JSON body and a retry budget in;
// status code and raw body out. Status classification is left to callers,
// so only network-level failures come back as `Err`.

use std::future::Future;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;

const USER_AGENT: &str = concat!("nlt-api/", env!("CARGO_PKG_VERSION"));
const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// A single logical request, possibly sent several times.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    /// Total attempts allowed for transient failures (minimum 1).
    pub max_retries: u32,
}

/// Status code and undecoded body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests on behalf of the resource services.
pub trait Transport: Send + Sync + 'static {
    fn request(
        &self,
        req: TransportRequest,
    ) -> impl Future<Output = Result<RawResponse, Error>> + Send;
}

/// Settings for building an [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Deadline for one logical request, retries included.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            timeout: config.timeout,
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    async fn send_once(&self, req: &TransportRequest) -> Result<RawResponse, Error> {
        let mut builder = self
            .http
            .request(req.method.clone(), req.url.clone())
            .headers(req.headers.clone());
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(RawResponse { status, body })
    }

    async fn send_with_retries(&self, req: &TransportRequest) -> Result<RawResponse, Error> {
        let attempts = req.max_retries.max(1);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.send_once(req).await {
                Ok(resp) if resp.status >= 500 && attempt < attempts => {
                    debug!(status = resp.status, attempt, "server error, retrying");
                }
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_transient() && attempt < attempts => {
                    debug!(error = %e, attempt, "transient failure, retrying");
                }
                Err(e) => return Err(e),
            }
            tokio::time::sleep(RETRY_BACKOFF * attempt).await;
        }
    }
}

impl Transport for HttpTransport {
    async fn request(&self, req: TransportRequest) -> Result<RawResponse, Error> {
        debug!("{} {}", req.method, req.url);

        if let Ok(result) = tokio::time::timeout(self.timeout, self.send_with_retries(&req)).await
        {
            result
        } else {
            warn!(url = %req.url, "request deadline exceeded");
            Err(Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })
        }
    }
}
