// Authenticated request helpers shared by the resource services
//
// Builds endpoint URLs from the configured base, attaches the bearer token
// read from the credential store at call time, and turns raw responses
// into decoded DTOs or translated errors.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{self, Error};
use crate::transport::{RawResponse, Transport, TransportRequest};

/// Maps a non-success status and body to an [`Error`].
pub(crate) type Translate = fn(u16, &str) -> Error;

pub(crate) struct Rest<T> {
    transport: Arc<T>,
    creds: Arc<Credentials>,
    base_url: Url,
    max_retries: u32,
}

impl<T> Clone for Rest<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            creds: Arc::clone(&self.creds),
            base_url: self.base_url.clone(),
            max_retries: self.max_retries,
        }
    }
}

impl<T: Transport> Rest<T> {
    pub(crate) fn new(
        transport: Arc<T>,
        creds: Arc<Credentials>,
        base_url: Url,
        max_retries: u32,
    ) -> Self {
        Self {
            transport,
            creds,
            base_url,
            max_retries,
        }
    }

    pub(crate) fn credentials(&self) -> &Arc<Credentials> {
        &self.creds
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}/{segments...}`, each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Validation {
                message: format!("base URL cannot be a base: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Sending ──────────────────────────────────────────────────────

    /// Send without an `Authorization` header (login).
    pub(crate) async fn send_anonymous(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<RawResponse, Error> {
        self.transport
            .request(TransportRequest {
                method,
                url,
                headers: HeaderMap::new(),
                body,
                max_retries: self.max_retries,
            })
            .await
    }

    /// Send with `Authorization: Bearer <token>` from the credential store.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<RawResponse, Error> {
        let mut headers = HeaderMap::new();
        if let Some(bearer) = self.creds.bearer()? {
            headers.insert(AUTHORIZATION, bearer);
        } else {
            debug!(%url, "no token held, sending without authorization");
        }

        self.transport
            .request(TransportRequest {
                method,
                url,
                headers,
                body,
                max_retries: self.max_retries,
            })
            .await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<R: DeserializeOwned>(&self, url: Url) -> Result<R, Error> {
        let resp = self.send(Method::GET, url, None).await?;
        decode(resp, error::translate)
    }

    pub(crate) async fn post<R: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<R, Error> {
        let resp = self.send(Method::POST, url, Some(to_body(body)?)).await?;
        decode(resp, error::translate)
    }

    pub(crate) async fn patch<R: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<R, Error> {
        let resp = self.send(Method::PATCH, url, Some(to_body(body)?)).await?;
        decode(resp, error::translate)
    }

    pub(crate) async fn delete<R: DeserializeOwned>(&self, url: Url) -> Result<R, Error> {
        let resp = self.send(Method::DELETE, url, None).await?;
        decode(resp, error::translate)
    }
}

// ── Response handling ────────────────────────────────────────────────

pub(crate) fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value, Error> {
    serde_json::to_value(body).map_err(|e| Error::Validation {
        message: format!("request body is not serializable: {e}"),
    })
}

/// Decode a 2xx body as `R`, or translate the failure status.
pub(crate) fn decode<R: DeserializeOwned>(
    resp: RawResponse,
    translate: Translate,
) -> Result<R, Error> {
    if resp.is_success() {
        Error::decode(&resp.body)
    } else {
        Err(translate(resp.status, &resp.body))
    }
}
