// Shared credential store
//
// One instance per client, shared by `Arc` with every resource service.
// The bearer token is the only mutable field; it lives in an `ArcSwapOption`
// so readers always load a whole token, never a partially-written one.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Account credentials plus the current bearer token.
#[derive(Debug)]
pub struct Credentials {
    email: String,
    password: SecretString,
    token: ArcSwapOption<SecretString>,
    auto_login: bool,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: SecretString, auto_login: bool) -> Self {
        Self {
            email: email.into(),
            password,
            token: ArcSwapOption::empty(),
            auto_login,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Whether the client should log in at construction and keep the
    /// token fresh in the background.
    pub fn auto_login(&self) -> bool {
        self.auto_login
    }

    /// Fails with [`Error::Validation`] when email or password is empty.
    pub fn validate(&self) -> Result<(), Error> {
        if self.email.is_empty() {
            return Err(Error::Validation {
                message: "email is required".into(),
            });
        }
        if self.password.expose_secret().is_empty() {
            return Err(Error::Validation {
                message: "password is required".into(),
            });
        }
        Ok(())
    }

    /// Snapshot of the current token, `None` before the first login.
    pub fn token(&self) -> Option<Arc<SecretString>> {
        self.token.load_full()
    }

    /// Replace the token. Concurrent readers see either the old or the new
    /// value in full.
    pub fn set_token(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
    }

    /// `Bearer <token>` header value, marked sensitive. `None` before the
    /// first login.
    pub(crate) fn bearer(&self) -> Result<Option<HeaderValue>, Error> {
        let token = self.token.load();
        token.as_deref().map(bearer_header).transpose()
    }
}

/// Build a sensitive `Bearer <token>` header, rejecting tokens that cannot
/// be sent as a header value.
pub(crate) fn bearer_header(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| Error::Validation {
            message: "access token contains characters not allowed in an HTTP header".into(),
        })?;
    value.set_sensitive(true);
    Ok(value)
}
