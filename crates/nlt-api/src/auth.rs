// Authentication
//
// `POST /token` exchanges email/password for a bearer token. A successful
// login writes the token into the shared credential store, so every service
// picks it up on its next call.

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::credentials;
use crate::error::{self, Error};
use crate::rest::Rest;
use crate::transport::Transport;
use crate::types::AuthResponse;

pub struct AuthService<T> {
    rest: Rest<T>,
}

impl<T: Transport> AuthService<T> {
    pub(crate) fn new(rest: Rest<T>) -> Self {
        Self { rest }
    }

    /// Log in and store the returned token.
    ///
    /// HTTP 400 fails with [`Error::InvalidCredentials`] carrying the vendor's
    /// detail; any other non-success status fails with [`Error::Unknown`].
    /// A token that cannot be sent as a header fails with
    /// [`Error::Validation`] and is not stored.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        let url = self.rest.endpoint(&["token"])?;
        debug!(email, "logging in at {}", url);

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self
            .rest
            .send_anonymous(Method::POST, url, Some(body))
            .await?;

        if resp.status == 400 {
            return Err(error::invalid_credentials(&resp.body));
        }
        if !resp.is_success() {
            return Err(Error::Unknown {
                status: resp.status,
                body: resp.body,
            });
        }

        let account: AuthResponse = Error::decode(&resp.body)?;
        credentials::bearer_header(&account.access_token)?;
        self.rest
            .credentials()
            .set_token(account.access_token.clone());

        info!(token_type = %account.token_type, "login successful");
        Ok(account)
    }

    /// Log in again with the email and password held by the credential store.
    pub async fn refresh(&self) -> Result<AuthResponse, Error> {
        let creds = Arc::clone(self.rest.credentials());
        self.login(creds.email(), creds.password()).await
    }
}
