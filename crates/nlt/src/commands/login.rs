//! Login command handler.

use secrecy::ExposeSecret;
use serde::Serialize;

use nlt_api::Client;
use nlt_api::types::AuthResponse;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

/// What `nlt login` prints; the token only on request.
#[derive(Debug, Serialize)]
struct LoginSummary<'a> {
    email: &'a str,
    token_type: &'a str,
    user_type: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

pub fn handle(
    client: &Client,
    account: &AuthResponse,
    args: &LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let summary = LoginSummary {
        email: client.credentials().email(),
        token_type: &account.token_type,
        user_type: account.user_type,
        access_token: args
            .show_token
            .then(|| account.access_token.expose_secret()),
    };
    output::emit(&global.output, &summary, global.quiet)
}
