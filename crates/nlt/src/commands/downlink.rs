//! Downlink command handlers.

use nlt_api::Client;
use nlt_api::types::DownlinkRequest;

use crate::cli::{DownlinkArgs, DownlinkCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &Client,
    args: DownlinkArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DownlinkCommand::Send {
            dev_eui,
            payload,
            port,
            confirmed,
        } => {
            let is_hex = payload.bytes().all(|b| b.is_ascii_hexdigit());
            if payload.is_empty() || payload.len() % 2 != 0 || !is_hex {
                return Err(CliError::Validation {
                    field: "payload".into(),
                    reason: format!("expected an even number of hex digits, got '{payload}'"),
                });
            }

            let req = DownlinkRequest {
                payload,
                port,
                confirmed,
            };
            let queued = client
                .downlink()
                .send(&dev_eui, &req)
                .await
                .map_err(|e| CliError::not_found(e, "device", &dev_eui, "devices list"))?;
            output::emit(&global.output, &queued, global.quiet)
        }
    }
}
