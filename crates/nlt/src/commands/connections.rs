//! Connection command handlers.

use nlt_api::Client;
use nlt_api::types::ConnectionRequest;

use crate::cli::{ConnectionsArgs, ConnectionsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    client: &Client,
    args: ConnectionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConnectionsCommand::List => {
            let page = client.connections().list().await?;
            output::emit(&global.output, &page, global.quiet)
        }

        ConnectionsCommand::Create { file } => {
            let req: ConnectionRequest = util::read_json_file(&file)?;
            let created = client.connections().create(&req).await?;
            output::emit(&global.output, &created, global.quiet)
        }

        ConnectionsCommand::Delete { id } => {
            let label = id.to_string();
            client
                .connections()
                .delete(id)
                .await
                .map_err(|e| CliError::not_found(e, "connection", &label, "connections list"))?;
            util::notice("Connection deleted", global.quiet);
            Ok(())
        }
    }
}
