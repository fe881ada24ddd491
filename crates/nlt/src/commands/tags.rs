//! Tag command handlers.

use nlt_api::Client;

use crate::cli::{GlobalOpts, TagsArgs, TagsCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &Client, args: TagsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TagsCommand::List => {
            let tags = client.tags().list().await?;
            output::emit(&global.output, &tags, global.quiet)
        }
    }
}
