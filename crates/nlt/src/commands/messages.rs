//! Message history command handlers.

use chrono::{Local, TimeDelta};

use nlt_api::{Client, MessageFilter};

use crate::cli::{GlobalOpts, MessagesArgs, MessagesCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &Client,
    args: MessagesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MessagesCommand::List {
            dev_eui,
            message_type,
            from,
            to,
        } => {
            let end = to.unwrap_or_else(|| Local::now().naive_local());
            let start = from.unwrap_or(end - TimeDelta::days(1));
            if start > end {
                return Err(CliError::Validation {
                    field: "from".into(),
                    reason: format!("window start {start} is after its end {end}"),
                });
            }

            let filter = MessageFilter::new(message_type, start, end);
            let messages = client
                .messages()
                .list(&dev_eui, &filter)
                .await
                .map_err(|e| CliError::not_found(e, "device", &dev_eui, "devices list"))?;
            output::emit(&global.output, &messages.messages, global.quiet)
        }
    }
}
