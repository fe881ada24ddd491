//! Command dispatch: bridges CLI args -> API services -> output formatting.

pub mod connections;
pub mod devices;
pub mod downlink;
pub mod login;
pub mod messages;
pub mod tags;
pub mod util;

use nlt_api::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Log in once, then run the command.
pub async fn dispatch(cmd: Command, client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let account = client.auth().refresh().await?;

    match cmd {
        Command::Login(args) => login::handle(client, &account, &args, global),
        Command::Devices(args) => devices::handle(client, args, global).await,
        Command::Connections(args) => connections::handle(client, args, global).await,
        Command::Messages(args) => messages::handle(client, args, global).await,
        Command::Tags(args) => tags::handle(client, args, global).await,
        Command::Downlink(args) => downlink::handle(client, args, global).await,
    }
}
