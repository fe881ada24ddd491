//! Device command handlers.

use nlt_api::Client;
use nlt_api::types::{Device, DeviceCreateRequest};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const LIST_COMMAND: &str = "devices list";

fn missing(id: &str) -> impl FnOnce(nlt_api::Error) -> CliError + '_ {
    move |e| CliError::not_found(e, "device", id, LIST_COMMAND)
}

pub async fn handle(
    client: &Client,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let devices = client.devices();

    match args.command {
        DevicesCommand::List => {
            let list = devices.list().await?;
            output::emit(&global.output, &list, global.quiet)
        }

        DevicesCommand::Get { id } => {
            let device = devices.find(&id).await.map_err(missing(&id))?;
            output::emit(&global.output, &device, global.quiet)
        }

        DevicesCommand::Create { file } => {
            let req: DeviceCreateRequest = util::read_json_file(&file)?;
            let device = devices.create(&req).await?;
            output::emit(&global.output, &device, global.quiet)
        }

        DevicesCommand::Update { file } => {
            let device: Device = util::read_json_file(&file)?;
            let updated = devices
                .update(&device)
                .await
                .map_err(missing(&device.dev_eui))?;
            output::emit(&global.output, &updated, global.quiet)
        }

        DevicesCommand::Activate { id } => {
            devices.activate(&id).await.map_err(missing(&id))?;
            util::notice("Device activated", global.quiet);
            Ok(())
        }

        DevicesCommand::Deactivate { id } => {
            devices.deactivate(&id).await.map_err(missing(&id))?;
            util::notice("Device deactivated", global.quiet);
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            devices.delete(&id).await.map_err(missing(&id))?;
            util::notice("Device deleted", global.quiet);
            Ok(())
        }
    }
}
