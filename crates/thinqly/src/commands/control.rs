//! `thinqly set` / `thinqly config-get` -- one-shot control and config
//! operations.

use crate::cli::GlobalOpts;
use crate::commands::util;
use crate::error::CliError;

pub async fn handle_set(
    global: &GlobalOpts,
    device_id: &str,
    key: &str,
    value: &str,
) -> Result<(), CliError> {
    let ctx = util::context(global)?;
    let mut client = util::init_client(&ctx).await?;

    let device = client.device(device_id).await?;
    device.set_control(key, value).await?;
    println!("{key} set to {value}");

    util::save_state(&ctx, &client)?;
    Ok(())
}

pub async fn handle_config_get(
    global: &GlobalOpts,
    device_id: &str,
    key: &str,
) -> Result<(), CliError> {
    let ctx = util::context(global)?;
    let mut client = util::init_client(&ctx).await?;

    let device = client.device(device_id).await?;
    let value = device.get_config(key).await?;
    println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());

    util::save_state(&ctx, &client)?;
    Ok(())
}
