//! Command handlers.

pub mod auth;
pub mod control;
pub mod devices;
pub mod monitor;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        Command::Auth => auth::handle(global).await,
        Command::Ls => devices::handle_ls(global).await,
        Command::Monitor {
            device_id,
            interval,
        } => monitor::handle(global, &device_id, interval).await,
        Command::Set {
            device_id,
            key,
            value,
        } => control::handle_set(global, &device_id, &key, &value).await,
        Command::ConfigGet { device_id, key } => {
            control::handle_config_get(global, &device_id, &key).await
        }
    }
}
