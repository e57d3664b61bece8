//! `thinqly monitor` -- poll one appliance until interrupted.
//!
//! The monitor is stopped on EVERY exit path (poll error, relogin,
//! ctrl-c): an abandoned work item stays registered server-side.

use std::time::Duration;

use owo_colors::OwoColorize;
use tracing::info;

use thinqly_core::{Client, Device};

use crate::cli::GlobalOpts;
use crate::commands::util;
use crate::error::CliError;
use crate::output;

pub async fn handle(global: &GlobalOpts, device_id: &str, interval: u64) -> Result<(), CliError> {
    let ctx = util::context(global)?;
    let mut client = util::init_client(&ctx).await?;

    let mut device = client.device(device_id).await?;
    util::save_state(&ctx, &client)?;

    device.start_monitor().await?;
    println!("Monitoring {} -- ctrl-c to stop", device_id.bold());

    let result = poll_loop(&mut client, &mut device, device_id, interval).await;

    // Release the server-side work item no matter how the loop ended.
    device.stop_monitor().await?;
    result
}

async fn poll_loop(
    client: &mut Client,
    device: &mut Device,
    device_id: &str,
    interval: u64,
) -> Result<(), CliError> {
    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopping.");
                return Ok(());
            }
            () = tokio::time::sleep(Duration::from_secs(interval)) => {}
        }

        match device.poll_status().await {
            Ok(Some(status)) => {
                println!("{}", "status:".dimmed());
                output::print_output(&output::render_fields(status.fields()));
            }
            Ok(None) => println!("{}", "(no new data)".dimmed()),
            Err(e) if e.is_auth_expired() => {
                // The session under this device went stale: relogin and
                // rebuild the device handle on the new session.
                info!("session expired mid-monitor -- reconnecting");
                device.stop_monitor().await?;
                client.refresh_and_relogin().await?;
                *device = client.device(device_id).await?;
                device.start_monitor().await?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
