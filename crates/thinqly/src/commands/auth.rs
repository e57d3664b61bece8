//! `thinqly auth` -- authenticate and print the refresh token.

use owo_colors::OwoColorize;

use crate::cli::GlobalOpts;
use crate::commands::util;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = util::context(global)?;
    let client = util::init_client(&ctx).await?;

    println!(
        "Refresh token: {}",
        client.auth().refresh_token.bold()
    );

    util::save_state(&ctx, &client)?;
    println!("State saved to {}", ctx.state_path.display().dimmed());
    Ok(())
}
