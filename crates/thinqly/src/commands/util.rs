//! Shared command plumbing: config/flag merging, state-backed client
//! construction, and the interactive login flow.

use std::path::PathBuf;
use std::time::Duration;

use dialoguer::Input;
use tracing::debug;

use thinqly_api::{Auth, Gateway, TransportConfig};
use thinqly_core::{Client, ClientState};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Effective settings after merging the config file, environment, and
/// CLI flags (flags win).
pub struct Context {
    pub country: String,
    pub language: String,
    pub state_path: PathBuf,
    pub timeout: Duration,
}

pub fn context(global: &GlobalOpts) -> Result<Context, CliError> {
    let mut config = thinqly_config::load_config_or_default();
    if let Some(ref country) = global.country {
        config.country = country.clone();
    }
    if let Some(ref language) = global.language {
        config.language = language.clone();
    }
    if let Some(ref state_path) = global.state_path {
        config.state_path = Some(state_path.clone());
    }
    config.validate()?;

    Ok(Context {
        country: config.country.clone(),
        language: config.language.clone(),
        state_path: config.state_path(),
        timeout: Duration::from_secs(config.timeout),
    })
}

/// Build an operational client: restore persisted state when present,
/// otherwise run the interactive browser login.
pub async fn init_client(ctx: &Context) -> Result<Client, CliError> {
    let api = TransportConfig {
        timeout: ctx.timeout,
    }
    .build_client()?;

    let mut client = match ClientState::load(&ctx.state_path)? {
        Some(state) => {
            debug!(path = %ctx.state_path.display(), "restoring persisted state");
            Client::from_state(api, state)
        }
        None => {
            let gateway = Gateway::discover(&api, &ctx.country, &ctx.language).await?;
            let auth = interactive_login(gateway)?;
            Client::from_auth(api, auth)
        }
    };

    client.connect().await?;
    Ok(client)
}

/// Persist the client snapshot for the next invocation.
pub fn save_state(ctx: &Context, client: &Client) -> Result<(), CliError> {
    client.state().save(&ctx.state_path)?;
    debug!(path = %ctx.state_path.display(), "state saved");
    Ok(())
}

/// Print the login-page URL and collect the redirect URL the browser
/// lands on after the user signs in.
fn interactive_login(gateway: Gateway) -> Result<Auth, CliError> {
    let login_url = gateway.oauth_url()?;
    println!("Log in here:\n\n  {login_url}\n");

    let redirect: String = Input::new()
        .with_prompt("Then paste the URL where the browser is redirected")
        .interact_text()
        .map_err(|e| CliError::AuthFailed {
            message: format!("could not read the redirect URL: {e}"),
        })?;

    Ok(Auth::from_callback_url(gateway, redirect.trim())?)
}
