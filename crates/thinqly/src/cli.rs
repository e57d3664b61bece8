//! Clap derive structures for the `thinqly` CLI.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// thinqly -- control ThinQ smart appliances from the command line
#[derive(Debug, Parser)]
#[command(
    name = "thinqly",
    version,
    about = "Monitor and control ThinQ smart appliances",
    long_about = "A command-line client for the ThinQ v1 appliance cloud.\n\n\
        Authenticates through the vendor's browser login, then lists,\n\
        monitors, and controls the appliances on the account.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account country code
    #[arg(long, short = 'c', env = "THINQ_COUNTRY", global = true)]
    pub country: Option<String>,

    /// Account language code
    #[arg(long, short = 'l', env = "THINQ_LANGUAGE", global = true)]
    pub language: Option<String>,

    /// State file path
    #[arg(long, short = 's', env = "THINQ_STATE_PATH", global = true)]
    pub state_path: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate and print the account's refresh token
    Auth,

    /// List the account's appliances
    #[command(alias = "list")]
    Ls,

    /// Poll an appliance and print its status until interrupted
    #[command(alias = "mon")]
    Monitor {
        /// Device id (see `thinqly ls`)
        device_id: String,

        /// Seconds between polls
        #[arg(long, default_value = "1")]
        interval: u64,
    },

    /// Write one control value to an appliance
    Set {
        /// Device id
        device_id: String,
        /// Control key (e.g. Operation)
        key: String,
        /// Control value (vendor code)
        value: String,
    },

    /// Read a config value from an appliance
    ConfigGet {
        /// Device id
        device_id: String,
        /// Config key (e.g. Filter)
        key: String,
    },
}
