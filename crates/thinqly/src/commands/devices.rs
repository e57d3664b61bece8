//! `thinqly ls` -- list the account's appliances.

use tabled::Tabled;

use thinqly_api::DeviceInfo;

use crate::cli::GlobalOpts;
use crate::commands::util;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Model")]
    model: String,
}

impl From<&DeviceInfo> for DeviceRow {
    fn from(info: &DeviceInfo) -> Self {
        Self {
            id: info.device_id.clone(),
            name: info.alias.clone(),
            kind: format!("{:?}", info.kind()),
            model: info.model_name.clone(),
        }
    }
}

pub async fn handle_ls(global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = util::context(global)?;
    let client = util::init_client(&ctx).await?;

    let rows: Vec<DeviceRow> = client.devices().iter().map(DeviceRow::from).collect();
    if rows.is_empty() {
        println!("No devices on this account.");
    } else {
        output::print_output(&output::render_table(&rows));
    }

    util::save_state(&ctx, &client)?;
    Ok(())
}
