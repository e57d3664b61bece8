// thinqly-core: Client orchestration over the thinqly-api protocol crate

pub mod client;
pub mod device;
pub mod devices;
pub mod error;
pub mod lang_pack;
pub mod state;

pub use client::Client;
pub use device::Device;
pub use devices::ApplianceStatus;
pub use error::CoreError;
pub use lang_pack::LangPack;
pub use state::{AuthState, ClientState};
