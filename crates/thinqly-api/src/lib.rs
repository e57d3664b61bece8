// thinqly-api: Async Rust client for the ThinQ v1 appliance cloud protocol

pub mod auth;
pub mod device_info;
pub mod error;
pub mod gateway;
pub mod model;
pub mod monitor;
pub mod session;
pub mod transport;

pub use auth::Auth;
pub use device_info::{DeviceInfo, DeviceType};
pub use error::Error;
pub use gateway::{DEFAULT_COUNTRY, DEFAULT_LANGUAGE, Gateway};
pub use model::{ControlToken, ModelInfo, ValueSpec};
pub use monitor::Monitor;
pub use session::{ConfigCategory, Session, WorkId};
pub use transport::{LgedmClient, TransportConfig};
