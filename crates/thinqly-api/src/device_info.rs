// Device descriptors
//
// Immutable snapshots of the server's device list at list time. Fields
// use `#[serde(default)]` liberally because the API is inconsistent
// about field presence across firmware generations; everything we don't
// model explicitly lands in `extra`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::Error;
use crate::transport::LgedmClient;

/// One entry of the device list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// Vendor model name, e.g. `RAC_056905_WW`.
    #[serde(rename = "modelNm", default)]
    pub model_name: String,

    /// URL of the model's published schema document. Multiple devices of
    /// the same model share one URL -- schema caches key on this, never
    /// on the device id.
    #[serde(rename = "modelJsonUrl", default)]
    pub model_schema_url: String,

    /// User-assigned display name.
    #[serde(default)]
    pub alias: String,

    /// Numeric device-type code; see [`DeviceType`].
    #[serde(rename = "deviceType", default)]
    pub device_type: u32,

    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl DeviceInfo {
    /// The device's appliance category.
    pub fn kind(&self) -> DeviceType {
        DeviceType::from_code(self.device_type)
    }

    /// Fetch this device's model schema document (un-enveloped GET).
    pub async fn load_model_schema(&self, client: &LgedmClient) -> Result<Value, Error> {
        let url = Url::parse(&self.model_schema_url)?;
        client.get_json(url).await
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({:?} {})",
            self.device_id,
            self.alias,
            self.kind(),
            self.model_name
        )
    }
}

/// Appliance categories, keyed by the vendor's numeric device-type code.
///
/// Codes observed in the wild that we don't know yet map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Refrigerator,
    KimchiRefrigerator,
    WaterPurifier,
    Washer,
    Dryer,
    Styler,
    Dishwasher,
    Oven,
    Microwave,
    Cooktop,
    Hood,
    /// Includes heat pumps; possibly all HVAC devices.
    Ac,
    AirPurifier,
    Dehumidifier,
    /// Robot vacuum cleaner.
    RobotKing,
    Arch,
    Missg,
    Sensor,
    SolarSensor,
    IotLighting,
    IotMotionSensor,
    IotSmartPlug,
    IotDustSensor,
    EmsAirStation,
    AirSensor,
    Other(u32),
}

impl DeviceType {
    pub fn from_code(code: u32) -> Self {
        match code {
            101 => Self::Refrigerator,
            102 => Self::KimchiRefrigerator,
            103 => Self::WaterPurifier,
            201 => Self::Washer,
            202 => Self::Dryer,
            203 => Self::Styler,
            204 => Self::Dishwasher,
            301 => Self::Oven,
            302 => Self::Microwave,
            303 => Self::Cooktop,
            304 => Self::Hood,
            401 => Self::Ac,
            402 => Self::AirPurifier,
            403 => Self::Dehumidifier,
            501 => Self::RobotKing,
            1001 => Self::Arch,
            3001 => Self::Missg,
            3002 => Self::Sensor,
            3102 => Self::SolarSensor,
            3003 => Self::IotLighting,
            3004 => Self::IotMotionSensor,
            3005 => Self::IotSmartPlug,
            3006 => Self::IotDustSensor,
            4001 => Self::EmsAirStation,
            4003 => Self::AirSensor,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Refrigerator => 101,
            Self::KimchiRefrigerator => 102,
            Self::WaterPurifier => 103,
            Self::Washer => 201,
            Self::Dryer => 202,
            Self::Styler => 203,
            Self::Dishwasher => 204,
            Self::Oven => 301,
            Self::Microwave => 302,
            Self::Cooktop => 303,
            Self::Hood => 304,
            Self::Ac => 401,
            Self::AirPurifier => 402,
            Self::Dehumidifier => 403,
            Self::RobotKing => 501,
            Self::Arch => 1001,
            Self::Missg => 3001,
            Self::Sensor => 3002,
            Self::SolarSensor => 3102,
            Self::IotLighting => 3003,
            Self::IotMotionSensor => 3004,
            Self::IotSmartPlug => 3005,
            Self::IotDustSensor => 3006,
            Self::EmsAirStation => 4001,
            Self::AirSensor => 4003,
            Self::Other(code) => code,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_info_keeps_unmodeled_fields() {
        let info: DeviceInfo = serde_json::from_value(json!({
            "deviceId": "dev-1",
            "modelNm": "RAC_056905_WW",
            "modelJsonUrl": "https://cdn.example.com/RAC_056905_WW.json",
            "alias": "Bedroom AC",
            "deviceType": 401,
            "ssid": "home-iot",
        }))
        .unwrap();

        assert_eq!(info.kind(), DeviceType::Ac);
        assert_eq!(info.extra.get("ssid").unwrap(), "home-iot");
    }

    #[test]
    fn unknown_type_codes_round_trip() {
        let kind = DeviceType::from_code(9999);
        assert_eq!(kind, DeviceType::Other(9999));
        assert_eq!(kind.code(), 9999);
    }

    #[test]
    fn display_includes_alias_and_kind() {
        let info: DeviceInfo = serde_json::from_value(json!({
            "deviceId": "dev-2",
            "modelNm": "F4V9RWP2E",
            "alias": "Washer",
            "deviceType": 201,
        }))
        .unwrap();
        assert_eq!(info.to_string(), "dev-2: Washer (Washer F4V9RWP2E)");
    }
}
