// Dehumidifier status

use std::sync::Arc;

use serde_json::{Map, Value};

use thinqly_api::ModelInfo;

use crate::devices::{field_num, lookup_enum};
use crate::error::CoreError;

/// The dehumidifier's operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DehumidifierMode {
    Sleep,
    Silent,
    SilentDehum,
    Auto,
    Smart,
    Fast,
    ConcentrationDry,
    ClothingDry,
}

impl DehumidifierMode {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "@AP_MAIN_MID_OPMODE_SLEEP_W" => Some(Self::Sleep),
            "@AP_MAIN_MID_OPMODE_SILENT_W" => Some(Self::Silent),
            "@AP_MAIN_MID_OPMODE_CILENT_DEHUM_W" => Some(Self::SilentDehum),
            "@AP_MAIN_MID_OPMODE_AUTO_W" => Some(Self::Auto),
            "@AP_MAIN_MID_OPMODE_SMART_DEHUM_W" => Some(Self::Smart),
            "@AP_MAIN_MID_OPMODE_FAST_DEHUM_W" => Some(Self::Fast),
            "@AP_MAIN_MID_OPMODE_CONCENTRATION_DRY_W" => Some(Self::ConcentrationDry),
            "@AP_MAIN_MID_OPMODE_CLOTHING_DRY_W" => Some(Self::ClothingDry),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct DehumidifierStatus {
    model: Arc<ModelInfo>,
    data: Map<String, Value>,
}

impl DehumidifierStatus {
    pub fn new(model: Arc<ModelInfo>, data: Map<String, Value>) -> Self {
        Self { model, data }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn mode(&self) -> Result<Option<DehumidifierMode>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "OpMode")?
            .as_deref()
            .and_then(DehumidifierMode::from_label))
    }

    pub fn is_on(&self) -> Result<bool, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "Operation")?.as_deref()
            == Some("@operation_on"))
    }

    pub fn current_humidity_pct(&self) -> Option<f64> {
        field_num(&self.data, "SensorHumidity")
    }

    pub fn target_humidity_pct(&self) -> Option<f64> {
        field_num(&self.data, "HumidityCfg")
    }
}
