// Air conditioner (HVAC) status

use std::sync::Arc;

use serde_json::{Map, Value};

use thinqly_api::ModelInfo;

use crate::devices::{field_num, lookup_enum};
use crate::error::CoreError;

/// Whether the unit is running. The vendor vocabulary distinguishes
/// left/right/all for multi-outlet units; "right on" is plain "on" for
/// single units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcOperation {
    Off,
    RightOn,
    LeftOn,
    AllOn,
}

impl AcOperation {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "@AC_MAIN_OPERATION_OFF_W" => Some(Self::Off),
            "@AC_MAIN_OPERATION_RIGHT_ON_W" => Some(Self::RightOn),
            "@AC_MAIN_OPERATION_LEFT_ON_W" => Some(Self::LeftOn),
            "@AC_MAIN_OPERATION_ALL_ON_W" => Some(Self::AllOn),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "@AC_MAIN_OPERATION_OFF_W",
            Self::RightOn => "@AC_MAIN_OPERATION_RIGHT_ON_W",
            Self::LeftOn => "@AC_MAIN_OPERATION_LEFT_ON_W",
            Self::AllOn => "@AC_MAIN_OPERATION_ALL_ON_W",
        }
    }
}

/// The operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcMode {
    Cool,
    Dry,
    Fan,
    Ai,
    Heat,
    AirClean,
    Aco,
    Aroma,
    EnergySaving,
    EnergySaver,
}

impl AcMode {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "@AC_MAIN_OPERATION_MODE_COOL_W" => Some(Self::Cool),
            "@AC_MAIN_OPERATION_MODE_DRY_W" => Some(Self::Dry),
            "@AC_MAIN_OPERATION_MODE_FAN_W" => Some(Self::Fan),
            "@AC_MAIN_OPERATION_MODE_AI_W" => Some(Self::Ai),
            "@AC_MAIN_OPERATION_MODE_HEAT_W" => Some(Self::Heat),
            "@AC_MAIN_OPERATION_MODE_AIRCLEAN_W" => Some(Self::AirClean),
            "@AC_MAIN_OPERATION_MODE_ACO_W" => Some(Self::Aco),
            "@AC_MAIN_OPERATION_MODE_AROMA_W" => Some(Self::Aroma),
            "@AC_MAIN_OPERATION_MODE_ENERGY_SAVING_W" => Some(Self::EnergySaving),
            "@AC_MAIN_OPERATION_MODE_ENERGY_SAVER_W" => Some(Self::EnergySaver),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cool => "@AC_MAIN_OPERATION_MODE_COOL_W",
            Self::Dry => "@AC_MAIN_OPERATION_MODE_DRY_W",
            Self::Fan => "@AC_MAIN_OPERATION_MODE_FAN_W",
            Self::Ai => "@AC_MAIN_OPERATION_MODE_AI_W",
            Self::Heat => "@AC_MAIN_OPERATION_MODE_HEAT_W",
            Self::AirClean => "@AC_MAIN_OPERATION_MODE_AIRCLEAN_W",
            Self::Aco => "@AC_MAIN_OPERATION_MODE_ACO_W",
            Self::Aroma => "@AC_MAIN_OPERATION_MODE_AROMA_W",
            Self::EnergySaving => "@AC_MAIN_OPERATION_MODE_ENERGY_SAVING_W",
            Self::EnergySaver => "@AC_MAIN_OPERATION_MODE_ENERGY_SAVER_W",
        }
    }
}

/// The fan speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcFanSpeed {
    Slow,
    SlowLow,
    Low,
    LowMid,
    Mid,
    MidHigh,
    High,
    Power,
    Auto,
}

impl AcFanSpeed {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "@AC_MAIN_WIND_STRENGTH_SLOW_W" => Some(Self::Slow),
            "@AC_MAIN_WIND_STRENGTH_SLOW_LOW_W" => Some(Self::SlowLow),
            "@AC_MAIN_WIND_STRENGTH_LOW_W" => Some(Self::Low),
            "@AC_MAIN_WIND_STRENGTH_LOW_MID_W" => Some(Self::LowMid),
            "@AC_MAIN_WIND_STRENGTH_MID_W" => Some(Self::Mid),
            "@AC_MAIN_WIND_STRENGTH_MID_HIGH_W" => Some(Self::MidHigh),
            "@AC_MAIN_WIND_STRENGTH_HIGH_W" => Some(Self::High),
            "@AC_MAIN_WIND_STRENGTH_POWER_W" => Some(Self::Power),
            "@AC_MAIN_WIND_STRENGTH_AUTO_W" => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Slow => "@AC_MAIN_WIND_STRENGTH_SLOW_W",
            Self::SlowLow => "@AC_MAIN_WIND_STRENGTH_SLOW_LOW_W",
            Self::Low => "@AC_MAIN_WIND_STRENGTH_LOW_W",
            Self::LowMid => "@AC_MAIN_WIND_STRENGTH_LOW_MID_W",
            Self::Mid => "@AC_MAIN_WIND_STRENGTH_MID_W",
            Self::MidHigh => "@AC_MAIN_WIND_STRENGTH_MID_HIGH_W",
            Self::High => "@AC_MAIN_WIND_STRENGTH_HIGH_W",
            Self::Power => "@AC_MAIN_WIND_STRENGTH_POWER_W",
            Self::Auto => "@AC_MAIN_WIND_STRENGTH_AUTO_W",
        }
    }
}

#[derive(Debug)]
pub struct AcStatus {
    model: Arc<ModelInfo>,
    data: Map<String, Value>,
}

impl AcStatus {
    pub fn new(model: Arc<ModelInfo>, data: Map<String, Value>) -> Self {
        Self { model, data }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn current_temp_celsius(&self) -> Option<f64> {
        field_num(&self.data, "TempCur")
    }

    pub fn target_temp_celsius(&self) -> Option<f64> {
        field_num(&self.data, "TempCfg")
    }

    pub fn mode(&self) -> Result<Option<AcMode>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "OpMode")?
            .as_deref()
            .and_then(AcMode::from_label))
    }

    pub fn fan_speed(&self) -> Result<Option<AcFanSpeed>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "WindStrength")?
            .as_deref()
            .and_then(AcFanSpeed::from_label))
    }

    pub fn operation(&self) -> Result<Option<AcOperation>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "Operation")?
            .as_deref()
            .and_then(AcOperation::from_label))
    }

    pub fn is_on(&self) -> Result<bool, CoreError> {
        Ok(matches!(
            self.operation()?,
            Some(AcOperation::RightOn | AcOperation::LeftOn | AcOperation::AllOn)
        ))
    }
}
