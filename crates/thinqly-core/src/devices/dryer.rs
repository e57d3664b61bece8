// Dryer status

use std::sync::Arc;

use serde_json::{Map, Value};

use thinqly_api::ModelInfo;

use crate::devices::{as_minutes, lookup_enum, lookup_reference};
use crate::error::CoreError;

/// The dryer's machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryerState {
    Cooling,
    End,
    Error,
    Drying,
    Initial,
    Off,
    Pause,
    Running,
    SmartDiagnosis,
    WrinkleCare,
}

impl DryerState {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "@WM_STATE_COOLING_W" => Some(Self::Cooling),
            "@WM_STATE_END_W" => Some(Self::End),
            "@WM_STATE_ERROR_W" => Some(Self::Error),
            "@WM_STATE_DRYING_W" => Some(Self::Drying),
            "@WM_STATE_INITIAL_W" => Some(Self::Initial),
            "@WM_STATE_POWER_OFF_W" => Some(Self::Off),
            "@WM_STATE_PAUSE_W" => Some(Self::Pause),
            "@WM_STATE_RUNNING_W" => Some(Self::Running),
            "@WM_STATE_SMART_DIAGNOSIS_W" => Some(Self::SmartDiagnosis),
            "@WM_STATE_WRINKLECARE_W" => Some(Self::WrinkleCare),
            _ => None,
        }
    }
}

/// The dry-level setting. `Off` is the vendor's literal `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryLevel {
    Cupboard,
    Damp,
    Extra,
    Iron,
    Less,
    More,
    Normal,
    Off,
    Very,
}

impl DryLevel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "@WM_DRY27_DRY_LEVEL_CUPBOARD_W" => Some(Self::Cupboard),
            "@WM_DRY27_DRY_LEVEL_DAMP_W" => Some(Self::Damp),
            "@WM_DRY27_DRY_LEVEL_EXTRA_W" => Some(Self::Extra),
            "@WM_DRY27_DRY_LEVEL_IRON_W" => Some(Self::Iron),
            "@WM_DRY27_DRY_LEVEL_LESS_W" => Some(Self::Less),
            "@WM_DRY27_DRY_LEVEL_MORE_W" => Some(Self::More),
            "@WM_DRY27_DRY_LEVEL_NORMAL_W" => Some(Self::Normal),
            "-" => Some(Self::Off),
            "@WM_DRY27_DRY_LEVEL_VERY_W" => Some(Self::Very),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct DryerStatus {
    model: Arc<ModelInfo>,
    data: Map<String, Value>,
}

impl DryerStatus {
    pub fn new(model: Arc<ModelInfo>, data: Map<String, Value>) -> Self {
        Self { model, data }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn state(&self) -> Result<Option<DryerState>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "State")?
            .as_deref()
            .and_then(DryerState::from_label))
    }

    pub fn previous_state(&self) -> Result<Option<DryerState>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "PreState")?
            .as_deref()
            .and_then(DryerState::from_label))
    }

    pub fn dry_level(&self) -> Result<Option<DryLevel>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "DryLevel")?
            .as_deref()
            .and_then(DryLevel::from_label))
    }

    pub fn is_on(&self) -> Result<bool, CoreError> {
        Ok(!matches!(self.state()?, Some(DryerState::Off) | None))
    }

    pub fn remaining_minutes(&self) -> Option<u32> {
        as_minutes(&self.data, "Remain_Time_H", "Remain_Time_M")
    }

    pub fn initial_minutes(&self) -> Option<u32> {
        as_minutes(&self.data, "Initial_Time_H", "Initial_Time_M")
    }

    pub fn course(&self) -> Result<Option<String>, CoreError> {
        lookup_reference(&self.model, &self.data, "Course")
    }

    pub fn smart_course(&self) -> Result<Option<String>, CoreError> {
        lookup_reference(&self.model, &self.data, "SmartCourse")
    }

    pub fn error(&self) -> Result<Option<String>, CoreError> {
        lookup_reference(&self.model, &self.data, "Error")
    }
}
