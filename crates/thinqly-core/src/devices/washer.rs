// Washer status

use std::sync::Arc;

use serde_json::{Map, Value};

use thinqly_api::ModelInfo;

use crate::devices::{as_minutes, lookup_enum, lookup_reference};
use crate::error::CoreError;

/// The washer's machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WasherState {
    AddDrain,
    Complete,
    Detecting,
    DetergentAmount,
    Drying,
    End,
    ErrorAutoOff,
    FreshCare,
    FrozenPreventInitial,
    FrozenPreventPause,
    FrozenPreventRunning,
    Initial,
    Off,
    Pause,
    PreWash,
    Reserve,
    Rinsing,
    RinseHold,
    Running,
    SmartDiagnosis,
    SmartDiagnosisData,
    Spinning,
}

impl WasherState {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "@WM_STATE_ADD_DRAIN_W" => Some(Self::AddDrain),
            "@WM_STATE_COMPLETE_W" => Some(Self::Complete),
            "@WM_STATE_DETECTING_W" => Some(Self::Detecting),
            "@WM_STATE_DETERGENT_AMOUNT_W" => Some(Self::DetergentAmount),
            "@WM_STATE_DRYING_W" => Some(Self::Drying),
            "@WM_STATE_END_W" => Some(Self::End),
            "@WM_STATE_ERROR_AUTO_OFF_W" => Some(Self::ErrorAutoOff),
            "@WM_STATE_FRESHCARE_W" => Some(Self::FreshCare),
            "@WM_STATE_FROZEN_PREVENT_INITIAL_W" => Some(Self::FrozenPreventInitial),
            "@WM_STATE_FROZEN_PREVENT_PAUSE_W" => Some(Self::FrozenPreventPause),
            "@WM_STATE_FROZEN_PREVENT_RUNNING_W" => Some(Self::FrozenPreventRunning),
            "@WM_STATE_INITIAL_W" => Some(Self::Initial),
            "@WM_STATE_POWER_OFF_W" => Some(Self::Off),
            "@WM_STATE_PAUSE_W" => Some(Self::Pause),
            "@WM_STATE_PREWASH_W" => Some(Self::PreWash),
            "@WM_STATE_RESERVE_W" => Some(Self::Reserve),
            "@WM_STATE_RINSING_W" => Some(Self::Rinsing),
            "@WM_STATE_RINSE_HOLD_W" => Some(Self::RinseHold),
            "@WM_STATE_RUNNING_W" => Some(Self::Running),
            "@WM_STATE_SMART_DIAG_W" => Some(Self::SmartDiagnosis),
            "@WM_STATE_SMART_DIAGDATA_W" => Some(Self::SmartDiagnosisData),
            "@WM_STATE_SPINNING_W" => Some(Self::Spinning),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct WasherStatus {
    model: Arc<ModelInfo>,
    data: Map<String, Value>,
}

impl WasherStatus {
    pub fn new(model: Arc<ModelInfo>, data: Map<String, Value>) -> Self {
        Self { model, data }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn state(&self) -> Result<Option<WasherState>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "State")?
            .as_deref()
            .and_then(WasherState::from_label))
    }

    pub fn previous_state(&self) -> Result<Option<WasherState>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "PreState")?
            .as_deref()
            .and_then(WasherState::from_label))
    }

    pub fn is_on(&self) -> Result<bool, CoreError> {
        Ok(!matches!(self.state()?, Some(WasherState::Off) | None))
    }

    pub fn remaining_minutes(&self) -> Option<u32> {
        as_minutes(&self.data, "Remain_Time_H", "Remain_Time_M")
    }

    pub fn initial_minutes(&self) -> Option<u32> {
        as_minutes(&self.data, "Initial_Time_H", "Initial_Time_M")
    }

    pub fn course(&self) -> Result<Option<String>, CoreError> {
        lookup_reference(&self.model, &self.data, "APCourse")
    }

    pub fn smart_course(&self) -> Result<Option<String>, CoreError> {
        lookup_reference(&self.model, &self.data, "SmartCourse")
    }

    pub fn error(&self) -> Result<Option<String>, CoreError> {
        lookup_reference(&self.model, &self.data, "Error")
    }
}
