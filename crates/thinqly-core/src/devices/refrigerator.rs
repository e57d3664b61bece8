// Refrigerator status

use std::sync::Arc;

use serde_json::{Map, Value};

use thinqly_api::ModelInfo;

use crate::devices::lookup_enum;
use crate::error::CoreError;

/// Door sensor reading. The vendor reports these as literal strings,
/// not vocabulary labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOpenState {
    Open,
    Close,
}

impl DoorOpenState {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "OPEN" => Some(Self::Open),
            "CLOSE" => Some(Self::Close),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct RefrigeratorStatus {
    model: Arc<ModelInfo>,
    data: Map<String, Value>,
}

impl RefrigeratorStatus {
    pub fn new(model: Arc<ModelInfo>, data: Map<String, Value>) -> Self {
        Self { model, data }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Fridge compartment temperature. The schema maps raw codes to
    /// degree values through the `TempRefrigerator` enum.
    pub fn temp_refrigerator_celsius(&self) -> Result<Option<f64>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "TempRefrigerator")?
            .and_then(|label| label.parse().ok()))
    }

    /// Freezer compartment temperature, via the `TempFreezer` enum.
    pub fn temp_freezer_celsius(&self) -> Result<Option<f64>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "TempFreezer")?
            .and_then(|label| label.parse().ok()))
    }

    pub fn door_state(&self) -> Result<Option<DoorOpenState>, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "DoorOpenState")?
            .as_deref()
            .and_then(DoorOpenState::from_label))
    }

    pub fn eco_enabled(&self) -> Result<bool, CoreError> {
        Ok(lookup_enum(&self.model, &self.data, "EcoFriendly")?.as_deref()
            == Some("@CP_ON_EN_W"))
    }
}
