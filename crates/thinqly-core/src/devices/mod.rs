// Per-appliance status wrappers
//
// One variant per appliance category the vendor ships a vocabulary for,
// keyed by the numeric device-type code. Every wrapper is a pure view
// over the generic decode engine: field accessors only, no protocol
// logic. Unknown categories fall back to the raw field map.

mod ac;
mod dehumidifier;
mod dishwasher;
mod dryer;
mod refrigerator;
mod washer;

pub use ac::{AcFanSpeed, AcMode, AcOperation, AcStatus};
pub use dehumidifier::{DehumidifierMode, DehumidifierStatus};
pub use dishwasher::{DishwasherProcess, DishwasherState, DishwasherStatus};
pub use dryer::{DryLevel, DryerState, DryerStatus};
pub use refrigerator::{DoorOpenState, RefrigeratorStatus};
pub use washer::{WasherState, WasherStatus};

use std::sync::Arc;

use serde_json::{Map, Value};

use thinqly_api::{DeviceType, ModelInfo};

use crate::error::CoreError;

/// A decoded monitor snapshot, typed by appliance category.
#[derive(Debug)]
pub enum ApplianceStatus {
    Ac(AcStatus),
    Washer(WasherStatus),
    Dryer(DryerStatus),
    Dishwasher(DishwasherStatus),
    Dehumidifier(DehumidifierStatus),
    Refrigerator(RefrigeratorStatus),
    /// Categories without a dedicated wrapper: the raw field map.
    Generic(GenericStatus),
}

impl ApplianceStatus {
    /// Wrap a decoded field map in the status type for `kind`.
    pub fn classify(kind: DeviceType, model: Arc<ModelInfo>, data: Map<String, Value>) -> Self {
        match kind {
            DeviceType::Ac => Self::Ac(AcStatus::new(model, data)),
            DeviceType::Washer => Self::Washer(WasherStatus::new(model, data)),
            DeviceType::Dryer => Self::Dryer(DryerStatus::new(model, data)),
            DeviceType::Dishwasher => Self::Dishwasher(DishwasherStatus::new(model, data)),
            DeviceType::Dehumidifier => Self::Dehumidifier(DehumidifierStatus::new(model, data)),
            DeviceType::Refrigerator => Self::Refrigerator(RefrigeratorStatus::new(model, data)),
            _ => Self::Generic(GenericStatus::new(model, data)),
        }
    }

    /// The raw decoded field map, whatever the category.
    pub fn fields(&self) -> &Map<String, Value> {
        match self {
            Self::Ac(s) => s.data(),
            Self::Washer(s) => s.data(),
            Self::Dryer(s) => s.data(),
            Self::Dishwasher(s) => s.data(),
            Self::Dehumidifier(s) => s.data(),
            Self::Refrigerator(s) => s.data(),
            Self::Generic(s) => s.data(),
        }
    }
}

/// Status for appliance categories without a typed wrapper.
#[derive(Debug)]
pub struct GenericStatus {
    model: Arc<ModelInfo>,
    data: Map<String, Value>,
}

impl GenericStatus {
    pub fn new(model: Arc<ModelInfo>, data: Map<String, Value>) -> Self {
        Self { model, data }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Resolve a field through the schema's enum table, when it has one.
    pub fn enum_label(&self, field: &str) -> Result<Option<String>, CoreError> {
        lookup_enum(&self.model, &self.data, field)
    }
}

// ── Shared accessors over the decoded field map ─────────────────────

/// A field's raw value as a string (binary decode already stringifies;
/// JSON payloads may carry numbers).
pub(crate) fn field_str(data: &Map<String, Value>, field: &str) -> Option<String> {
    match data.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn field_num(data: &Map<String, Value>, field: &str) -> Option<f64> {
    match data.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve a monitor field's code through the schema's enum table.
pub(crate) fn lookup_enum(
    model: &ModelInfo,
    data: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, CoreError> {
    let Some(code) = field_str(data, field) else {
        return Ok(None);
    };
    Ok(model.enum_name(field, &code)?)
}

/// Resolve a monitor field's code through the schema's reference table.
pub(crate) fn lookup_reference(
    model: &ModelInfo,
    data: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, CoreError> {
    let Some(code) = field_str(data, field) else {
        return Ok(None);
    };
    Ok(model.reference_name(field, &code)?)
}

/// Combine the hour/minute field pair the laundry appliances report
/// into total minutes.
pub(crate) fn as_minutes(data: &Map<String, Value>, hours: &str, minutes: &str) -> Option<u32> {
    let h = field_num(data, hours)?;
    let m = field_num(data, minutes)?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some((h * 60.0 + m) as u32)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_falls_back_to_generic() {
        let model = Arc::new(ModelInfo::new(json!({})));
        let status = ApplianceStatus::classify(DeviceType::Oven, model, Map::new());
        assert!(matches!(status, ApplianceStatus::Generic(_)));
    }

    #[test]
    fn as_minutes_combines_hour_and_minute_fields() {
        let mut data = Map::new();
        data.insert("Remain_Time_H".into(), json!("1"));
        data.insert("Remain_Time_M".into(), json!("30"));
        assert_eq!(as_minutes(&data, "Remain_Time_H", "Remain_Time_M"), Some(90));
    }
}
