// Generic device handle
//
// Couples a device descriptor with its model schema and a session
// snapshot. All appliance categories share this surface; the typed
// per-category wrappers in `devices/` are accessors layered on the
// decoded field map, with no protocol logic of their own.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value};

use thinqly_api::{ConfigCategory, DeviceInfo, DeviceType, ModelInfo, Monitor, Session};

use crate::devices::ApplianceStatus;
use crate::error::CoreError;

/// An operating handle for one appliance.
pub struct Device {
    session: Session,
    info: DeviceInfo,
    model: Arc<ModelInfo>,
    monitor: Option<Monitor>,
}

impl Device {
    pub fn new(session: Session, info: DeviceInfo, model: Arc<ModelInfo>) -> Self {
        Self {
            session,
            info,
            model,
            monitor: None,
        }
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn model(&self) -> &ModelInfo {
        &self.model
    }

    pub fn kind(&self) -> DeviceType {
        self.info.kind()
    }

    /// Write a single control value.
    pub async fn set_control(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut values = Map::new();
        values.insert(key.to_owned(), Value::String(value.to_owned()));
        self.session
            .set_device_control(&self.info.device_id, Value::Object(values))
            .await?;
        Ok(())
    }

    /// Read a config value; the payload arrives base64-wrapped JSON.
    pub async fn get_config(&self, key: &str) -> Result<Value, CoreError> {
        let data = self
            .session
            .get_device_config(&self.info.device_id, key, ConfigCategory::Config)
            .await?;
        let bytes = BASE64
            .decode(&data)
            .map_err(|e| thinqly_api::Error::Deserialization {
                message: format!("config payload is not valid base64: {e}"),
                body: data,
            })?;
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            thinqly_api::Error::Deserialization {
                message: e.to_string(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }
        })?;
        Ok(value)
    }

    /// Read a control value; the payload arrives as `"(key:value)"`.
    pub async fn get_control(&self, key: &str) -> Result<String, CoreError> {
        let data = self
            .session
            .get_device_config(&self.info.device_id, key, ConfigCategory::Control)
            .await?;

        let value = data
            .split_once(':')
            .map_or("", |(_, rest)| rest.strip_suffix(')').unwrap_or(rest))
            .to_owned();
        Ok(value)
    }

    /// Whether a monitoring session is currently active.
    pub fn is_monitoring(&self) -> bool {
        self.monitor.as_ref().is_some_and(Monitor::is_active)
    }

    /// Start monitoring this device. No-op if already monitoring.
    pub async fn start_monitor(&mut self) -> Result<(), CoreError> {
        if self.is_monitoring() {
            return Ok(());
        }
        let mut monitor = Monitor::new(self.session.clone(), self.info.device_id.clone());
        monitor.start().await?;
        self.monitor = Some(monitor);
        Ok(())
    }

    /// Stop monitoring. Idempotent; call on every exit path.
    pub async fn stop_monitor(&mut self) -> Result<(), CoreError> {
        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop().await?;
        }
        Ok(())
    }

    /// Poll the monitor and decode the payload into a flat field map.
    /// `Ok(None)` when not monitoring or nothing new arrived.
    pub async fn poll(&mut self) -> Result<Option<Map<String, Value>>, CoreError> {
        let Some(monitor) = self.monitor.as_mut() else {
            return Ok(None);
        };
        let Some(raw) = monitor.poll().await? else {
            return Ok(None);
        };
        Ok(Some(self.model.decode_monitor(&raw)?))
    }

    /// Poll and wrap the decoded fields in the appliance-specific
    /// status type for this device's category.
    pub async fn poll_status(&mut self) -> Result<Option<ApplianceStatus>, CoreError> {
        let Some(data) = self.poll().await? else {
            return Ok(None);
        };
        Ok(Some(ApplianceStatus::classify(
            self.kind(),
            Arc::clone(&self.model),
            data,
        )))
    }
}
