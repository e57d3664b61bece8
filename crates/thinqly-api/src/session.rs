// Device session RPCs
//
// All device RPCs funnel through one enveloped `post` bound to the
// session's access token and server-assigned session id. The vendor API
// sometimes returns a lone object where a list is documented; that
// quirk is normalized here, at the session boundary, and nowhere else.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::auth::Auth;
use crate::device_info::DeviceInfo;
use crate::error::Error;
use crate::transport::{LgedmClient, join_url};

/// Server-assigned handle for one active monitoring work item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkId(String);

impl WorkId {
    /// A fresh client-generated id, used when registering new work.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which RPC category a config read goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCategory {
    Config,
    Control,
}

impl ConfigCategory {
    fn as_str(self) -> &'static str {
        match self {
            Self::Config => "Config",
            Self::Control => "Control",
        }
    }
}

/// An authenticated device session.
///
/// Bound 1:1 to an [`Auth`] snapshot and a server session id. Cheap to
/// clone. When the server reports "not logged in" the session is
/// logically dead: the owning client must discard it and derive a new
/// one from a refreshed `Auth`.
#[derive(Debug, Clone)]
pub struct Session {
    client: LgedmClient,
    auth: Auth,
    session_id: String,
}

impl Session {
    pub fn new(client: LgedmClient, auth: Auth, session_id: String) -> Self {
        Self {
            client,
            auth,
            session_id,
        }
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The single funnel every device RPC goes through: resolve the path
    /// against the gateway's API root, attach token + session headers,
    /// post the envelope.
    async fn post(&self, path: &str, data: Value) -> Result<Map<String, Value>, Error> {
        let url = join_url(&self.auth.gateway.api_root, path)?;
        self.client
            .post_envelope(
                url,
                data,
                self.auth.access_token.as_deref(),
                Some(&self.session_id),
            )
            .await
    }

    /// List the account's registered devices.
    pub async fn list_devices(&self) -> Result<Vec<DeviceInfo>, Error> {
        let resp = self.post("device/deviceList", json!({})).await?;

        one_or_many(resp.get("item").cloned())
            .into_iter()
            .map(|item| {
                serde_json::from_value(item.clone()).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: item.to_string(),
                })
            })
            .collect()
    }

    /// Register a monitoring work item for a device.
    pub async fn start_monitor(&self, device_id: &str) -> Result<WorkId, Error> {
        let resp = self
            .post(
                "rti/rtiMon",
                json!({
                    "cmd": "Mon",
                    "cmdOpt": "Start",
                    "deviceId": device_id,
                    "workId": WorkId::generate(),
                }),
            )
            .await?;

        resp.get("workId")
            .and_then(Value::as_str)
            .map(|id| WorkId::from(id.to_owned()))
            .ok_or_else(|| Error::Deserialization {
                message: "monitor start response is missing `workId`".into(),
                body: Value::Object(resp).to_string(),
            })
    }

    /// Poll a monitoring work item for new data.
    ///
    /// `Ok(None)` means "nothing yet": either the work item has produced
    /// no return code (still pending) or no payload (no new data). A
    /// non-success return code means the work item died on the server --
    /// that is [`Error::Monitor`], and only that condition warrants a
    /// restart.
    pub async fn poll_monitor(
        &self,
        device_id: &str,
        work_id: &WorkId,
    ) -> Result<Option<Vec<u8>>, Error> {
        let resp = self
            .post(
                "rti/rtiResult",
                json!({ "workList": [{ "deviceId": device_id, "workId": work_id }] }),
            )
            .await?;

        let Some(work) = resp.get("workList") else {
            return Ok(None);
        };
        let Some(code) = work.get("returnCode").and_then(Value::as_str) else {
            return Ok(None);
        };
        if code != "0000" {
            return Err(Error::Monitor {
                device_id: device_id.to_owned(),
                code: code.to_owned(),
            });
        }
        let Some(data) = work.get("returnData").and_then(Value::as_str) else {
            return Ok(None);
        };

        let bytes = BASE64.decode(data).map_err(|e| Error::Deserialization {
            message: format!("monitor payload is not valid base64: {e}"),
            body: data.to_owned(),
        })?;
        Ok(Some(bytes))
    }

    /// Deregister a monitoring work item.
    pub async fn stop_monitor(&self, device_id: &str, work_id: &WorkId) -> Result<(), Error> {
        self.post(
            "rti/rtiMon",
            json!({
                "cmd": "Mon",
                "cmdOpt": "Stop",
                "deviceId": device_id,
                "workId": work_id,
            }),
        )
        .await?;
        Ok(())
    }

    /// Write one or more control values to a device.
    pub async fn set_device_control(
        &self,
        device_id: &str,
        values: Value,
    ) -> Result<Map<String, Value>, Error> {
        self.post(
            "rti/rtiControl",
            json!({
                "cmd": "Control",
                "cmdOpt": "Set",
                "value": values,
                "deviceId": device_id,
                "workId": WorkId::generate(),
                "data": "",
            }),
        )
        .await
    }

    /// Read a config or control value from a device, returning the raw
    /// `returnData` string (callers decode it per key).
    pub async fn get_device_config(
        &self,
        device_id: &str,
        key: &str,
        category: ConfigCategory,
    ) -> Result<String, Error> {
        let resp = self
            .post(
                "rti/rtiControl",
                json!({
                    "cmd": category.as_str(),
                    "cmdOpt": "Get",
                    "value": key,
                    "deviceId": device_id,
                    "workId": WorkId::generate(),
                    "data": "",
                }),
            )
            .await?;

        resp.get("returnData")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| Error::Deserialization {
                message: "config response is missing `returnData`".into(),
                body: Value::Object(resp).to_string(),
            })
    }
}

/// Normalize the vendor's sometimes-singular, sometimes-array fields
/// into a plain list. The one place this quirk is handled.
pub(crate) fn one_or_many(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn one_or_many_wraps_single_objects() {
        let out = one_or_many(Some(json!({ "deviceId": "a" })));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn one_or_many_passes_arrays_through() {
        let out = one_or_many(Some(json!([{ "deviceId": "a" }, { "deviceId": "b" }])));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn one_or_many_treats_absent_as_empty() {
        assert!(one_or_many(None).is_empty());
        assert!(one_or_many(Some(Value::Null)).is_empty());
    }
}
