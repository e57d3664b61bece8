// ── Client orchestration ──
//
// Owns the "current" Auth/Session references (both are immutable values
// that get REPLACED, never mutated), the device list, and the per-model
// schema cache. The refresh-and-retry-once policy for rejected access
// tokens lives here and nowhere else.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use thinqly_api::{Auth, DeviceInfo, Gateway, LgedmClient, ModelInfo, Session};

use crate::device::Device;
use crate::error::CoreError;
use crate::state::ClientState;

/// Orchestrates gateway discovery, the token/session lifecycle, device
/// listing, and schema caching.
///
/// One logical caller per `Client`: operations take `&mut self` because
/// a rejected access token replaces the held `Auth` and `Session`.
pub struct Client {
    api: LgedmClient,
    auth: Auth,
    session: Option<Session>,
    devices: Vec<DeviceInfo>,
    /// Keyed by schema URL, never device id -- devices of one model
    /// share a single schema document.
    model_cache: HashMap<String, Arc<ModelInfo>>,
}

impl Client {
    /// Build a client from an already-authenticated `Auth` value.
    ///
    /// No network calls; the session is established lazily by the first
    /// operation (or eagerly via [`refresh_and_relogin`](Self::refresh_and_relogin)).
    pub fn from_auth(api: LgedmClient, auth: Auth) -> Self {
        Self {
            api,
            auth,
            session: None,
            devices: Vec::new(),
            model_cache: HashMap::new(),
        }
    }

    /// Bootstrap a client from a bare refresh token: discover the
    /// region's endpoints, refresh into an access token, and start a
    /// session.
    pub async fn from_token(
        refresh_token: &str,
        country: &str,
        language: &str,
    ) -> Result<Self, CoreError> {
        let api = LgedmClient::new()?;
        let gateway = Gateway::discover(&api, country, language).await?;
        let auth = Auth::new(gateway, None, refresh_token.to_owned());

        let mut client = Self::from_auth(api, auth);
        client.refresh_and_relogin().await?;
        Ok(client)
    }

    /// Restore a client from persisted state without re-authenticating.
    pub fn from_state(api: LgedmClient, state: ClientState) -> Self {
        let auth = Auth::new(state.gateway, state.auth.access_token, state.auth.refresh_token);
        let session = state
            .session
            .map(|id| Session::new(api.clone(), auth.clone(), id));
        let model_cache = state
            .model_info
            .into_iter()
            .map(|(url, schema)| (url, Arc::new(ModelInfo::new(schema))))
            .collect();

        Self {
            api,
            auth,
            session,
            devices: Vec::new(),
            model_cache,
        }
    }

    /// Snapshot the client into its persistable form.
    pub fn state(&self) -> ClientState {
        ClientState {
            gateway: self.auth.gateway.clone(),
            auth: crate::state::AuthState {
                access_token: self.auth.access_token.clone(),
                refresh_token: self.auth.refresh_token.clone(),
            },
            session: self.session.as_ref().map(|s| s.session_id().to_owned()),
            country: self.auth.gateway.country.clone(),
            language: self.auth.gateway.language.clone(),
            model_info: self
                .model_cache
                .iter()
                .map(|(url, model)| (url.clone(), model.data().clone()))
                .collect(),
        }
    }

    /// The current `Auth` snapshot.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The current session, if one has been established.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The device list from the most recent listing.
    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    fn require_session(&self) -> Result<&Session, CoreError> {
        self.session.as_ref().ok_or(CoreError::MissingSession)
    }

    /// Refresh the access token and rebuild the session.
    ///
    /// The old `Auth` and `Session` values are discarded wholesale --
    /// in-flight holders of the old snapshots stay consistent, they are
    /// just no longer "current". The device list is replaced with the
    /// one the new session reports.
    pub async fn refresh_and_relogin(&mut self) -> Result<(), CoreError> {
        self.auth = self.auth.refresh(&self.api).await?;
        let (session, devices) = self.auth.start_session(&self.api).await?;
        self.session = Some(session);
        self.devices = devices;
        debug!(devices = self.devices.len(), "session re-established");
        Ok(())
    }

    /// Make the client operational: establish a session if none is held
    /// (refreshing the token when the server rejects it or none exists),
    /// then load the device list.
    pub async fn connect(&mut self) -> Result<(), CoreError> {
        if self.session.is_none() {
            match self.auth.start_session(&self.api).await {
                Ok((session, devices)) => {
                    self.session = Some(session);
                    self.devices = devices;
                }
                Err(e)
                    if e.is_auth_expired()
                        || matches!(e, thinqly_api::Error::Authentication { .. }) =>
                {
                    self.refresh_and_relogin().await?;
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.update_devices().await
    }

    /// Re-fetch the device list.
    ///
    /// A rejected access token is absorbed exactly once: refresh,
    /// re-session, retry. A second rejection propagates.
    pub async fn update_devices(&mut self) -> Result<(), CoreError> {
        let devices = match self.require_session()?.list_devices().await {
            Ok(devices) => devices,
            Err(e) if e.is_auth_expired() => {
                info!("access token rejected -- refreshing and retrying once");
                self.refresh_and_relogin().await?;
                self.require_session()?.list_devices().await?
            }
            Err(e) => return Err(e.into()),
        };
        self.devices = devices;
        Ok(())
    }

    /// Look up a device descriptor, listing devices first if needed.
    pub async fn device_info(&mut self, device_id: &str) -> Result<&DeviceInfo, CoreError> {
        if self.devices.is_empty() {
            self.update_devices().await?;
        }
        self.devices
            .iter()
            .find(|d| d.device_id == device_id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                device_id: device_id.to_owned(),
            })
    }

    /// The schema interpreter for a device's model, fetched at most
    /// once per schema URL for the client's lifetime.
    pub async fn model_info(&mut self, device: &DeviceInfo) -> Result<Arc<ModelInfo>, CoreError> {
        if let Some(cached) = self.model_cache.get(&device.model_schema_url) {
            return Ok(Arc::clone(cached));
        }

        debug!(url = %device.model_schema_url, "fetching model schema");
        let schema = device.load_model_schema(&self.api).await?;
        let model = Arc::new(ModelInfo::new(schema));
        self.model_cache
            .insert(device.model_schema_url.clone(), Arc::clone(&model));
        Ok(model)
    }

    /// An operating handle for one device: descriptor + schema + a
    /// session snapshot to issue RPCs through.
    pub async fn device(&mut self, device_id: &str) -> Result<Device, CoreError> {
        let info = self.device_info(device_id).await?.clone();
        let model = self.model_info(&info).await?;
        let session = self.require_session()?.clone();
        Ok(Device::new(session, info, model))
    }
}
