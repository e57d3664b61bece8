// Enveloped HTTP transport
//
// Every RPC in this protocol is a JSON POST wrapped under one fixed
// top-level key, with fixed application/security headers and optional
// token/session headers. This module owns that funnel so the rest of
// the crate never touches envelope mechanics.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// Fixed application key sent as `x-thinq-application-key` on every request.
pub(crate) const APP_KEY: &str = "wideq";
/// Fixed security key sent as `x-thinq-security-key` on every request.
pub(crate) const SECURITY_KEY: &str = "nuts_securitykey";
/// The envelope key wrapping every request and response body.
pub(crate) const DATA_ROOT: &str = "lgedmRoot";

/// Shared transport configuration for building HTTP clients.
///
/// The protocol defines no timeouts of its own, so the request timeout
/// is configurable here.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build an [`LgedmClient`] from this config.
    pub fn build_client(&self) -> Result<LgedmClient, Error> {
        let mut headers = HeaderMap::new();
        headers.insert("x-thinq-application-key", HeaderValue::from_static(APP_KEY));
        headers.insert("x-thinq-security-key", HeaderValue::from_static(SECURITY_KEY));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("thinqly/0.1.0")
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)?;

        Ok(LgedmClient { http })
    }
}

/// HTTP client for the enveloped vendor API.
///
/// Cheap to clone (the inner `reqwest::Client` is reference-counted);
/// `Auth` and `Session` values each hold their own clone.
#[derive(Debug, Clone)]
pub struct LgedmClient {
    http: reqwest::Client,
}

impl LgedmClient {
    /// Build a client with default transport settings.
    pub fn new() -> Result<Self, Error> {
        TransportConfig::default().build_client()
    }

    /// The underlying HTTP client (for flows outside the envelope,
    /// e.g. the form-encoded OAuth token exchange).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send an enveloped POST and unwrap the response envelope.
    ///
    /// Wraps `data` under the fixed envelope key, attaches the access
    /// token and session id headers when present, then maps the
    /// response's `returnCd`: `"0000"` is success, `"0102"` means the
    /// token was rejected, `"0106"` means the device is offline, and
    /// anything else becomes [`Error::Api`] with the server's message.
    pub async fn post_envelope(
        &self,
        url: Url,
        data: Value,
        access_token: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<Map<String, Value>, Error> {
        debug!("POST {url}");

        let mut request = self.http.post(url).json(&json!({ DATA_ROOT: data }));
        if let Some(token) = access_token {
            request = request.header("x-thinq-token", token);
        }
        if let Some(id) = session_id {
            request = request.header("x-thinq-jsessionId", id);
        }

        let resp = request.send().await.map_err(Error::Transport)?;
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "response body received");

        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        let out = parsed
            .get(DATA_ROOT)
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| Error::Deserialization {
                message: format!("response is missing the `{DATA_ROOT}` envelope"),
                body,
            })?;

        if let Some(code) = out.get("returnCd").and_then(Value::as_str) {
            match code {
                "0000" => {}
                "0102" => return Err(Error::NotLoggedIn),
                "0106" => return Err(Error::NotConnected),
                _ => {
                    let message = out
                        .get("returnMsg")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned();
                    return Err(Error::Api {
                        code: code.to_owned(),
                        message,
                    });
                }
            }
        }

        Ok(out)
    }

    /// Fetch an un-enveloped JSON document (model schemas, language packs).
    pub async fn get_json(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Join a relative path onto a base URL, tolerating a missing trailing
/// slash on the base (the gateway reports roots both ways).
pub(crate) fn join_url(base: &str, path: &str) -> Result<Url, Error> {
    let base = if base.ends_with('/') {
        Url::parse(base)?
    } else {
        Url::parse(&format!("{base}/"))?
    };
    base.join(path.trim_start_matches('/')).map_err(Error::InvalidUrl)
}
