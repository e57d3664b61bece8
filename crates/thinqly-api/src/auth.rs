// Token lifecycle
//
// `Auth` is an immutable value: every refresh produces a NEW `Auth`
// rather than mutating in place, so stale snapshots referenced by
// in-flight requests stay internally consistent. The owning client
// decides which snapshot is "current".

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};
use sha1::Sha1;
use tracing::debug;
use url::Url;

use crate::device_info::DeviceInfo;
use crate::error::Error;
use crate::gateway::Gateway;
use crate::session::{Session, one_or_many};
use crate::transport::{LgedmClient, join_url};

/// Fixed shared secret for signing the refresh exchange.
const OAUTH_SECRET_KEY: &str = "c053c2a6ddeb7ad97cb0eed0dcb31cf8";
/// Fixed client key sent as `lgemp-x-app-key` on the refresh exchange.
const OAUTH_CLIENT_KEY: &str = "LGAO221A02";

type HmacSha1 = Hmac<Sha1>;

/// An access/refresh token pair bound to a [`Gateway`].
///
/// `access_token` is `None` until the first refresh when restoring from
/// a bare refresh token. The refresh token is never rotated by the
/// server; only the access token changes across refreshes.
#[derive(Debug, Clone)]
pub struct Auth {
    pub gateway: Gateway,
    pub access_token: Option<String>,
    pub refresh_token: String,
}

impl Auth {
    pub fn new(gateway: Gateway, access_token: Option<String>, refresh_token: String) -> Self {
        Self {
            gateway,
            access_token,
            refresh_token,
        }
    }

    /// Extract the token pair from the redirect URL the interactive
    /// login lands on. Fails if either token is absent.
    pub fn from_callback_url(gateway: Gateway, redirect_url: &str) -> Result<Self, Error> {
        let url = Url::parse(redirect_url)?;

        let mut access_token = None;
        let mut refresh_token = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "access_token" => access_token = Some(value.into_owned()),
                "refresh_token" => refresh_token = Some(value.into_owned()),
                _ => {}
            }
        }

        let missing = |name: &str| Error::Authentication {
            message: format!("redirect URL is missing `{name}`"),
        };
        Ok(Self {
            gateway,
            access_token: Some(access_token.ok_or_else(|| missing("access_token"))?),
            refresh_token: refresh_token.ok_or_else(|| missing("refresh_token"))?,
        })
    }

    /// base64(HMAC-SHA1(secret, message)) -- the signature scheme of the
    /// OAuth token service.
    pub fn oauth2_signature(message: &str, secret: &str) -> String {
        let mut mac =
            HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(message.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    /// Exchange the refresh token for a fresh access token.
    ///
    /// The request is a form-encoded POST signed over
    /// `"{path-with-query}\n{RFC-2822 UTC timestamp}"`. A body whose
    /// `status` is not 1 means the refresh token itself was rejected --
    /// that is [`Error::Token`], and only a new interactive login
    /// recovers from it.
    ///
    /// On success returns a new `Auth` carrying the new access token and
    /// the same refresh token.
    pub async fn refresh(&self, client: &LgedmClient) -> Result<Self, Error> {
        let token_url = join_url(&self.gateway.oauth_root, "oauth2/token")?;

        // One serialization feeds both the signed message and the body,
        // so percent-encoding can never disagree between the two.
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", &self.refresh_token)
            .finish();

        let timestamp = Utc::now().to_rfc2822();
        let signature =
            Self::oauth2_signature(&format!("/oauth2/token?{query}\n{timestamp}"), OAUTH_SECRET_KEY);

        let resp = client
            .http()
            .post(token_url)
            .header("lgemp-x-app-key", OAUTH_CLIENT_KEY)
            .header("lgemp-x-signature", signature)
            .header("lgemp-x-date", &timestamp)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(query)
            .send()
            .await
            .map_err(Error::Transport)?;

        let body: Value = resp.json().await.map_err(Error::Transport)?;
        if !status_is_success(body.get("status")) {
            return Err(Error::Token);
        }

        let access_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or(Error::Token)?
            .to_owned();

        debug!("access token refreshed");
        Ok(Self {
            gateway: self.gateway.clone(),
            access_token: Some(access_token),
            refresh_token: self.refresh_token.clone(),
        })
    }

    /// Exchange the access token for a server session.
    ///
    /// Returns the new [`Session`] together with the device list the
    /// login response carries (normalized singular-or-array).
    pub async fn start_session(
        &self,
        client: &LgedmClient,
    ) -> Result<(Session, Vec<DeviceInfo>), Error> {
        let access_token = self.access_token.as_deref().ok_or_else(|| {
            Error::Authentication {
                message: "no access token -- call refresh() first".into(),
            }
        })?;

        let url = join_url(&self.gateway.api_root, "member/login")?;
        let resp = client
            .post_envelope(
                url,
                json!({
                    "countryCode": self.gateway.country,
                    "langCode": self.gateway.language,
                    "loginType": "EMP",
                    "token": access_token,
                }),
                None,
                None,
            )
            .await?;

        let session_id = resp
            .get("jsessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Deserialization {
                message: "login response is missing `jsessionId`".into(),
                body: Value::Object(resp.clone()).to_string(),
            })?
            .to_owned();

        let devices = one_or_many(resp.get("items").cloned())
            .into_iter()
            .map(|item| {
                serde_json::from_value(item.clone()).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: item.to_string(),
                })
            })
            .collect::<Result<Vec<DeviceInfo>, Error>>()?;

        debug!(devices = devices.len(), "session started");
        Ok((Session::new(client.clone(), self.clone(), session_id), devices))
    }
}

/// The token service signals success as `status == 1`, but the field
/// shows up both as a number and as a string in the wild.
fn status_is_success(status: Option<&Value>) -> bool {
    match status {
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => s == "1",
        _ => false,
    }
}
