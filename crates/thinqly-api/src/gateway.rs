// Region gateway discovery
//
// One fixed discovery endpoint resolves a country/language pair to the
// three per-region base URLs everything else talks to. The login-page
// URL is a pure derivation from the discovered endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{LgedmClient, join_url};

/// Fixed discovery endpoint, identical for every region.
pub const GATEWAY_URL: &str = "https://kic.lgthinq.com:46030/api/common/gatewayUriList";

/// Fixed service code embedded in the interactive login URL.
const SVC_CODE: &str = "SVC202";
/// Fixed OAuth client identifier embedded in the interactive login URL.
const CLIENT_ID: &str = "LGAO221A02";

/// Default account country.
pub const DEFAULT_COUNTRY: &str = "US";
/// Default account language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// The per-region API endpoints, resolved once via [`Gateway::discover`]
/// or restored from persisted state. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    /// Base URL of the interactive login (EMP) service.
    pub auth_base: String,
    /// Root of the device API; all session RPCs resolve against this.
    pub api_root: String,
    /// Root of the OAuth token service used by the refresh exchange.
    pub oauth_root: String,
    pub country: String,
    pub language: String,
}

impl Gateway {
    /// Resolve the endpoint triple for a country/language pair.
    pub async fn discover(
        client: &LgedmClient,
        country: &str,
        language: &str,
    ) -> Result<Self, Error> {
        Self::discover_at(client, GATEWAY_URL, country, language).await
    }

    /// Like [`discover`](Self::discover), against an explicit discovery
    /// endpoint (tests point this at a local mock).
    pub async fn discover_at(
        client: &LgedmClient,
        discovery_url: &str,
        country: &str,
        language: &str,
    ) -> Result<Self, Error> {
        let url = Url::parse(discovery_url)?;
        let info = client
            .post_envelope(
                url,
                json!({ "countryCode": country, "langCode": language }),
                None,
                None,
            )
            .await?;

        let field = |name: &str| -> Result<String, Error> {
            info.get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| Error::Deserialization {
                    message: format!("gateway response is missing `{name}`"),
                    body: Value::Object(info.clone()).to_string(),
                })
        };

        let gateway = Self {
            auth_base: field("empUri")?,
            api_root: field("thinqUri")?,
            oauth_root: field("oauthUri")?,
            country: country.to_owned(),
            language: language.to_owned(),
        };
        debug!(api_root = %gateway.api_root, "gateway discovered");
        Ok(gateway)
    }

    /// The interactive login page URL. Pure derivation -- no network call.
    ///
    /// The user completes the login in a browser; the browser is then
    /// redirected to a URL whose query string carries the token pair
    /// (see [`Auth::from_callback_url`](crate::auth::Auth::from_callback_url)).
    pub fn oauth_url(&self) -> Result<Url, Error> {
        let mut url = join_url(&self.auth_base, "login/sign_in")?;
        url.query_pairs_mut()
            .append_pair("country", &self.country)
            .append_pair("language", &self.language)
            .append_pair("svcCode", SVC_CODE)
            .append_pair("authSvr", "oauth2")
            .append_pair("client_id", CLIENT_ID)
            .append_pair("division", "ha")
            .append_pair("grant_type", "password");
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway() -> Gateway {
        Gateway {
            auth_base: "https://us.m.lgaccount.com/".into(),
            api_root: "https://us.lgthinq.com:46030/api".into(),
            oauth_root: "https://us.lgeapi.com/".into(),
            country: "US".into(),
            language: "en-US".into(),
        }
    }

    #[test]
    fn oauth_url_embeds_fixed_service_parameters() {
        let url = gateway().oauth_url().unwrap();
        assert!(url.as_str().starts_with("https://us.m.lgaccount.com/login/sign_in?"));

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("country".into(), "US".into())));
        assert!(pairs.contains(&("svcCode".into(), SVC_CODE.into())));
        assert!(pairs.contains(&("client_id".into(), CLIENT_ID.into())));
        assert!(pairs.contains(&("grant_type".into(), "password".into())));
    }
}
