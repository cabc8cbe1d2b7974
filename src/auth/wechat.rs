/**
 * WeChat Code Exchange
 *
 * Exchanges the login code produced by the WeChat client SDK for an access
 * token and openid via `GET /sns/oauth2/access_token`. The provider signals
 * failure in-band: a JSON body carrying a non-zero `errcode` instead of the
 * token fields.
 *
 * The base URL is injectable so tests can point the client at a local mock
 * server instead of api.weixin.qq.com.
 */

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

const WECHAT_API_BASE: &str = "https://api.weixin.qq.com";

/// Authorization material returned by a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WechatSession {
    /// Application-scoped user identifier; the stable key users are
    /// upserted by.
    pub open_id: String,
    /// Cross-application identifier, when the provider supplies one.
    pub union_id: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
    /// Instant the access token stops working.
    pub expires_at: DateTime<Utc>,
    pub scopes: Vec<String>,
}

impl WechatSession {
    /// Whether the access token has already expired.
    pub fn has_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Build a session from the provider's reply body.
    ///
    /// The provider reports errors with 200 responses carrying an
    /// `errcode`, so this is where invalid codes are detected.
    pub fn from_provider_json(body: &serde_json::Value) -> Result<Self, ApiError> {
        if let Some(errcode) = body.get("errcode").and_then(|v| v.as_i64()) {
            if errcode != 0 {
                let errmsg = body
                    .get("errmsg")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown provider error");
                tracing::warn!("wechat code exchange rejected: {errcode} {errmsg}");
                return Err(ApiError::invalid_input("invalid wechat code"));
            }
        }

        let field = |name: &str| {
            body.get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    ApiError::upstream(format!("wechat reply missing field `{name}`"))
                })
        };

        let expires_in = body
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| ApiError::upstream("wechat reply missing field `expires_in`"))?;

        Ok(Self {
            open_id: field("openid")?,
            union_id: body
                .get("unionid")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            access_token: field("access_token")?,
            refresh_token: field("refresh_token")?,
            expires_at: Utc::now() + Duration::seconds(expires_in),
            scopes: field("scope")?.split(',').map(str::to_string).collect(),
        })
    }
}

/// HTTP client for the WeChat OAuth endpoints.
pub struct WechatClient {
    http: reqwest::Client,
    app_id: String,
    app_secret: String,
    base_url: String,
}

impl WechatClient {
    pub fn new(app_id: String, app_secret: String) -> Self {
        Self::with_base_url(app_id, app_secret, WECHAT_API_BASE.to_string())
    }

    /// Client against a non-default endpoint (tests).
    pub fn with_base_url(app_id: String, app_secret: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            app_id,
            app_secret,
            base_url,
        }
    }

    /// Exchange a login code for a [`WechatSession`].
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - the provider rejected the code
    /// * `Upstream` - the provider was unreachable or replied garbage
    pub async fn exchange_code(&self, code: &str) -> Result<WechatSession, ApiError> {
        let url = format!(
            "{}/sns/oauth2/access_token?appid={}&secret={}&code={}&grant_type=authorization_code",
            self.base_url, self.app_id, self.app_secret, code
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::upstream(format!("wechat request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::upstream(format!(
                "wechat replied with status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::upstream(format!("wechat reply was not JSON: {e}")))?;

        WechatSession::from_provider_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_reply() -> serde_json::Value {
        serde_json::json!({
            "access_token": "ACCESS",
            "expires_in": 7200,
            "refresh_token": "REFRESH",
            "openid": "OPENID",
            "scope": "snsapi_login,snsapi_userinfo",
            "unionid": "UNIONID",
        })
    }

    #[test]
    fn test_parse_success_reply() {
        let session = WechatSession::from_provider_json(&token_reply()).unwrap();
        assert_eq!(session.open_id, "OPENID");
        assert_eq!(session.union_id.as_deref(), Some("UNIONID"));
        assert_eq!(session.access_token, "ACCESS");
        assert_eq!(session.refresh_token, "REFRESH");
        assert_eq!(session.scopes, vec!["snsapi_login", "snsapi_userinfo"]);
        assert!(!session.has_expired());
    }

    #[test]
    fn test_parse_error_reply() {
        let body = serde_json::json!({"errcode": 40029, "errmsg": "invalid code"});
        assert_matches!(
            WechatSession::from_provider_json(&body),
            Err(ApiError::InvalidInput(_))
        );
    }

    #[test]
    fn test_parse_truncated_reply() {
        let body = serde_json::json!({"access_token": "ACCESS"});
        assert_matches!(
            WechatSession::from_provider_json(&body),
            Err(ApiError::Upstream(_))
        );
    }

    #[tokio::test]
    async fn test_exchange_code_against_mock_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sns/oauth2/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_reply()))
            .mount(&server)
            .await;

        let client =
            WechatClient::with_base_url("appid".into(), "secret".into(), server.uri());
        let session = client.exchange_code("some-code").await.unwrap();
        assert_eq!(session.open_id, "OPENID");
    }

    #[tokio::test]
    async fn test_exchange_code_provider_5xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client =
            WechatClient::with_base_url("appid".into(), "secret".into(), server.uri());
        assert_matches!(
            client.exchange_code("some-code").await,
            Err(ApiError::Upstream(_))
        );
    }
}
