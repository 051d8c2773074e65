//! HTTP client for the hosting daemon's control API.
//!
//! Every request carries the daemon's expected user agent and HTTP basic
//! auth with an empty user name and the API password.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::dto::{ConsensusGet, HostGet, HostdbActiveGet, WalletGet, WalletSiacoinsPost};
use crate::domain::{
    Consensus, Hastings, HostEntry, HostSetting, HostSettings, Receipt, UnlockOutcome, WalletStatus,
};
use crate::error::{ConfigError, Result};
use crate::port::NodeApi;

/// User agent the daemon requires on every API call.
pub const USER_AGENT: &str = "Sia-Agent";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Marker the daemon returns when unlocking an unlocked wallet.
const ALREADY_UNLOCKED: &str = "wallet has already been unlocked";

pub struct SiadClient {
    http: HttpClient,
    /// Base URL without trailing slash, e.g. `http://localhost:9980`.
    base_url: String,
    api_password: String,
}

impl SiadClient {
    /// Create a client for the daemon listening on `host` (`address:port`).
    ///
    /// # Errors
    /// Returns a configuration error if `host` does not form a valid URL.
    pub fn new(host: &str, api_password: impl Into<String>) -> Result<Self> {
        let url = Url::parse(&format!("http://{host}"))
            .map_err(|e| ConfigError::invalid("root", "host", e.to_string()))?;

        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            base_url: url.as_str().trim_end_matches('/').to_string(),
            api_password: api_password.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .basic_auth("", Some(&self.api_password))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let response = self.request(Method::GET, path).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

/// Interpret the body of an unlock call.
#[must_use]
pub fn classify_unlock_response(body: &str) -> UnlockOutcome {
    if body.trim().is_empty() || body.contains(ALREADY_UNLOCKED) {
        UnlockOutcome::Success
    } else {
        UnlockOutcome::Failure
    }
}

#[async_trait]
impl NodeApi for SiadClient {
    async fn host_settings(&self) -> Result<HostSettings> {
        let body: HostGet = self.get_json("/host").await?;
        Ok(body.into())
    }

    async fn set_host_setting(&self, setting: HostSetting, value: Hastings) -> Result<()> {
        debug!(key = setting.key(), %value, "POST /host");
        self.request(Method::POST, "/host")
            .query(&[(setting.key(), value.to_string())])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn wallet_status(&self) -> Result<WalletStatus> {
        let body: WalletGet = self.get_json("/wallet").await?;
        Ok(body.into())
    }

    async fn consensus(&self) -> Result<Consensus> {
        let body: ConsensusGet = self.get_json("/consensus").await?;
        Ok(body.into())
    }

    async fn unlock_wallet(&self, password: &str) -> Result<UnlockOutcome> {
        // Failures come back as error statuses with a message body, so the
        // status is not checked here.
        let body = self
            .request(Method::POST, "/wallet/unlock")
            .query(&[("encryptionpassword", password)])
            .send()
            .await?
            .text()
            .await?;
        Ok(classify_unlock_response(&body))
    }

    async fn send_payment(&self, amount: Hastings, destination: &str) -> Result<Receipt> {
        debug!(%amount, destination, "POST /wallet/siacoins");
        let body: WalletSiacoinsPost = self
            .request(Method::POST, "/wallet/siacoins")
            .form(&[("amount", amount.to_string().as_str()), ("destination", destination)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.into())
    }

    async fn active_hosts(&self) -> Result<Vec<HostEntry>> {
        let body: HostdbActiveGet = self.get_json("/hostdb/active").await?;
        Ok(body.hosts.into_iter().map(HostEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::http::StubServer;

    #[test]
    fn base_url_is_built_from_host() {
        let client = SiadClient::new("localhost:9980", "secret").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9980");
    }

    #[test]
    fn invalid_host_is_a_config_error() {
        assert!(matches!(
            SiadClient::new("bad host:port", ""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn unlock_body_classification() {
        assert_eq!(classify_unlock_response(""), UnlockOutcome::Success);
        assert_eq!(
            classify_unlock_response(r#"{"message":"error when calling /wallet/unlock: wallet has already been unlocked"}"#),
            UnlockOutcome::Success
        );
        assert_eq!(
            classify_unlock_response(r#"{"message":"provided encryption key is incorrect"}"#),
            UnlockOutcome::Failure
        );
    }

    #[tokio::test]
    async fn requests_carry_agent_and_basic_auth() {
        let server = StubServer::start(vec![(
            200,
            r#"{"unlocked": true, "confirmedsiacoinbalance": "5"}"#.to_string(),
        )])
        .await;
        let client = SiadClient::new(&server.host(), "secret").unwrap();

        let status = client.wallet_status().await.unwrap();
        assert!(status.unlocked);
        assert_eq!(status.confirmed_balance, Hastings::new(5));

        let request = server.requests().await.remove(0);
        assert!(request.starts_with("GET /wallet "), "{request}");
        let lowered = request.to_ascii_lowercase();
        assert!(lowered.contains("user-agent: sia-agent"), "{request}");
        // base64(":secret")
        assert!(lowered.contains("authorization: basic onnly3jlda=="), "{request}");
    }

    #[tokio::test]
    async fn consensus_reports_coin_precision() {
        let server = StubServer::start(vec![(
            200,
            r#"{"synced": true, "height": 250000, "siacoinprecision": "1000000000000000000000000"}"#
                .to_string(),
        )])
        .await;
        let client = SiadClient::new(&server.host(), "").unwrap();

        let consensus = client.consensus().await.unwrap();
        assert_eq!(
            consensus.coin_precision,
            Hastings::new(crate::domain::money::HASTINGS_PER_SIACOIN)
        );

        let request = server.requests().await.remove(0);
        assert!(request.starts_with("GET /consensus "), "{request}");
    }

    #[tokio::test]
    async fn host_setting_is_sent_as_query() {
        let server = StubServer::start(vec![(200, String::new())]).await;
        let client = SiadClient::new(&server.host(), "").unwrap();

        client
            .set_host_setting(HostSetting::MinStoragePrice, Hastings::new(23_148_148_148))
            .await
            .unwrap();

        let request = server.requests().await.remove(0);
        assert!(
            request.starts_with("POST /host?minstorageprice=23148148148 "),
            "{request}"
        );
    }

    #[tokio::test]
    async fn unparseable_body_is_a_protocol_error() {
        let server = StubServer::start(vec![(200, "not json".to_string())]).await;
        let client = SiadClient::new(&server.host(), "").unwrap();

        let err = client.host_settings().await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)), "{err:?}");
    }

    #[tokio::test]
    async fn unreachable_daemon_is_a_transport_error() {
        let client = SiadClient::new("127.0.0.1:1", "").unwrap();
        let err = client.wallet_status().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn payment_posts_form_and_returns_receipt() {
        let server = StubServer::start(vec![(
            200,
            r#"{"transactionids": ["t1", "t2"]}"#.to_string(),
        )])
        .await;
        let client = SiadClient::new(&server.host(), "").unwrap();

        let receipt = client
            .send_payment(Hastings::new(1_000), "addr123")
            .await
            .unwrap();
        assert_eq!(receipt.transaction_ids, vec!["t1", "t2"]);

        let request = server.requests().await.remove(0);
        assert!(request.starts_with("POST /wallet/siacoins "), "{request}");
        assert!(request.contains("amount=1000&destination=addr123"), "{request}");
    }
}
