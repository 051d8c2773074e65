//! HTTP client for the siastats host ranking API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::dto::{HostDetail, ListedHost};
use crate::domain::HostRank;
use crate::error::Result;
use crate::port::RankingSource;

pub const DEFAULT_BASE_URL: &str = "https://siastats.info:3510";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct SiastatsClient {
    http: HttpClient,
    base_url: String,
}

impl SiastatsClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at another deployment of the API.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// All active hosts known to siastats.
    pub async fn active_hosts(&self) -> Result<Vec<ListedHost>> {
        let url = format!("{}/hosts-api/allhosts", self.base_url);
        debug!(url = %url, "Fetching active host listing");

        let hosts: Vec<ListedHost> = self
            .http
            .post(&url)
            .form(&[("network", "sia"), ("list", "active")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(count = hosts.len(), "Fetched host listing");
        Ok(hosts)
    }

    pub async fn host_detail(&self, id: &str) -> Result<HostDetail> {
        let url = format!("{}/hosts-api/host/{}", self.base_url, id);
        Ok(self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

impl Default for SiastatsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RankingSource for SiastatsClient {
    async fn rank_and_price(&self, net_address: &str) -> Result<Option<HostRank>> {
        let hosts = self.active_hosts().await?;
        let Some(listed) = hosts.into_iter().find(|host| host.current_ip == net_address) else {
            return Ok(None);
        };

        let detail = self.host_detail(&listed.id.to_string()).await?;
        Ok(Some(HostRank {
            rank: detail.rank,
            price: detail.storage_price,
        }))
    }

    fn source_name(&self) -> &'static str {
        "siastats"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::http::StubServer;

    #[tokio::test]
    async fn looks_up_own_host_by_address() {
        let server = StubServer::start(vec![
            (
                200,
                r#"[{"Id": 7, "CurrentIp": "other:9982"}, {"Id": 9, "CurrentIp": "me:9982"}]"#.into(),
            ),
            (200, r#"{"rank": 12, "storagePrice": 99.5}"#.into()),
        ])
        .await;
        let client = SiastatsClient::with_base_url(server.url());

        let rank = client.rank_and_price("me:9982").await.unwrap().unwrap();
        assert_eq!(rank.rank, 12);
        assert_eq!(rank.price, 99.5);

        let requests = server.requests().await;
        assert!(requests[0].starts_with("POST /hosts-api/allhosts "));
        assert!(requests[0].contains("network=sia&list=active"));
        assert!(requests[1].starts_with("GET /hosts-api/host/9 "));
    }

    #[tokio::test]
    async fn unlisted_host_has_no_rank() {
        let server =
            StubServer::start(vec![(200, r#"[{"Id": 7, "CurrentIp": "other:9982"}]"#.into())]).await;
        let client = SiastatsClient::with_base_url(server.url());

        assert_eq!(client.rank_and_price("me:9982").await.unwrap(), None);
        assert_eq!(server.requests().await.len(), 1);
    }
}
