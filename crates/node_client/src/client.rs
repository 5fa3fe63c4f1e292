//! HTTP client for a single weave node

use crate::traits::LedgerClient;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;
use types::{Block, NetworkInfo, NodeError, Transaction};

/// Request timeout used by [`HttpLedgerClient::dial`]
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// User agent sent by [`HttpLedgerClient::dial`]
pub fn default_user_agent() -> String {
    format!("weave-transactor/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP client for a weave node's public API
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    base_url: Url,
    http_client: Client,
    timeout: Duration,
}

impl HttpLedgerClient {
    /// Dial a node with default timeout and user agent
    pub fn dial(url: &str) -> Result<Self, NodeError> {
        Self::dial_with(
            url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            &default_user_agent(),
        )
    }

    /// Dial a node. `url` must be a full `http` or `https` URL.
    pub fn dial_with(url: &str, request_timeout: Duration, user_agent: &str) -> Result<Self, NodeError> {
        let base_url =
            Url::parse(url).map_err(|e| NodeError::InvalidUrl(format!("{}: {}", url, e)))?;

        match base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(NodeError::InvalidUrl(format!(
                    "unsupported scheme '{}' in {}",
                    other, url
                )))
            }
        }

        let http_client = Client::builder()
            .timeout(request_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| NodeError::Request {
                endpoint: url.to_string(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        tracing::debug!(node = %base_url, "Dialed node");

        Ok(Self {
            base_url,
            http_client,
            timeout: request_timeout,
        })
    }

    /// Node base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the node's network information
    pub async fn network_info(&self) -> Result<NetworkInfo, NodeError> {
        self.get_json(&["info"]).await
    }

    /// Fetch a block by its independent hash
    pub async fn block_by_hash(&self, hash: &str) -> Result<Block, NodeError> {
        self.get_json(&["block", "hash", hash]).await
    }

    /// Fetch a block by height
    pub async fn block_by_height(&self, height: u64) -> Result<Block, NodeError> {
        let height = height.to_string();
        self.get_json(&["block", "height", &height]).await
    }

    /// Build the URL for an endpoint below the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, NodeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NodeError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, NodeError> {
        timeout(self.timeout, request.send())
            .await
            .map_err(|_| NodeError::Timeout {
                endpoint: endpoint.to_string(),
            })?
            .map_err(|e| {
                if e.is_timeout() {
                    NodeError::Timeout {
                        endpoint: endpoint.to_string(),
                    }
                } else {
                    NodeError::Request {
                        endpoint: endpoint.to_string(),
                        message: e.to_string(),
                    }
                }
            })
    }

    async fn read_text(response: Response, endpoint: &str) -> Result<String, NodeError> {
        response.text().await.map_err(|e| NodeError::InvalidResponse {
            endpoint: endpoint.to_string(),
            message: format!("error reading response body: {}", e),
        })
    }

    async fn get_text(&self, segments: &[&str]) -> Result<String, NodeError> {
        let url = self.endpoint(segments)?;
        let endpoint = url.path().to_string();

        tracing::debug!(endpoint = %endpoint, "Querying node");

        let response = self.send(self.http_client.get(url), &endpoint).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(NodeError::NotFound { resource: endpoint });
        }
        if !status.is_success() {
            return Err(NodeError::HttpError {
                endpoint,
                status: status.as_u16(),
            });
        }

        Self::read_text(response, &endpoint).await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, NodeError> {
        let raw_text = self.get_text(segments).await?;
        serde_json::from_str(&raw_text).map_err(|e| NodeError::InvalidResponse {
            endpoint: format!("/{}", segments.join("/")),
            message: format!("invalid JSON response: {} | raw: {}", e, raw_text),
        })
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn tx_anchor(&self) -> Result<String, NodeError> {
        let anchor = self.get_text(&["tx_anchor"]).await?;
        Ok(anchor.trim().to_string())
    }

    async fn last_transaction(&self, address: &str) -> Result<String, NodeError> {
        let last_tx = self.get_text(&["wallet", address, "last_tx"]).await?;
        Ok(last_tx.trim().to_string())
    }

    async fn price(&self, data_size: u64, target: &str) -> Result<String, NodeError> {
        let size = data_size.to_string();
        let price = if target.is_empty() {
            self.get_text(&["price", &size]).await?
        } else {
            self.get_text(&["price", &size, target]).await?
        };
        Ok(price.trim().to_string())
    }

    async fn commit(&self, data: &[u8]) -> Result<String, NodeError> {
        let url = self.endpoint(&["tx"])?;
        let endpoint = url.path().to_string();

        tracing::info!(node = %self.base_url, bytes = data.len(), "Submitting transaction");

        let request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(data.to_vec());
        let response = self.send(request, &endpoint).await?;
        let status = response.status();
        let body = Self::read_text(response, &endpoint).await?;

        if !status.is_success() {
            return Err(NodeError::Rejected {
                endpoint,
                status: status.as_u16(),
                reason: body,
            });
        }

        Ok(body)
    }

    async fn get_transaction(&self, tx_id: &str) -> Result<Option<Transaction>, NodeError> {
        let url = self.endpoint(&["tx", tx_id])?;
        let endpoint = url.path().to_string();

        let response = self.send(self.http_client.get(url), &endpoint).await?;
        let status = response.status();

        match status {
            StatusCode::ACCEPTED => Ok(None),
            StatusCode::NOT_FOUND => Err(NodeError::NotFound {
                resource: format!("transaction {}", tx_id),
            }),
            s if s.is_success() => {
                let raw_text = Self::read_text(response, &endpoint).await?;
                if raw_text.trim() == "Pending" {
                    return Ok(None);
                }
                let tx: Transaction =
                    serde_json::from_str(&raw_text).map_err(|e| NodeError::InvalidResponse {
                        endpoint: endpoint.clone(),
                        message: format!("invalid transaction: {} | raw: {}", e, raw_text),
                    })?;
                Ok(Some(tx))
            }
            s => Err(NodeError::HttpError {
                endpoint,
                status: s.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_tx_anchor() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tx_anchor"))
            .respond_with(ResponseTemplate::new(200).set_body_string("anchor-xyz\n"))
            .mount(&mock_server)
            .await;

        let client = HttpLedgerClient::dial(&mock_server.uri()).unwrap();
        assert_eq!(client.tx_anchor().await.unwrap(), "anchor-xyz");
    }

    #[tokio::test]
    async fn test_price_with_and_without_target() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/price/5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1200"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/price/5/target-addr"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1300"))
            .mount(&mock_server)
            .await;

        let client = HttpLedgerClient::dial(&mock_server.uri()).unwrap();
        assert_eq!(client.price(5, "").await.unwrap(), "1200");
        assert_eq!(client.price(5, "target-addr").await.unwrap(), "1300");
    }

    #[tokio::test]
    async fn test_last_transaction() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wallet/addr-1/last_tx"))
            .respond_with(ResponseTemplate::new(200).set_body_string("prev-tx"))
            .mount(&mock_server)
            .await;

        let client = HttpLedgerClient::dial(&mock_server.uri()).unwrap();
        assert_eq!(client.last_transaction("addr-1").await.unwrap(), "prev-tx");
    }

    #[tokio::test]
    async fn test_commit_posts_json() {
        let mock_server = MockServer::start().await;

        let mut tx = Transaction::new("anchor", vec![1, 2, 3], "10", "", Vec::new(), "5");
        tx.set_signature(vec![7; 16]);
        let wire = tx.to_wire().unwrap();
        let expected: serde_json::Value = serde_json::from_slice(&wire).unwrap();

        Mock::given(method("POST"))
            .and(path("/tx"))
            .and(header("content-type", "application/json"))
            .and(body_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpLedgerClient::dial(&mock_server.uri()).unwrap();
        assert_eq!(client.commit(&wire).await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_commit_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tx"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Transaction verification failed."))
            .mount(&mock_server)
            .await;

        let client = HttpLedgerClient::dial(&mock_server.uri()).unwrap();
        let err = client.commit(b"{}").await.unwrap_err();
        match err {
            NodeError::Rejected { status, reason, .. } => {
                assert_eq!(status, 400);
                assert!(reason.contains("verification failed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_transaction_states() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tx/mined"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "mined",
                "last_tx": "anchor",
                "owner": "AQID",
                "target": "",
                "quantity": "0",
                "data": "",
                "reward": "10",
                "signature": "BwcH"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tx/pending"))
            .respond_with(ResponseTemplate::new(202).set_body_string("Pending"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tx/unknown"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let client = HttpLedgerClient::dial(&mock_server.uri()).unwrap();

        let mined = client.get_transaction("mined").await.unwrap().unwrap();
        assert_eq!(mined.hash(), "mined");
        assert_eq!(mined.fee(), "10");

        assert!(client.get_transaction("pending").await.unwrap().is_none());

        let err = client.get_transaction("unknown").await.unwrap_err();
        assert!(matches!(err, NodeError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_network_info() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "network": "arweave.N.1",
                "version": 5,
                "release": 43,
                "height": 100,
                "current": "cur",
                "blocks": 101,
                "peers": 12,
                "queue_length": 0,
                "node_state_latency": 1
            })))
            .mount(&mock_server)
            .await;

        let client = HttpLedgerClient::dial(&mock_server.uri()).unwrap();
        let info = client.network_info().await.unwrap();
        assert_eq!(info.network, "arweave.N.1");
        assert_eq!(info.height, 100);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tx_anchor"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = HttpLedgerClient::dial(&mock_server.uri()).unwrap();
        let err = client.tx_anchor().await.unwrap_err();
        assert!(matches!(err, NodeError::HttpError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tx_anchor"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client =
            HttpLedgerClient::dial_with(&mock_server.uri(), Duration::from_millis(100), "test")
                .unwrap();
        let err = client.tx_anchor().await.unwrap_err();
        assert!(matches!(err, NodeError::Timeout { .. }));
    }

    #[test]
    fn test_dial_rejects_bad_urls() {
        assert!(matches!(
            HttpLedgerClient::dial("not a url"),
            Err(NodeError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpLedgerClient::dial("ftp://node.example"),
            Err(NodeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = HttpLedgerClient::dial("https://gateway.example/node/").unwrap();
        let url = client.endpoint(&["tx", "abc"]).unwrap();
        assert_eq!(url.as_str(), "https://gateway.example/node/tx/abc");
    }
}
