use crate::orders::error::{OrderClientError, OrderClientResult};
use crate::orders::types::Order;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Read-side collaborator for the authoritative order record. The poller
/// talks to this seam only; no business logic lives behind it.
#[async_trait]
pub trait OrderStatusClient: Send + Sync {
    async fn fetch_order(&self, order_id: &str) -> OrderClientResult<Order>;
}

#[derive(Debug, Clone)]
pub struct OrderApiConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OrderApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bearer_token: None,
            timeout_secs: 10,
        }
    }
}

impl OrderApiConfig {
    pub fn from_env() -> OrderClientResult<Self> {
        let base_url =
            std::env::var("ORDER_API_BASE_URL").map_err(|_| OrderClientError::Api {
                message: "ORDER_API_BASE_URL environment variable is required".to_string(),
            })?;

        Ok(Self {
            base_url,
            bearer_token: std::env::var("ORDER_API_TOKEN").ok(),
            timeout_secs: std::env::var("ORDER_API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        })
    }
}

/// Envelope returned by `GET /orders/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct OrderEnvelope {
    pub success: bool,
    #[serde(default)]
    pub order: Option<Order>,
    #[serde(default)]
    pub error: Option<String>,
}

pub(crate) fn order_from_envelope(envelope: OrderEnvelope) -> OrderClientResult<Order> {
    if !envelope.success {
        return Err(OrderClientError::Api {
            message: envelope
                .error
                .unwrap_or_else(|| "order lookup failed".to_string()),
        });
    }
    envelope.order.ok_or(OrderClientError::InvalidResponse {
        message: "missing order document in successful envelope".to_string(),
    })
}

/// HTTP implementation of the order-status query.
///
/// No retries here: the poller owns the attempt budget and inter-attempt
/// spacing, so each `fetch_order` is exactly one request on the wire.
pub struct HttpOrderStatusClient {
    config: OrderApiConfig,
    client: reqwest::Client,
}

impl HttpOrderStatusClient {
    pub fn new(config: OrderApiConfig) -> OrderClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OrderClientError::Network {
                message: format!("failed to initialize HTTP client: {}", e),
            })?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> OrderClientResult<Self> {
        Self::new(OrderApiConfig::from_env()?)
    }

    fn endpoint(&self, order_id: &str) -> String {
        format!(
            "{}/orders/{}",
            self.config.base_url.trim_end_matches('/'),
            order_id
        )
    }
}

#[async_trait]
impl OrderStatusClient for HttpOrderStatusClient {
    async fn fetch_order(&self, order_id: &str) -> OrderClientResult<Order> {
        let request_id = Uuid::new_v4();
        let mut request = self
            .client
            .get(self.endpoint(order_id))
            .header("X-Request-Id", request_id.to_string());

        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OrderClientError::Network {
                message: format!("order status request failed: {}", e),
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(OrderClientError::Api {
                message: format!("HTTP {}: {}", status, text),
            });
        }

        let envelope: OrderEnvelope =
            serde_json::from_str(&text).map_err(|e| OrderClientError::InvalidResponse {
                message: format!("invalid order JSON response: {}", e),
            })?;

        let order = order_from_envelope(envelope)?;
        info!(
            order_id = %order_id,
            request_id = %request_id,
            status = %order.status,
            "order status fetched"
        );
        Ok(order)
    }
}
