//! HTTP implementation of the retrieval gateway

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::query::RetrievalRequest;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{GatewayResult, RetrievalError, RetrievalGateway, RetrievalResponse};

/// Longest engine error body kept for logging
const MAX_ERROR_BODY: usize = 512;

/// Retrieval gateway speaking the engine's HTTP wire contract:
/// `GET <engine_url>?q=&page=&limit=&<group>=<value>...`
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    engine_url: String,
}

impl HttpGateway {
    /// Create a new gateway. The configured timeout applies per request;
    /// a timeout surfaces as a transport failure.
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            engine_url: config.engine_url.clone(),
        })
    }
}

#[async_trait]
impl RetrievalGateway for HttpGateway {
    async fn retrieve(&self, request: &RetrievalRequest) -> GatewayResult<RetrievalResponse> {
        let pairs = request.query_pairs();

        let response = self
            .client
            .get(&self.engine_url)
            .query(&pairs)
            .send()
            .await
            .map_err(|e| {
                warn!(engine_url = %self.engine_url, error = %e, "Retrieval transport failure");
                RetrievalError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut detail = response.text().await.unwrap_or_default();
            detail.truncate(MAX_ERROR_BODY);
            warn!(
                engine_url = %self.engine_url,
                status = status.as_u16(),
                "Retrieval engine rejected request"
            );
            return Err(RetrievalError::Engine {
                status: status.as_u16(),
                detail,
            });
        }

        let decoded: RetrievalResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Decode(e.to_string()))?;

        debug!(
            page = request.page,
            records = decoded.payments.len(),
            total_pages = decoded.total_pages,
            "Retrieval succeeded"
        );

        Ok(decoded)
    }
}
