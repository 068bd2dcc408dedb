//! Payment gateway client.
//!
//! Wraps the external payment processor's transfer API. Transfers are
//! asynchronous: a successful call only means a transfer was accepted; the
//! final outcome arrives later on the transfer-status webhook.

use std::time::Duration;

use async_trait::async_trait;
use clipcommerce_common::config::PaymentsConfig;
use clipcommerce_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// A transfer request to the payment gateway.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTransfer {
    /// Amount in minor currency units (cents).
    pub amount_minor: i64,
    /// ISO currency code.
    pub currency: String,
    /// Destination payout account at the gateway.
    pub destination_account_id: String,
    /// Grouping key for reconciliation, derived from the submission ID.
    pub transfer_group: String,
    /// Free-form metadata attached to the transfer.
    pub metadata: serde_json::Value,
}

/// Handle to an accepted transfer.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferHandle {
    /// Transfer ID issued by the gateway; webhook callbacks carry this.
    pub transfer_id: String,
}

/// Payment gateway operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a funds transfer to a payout account.
    ///
    /// A timeout or ambiguous outcome must surface as a retryable
    /// dependency failure; callers treat it as "unknown outcome" and defer
    /// to the webhook rather than assuming the transfer happened.
    async fn create_transfer(&self, request: CreateTransfer) -> AppResult<TransferHandle>;
}

/// HTTP implementation of [`PaymentGateway`].
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    /// Create a gateway client from configuration.
    pub fn new(config: &PaymentsConfig) -> AppResult<Self> {
        let base = Url::parse(&config.gateway_url)
            .map_err(|e| AppError::Config(format!("invalid payment gateway url: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TransferResponse {
    id: String,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_transfer(&self, request: CreateTransfer) -> AppResult<TransferHandle> {
        let url = format!("{}/v1/transfers", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Dependency("transfer request timed out; outcome unknown".to_string())
                } else {
                    AppError::Dependency(format!("transfer request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(AppError::Dependency(format!(
                "transfer request returned {}",
                response.status()
            )));
        }

        let body = response
            .json::<TransferResponse>()
            .await
            .map_err(|e| AppError::Dependency(format!("invalid transfer response: {e}")))?;

        Ok(TransferHandle {
            transfer_id: body.id,
        })
    }
}
