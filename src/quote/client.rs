//! Quote service client
//!
//! The quote service is an opaque HTTP endpoint (by default the local
//! `/api/1inch/quote` proxy) answering `GET ?amount=<amount>`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{QuoteData, QuoteEnvelope, QuoteError};
use crate::config::SwapConfig;

/// Anything that can price an amount
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn quote(&self, amount: &str) -> Result<QuoteData, QuoteError>;
}

/// Quote source backed by the HTTP quote proxy
pub struct HttpQuoteSource {
    client: Client,
    url: String,
}

impl HttpQuoteSource {
    pub fn new(config: &SwapConfig) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: config.quote_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn quote(&self, amount: &str) -> Result<QuoteData, QuoteError> {
        debug!("Requesting quote: amount={} url={}", amount, self.url);

        let response = self
            .client
            .get(&self.url)
            .query(&[("amount", amount)])
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        if !status.is_success() {
            // Proxies usually explain themselves in an `error` field
            let message = match serde_json::from_str::<QuoteEnvelope>(&body) {
                Ok(QuoteEnvelope::Error { error }) => Some(error),
                _ => None,
            };
            warn!("Quote service returned {} for amount={}", status, amount);
            return Err(QuoteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<QuoteEnvelope>(&body) {
            Ok(QuoteEnvelope::Error { error }) => Err(QuoteError::Service(error)),
            Ok(QuoteEnvelope::Wrapped { data }) | Ok(QuoteEnvelope::Flat(data)) => Ok(data),
            Err(e) => Err(QuoteError::Parse(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn source_for(server: &MockServer) -> HttpQuoteSource {
        let config = SwapConfig {
            quote_api_base: server.base_url(),
            ..SwapConfig::defaults()
        };
        HttpQuoteSource::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_quote_success() {
        let server = MockServer::start_async().await;

        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/1inch/quote")
                    .query_param("amount", "1.5");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(
                        r#"{"data": {"fromAmount": "1.5", "toAmount": "41234.12",
                        "rate": "27489.41", "gasEstimate": 0.0021,
                        "ethPriceUSD": 3400.5, "xlmPriceUSD": 0.1237, "source": "1inch"}}"#,
                    );
            })
            .await;

        let data = source_for(&server).quote("1.5").await.unwrap();
        mock.assert_async().await;
        assert_eq!(data.to_amount, "41234.12");
        assert_eq!(data.gas_estimate, "0.0021");
        assert_eq!(data.source.as_deref(), Some("1inch"));
    }

    #[tokio::test]
    async fn test_quote_service_error_payload() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/1inch/quote");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"error": "rate unavailable"}"#);
            })
            .await;

        let err = source_for(&server).quote("2").await.unwrap_err();
        assert!(matches!(err, QuoteError::Service(ref m) if m == "rate unavailable"));
        assert_eq!(err.user_message(), "rate unavailable");
    }

    #[tokio::test]
    async fn test_quote_server_error_uses_fallback() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/1inch/quote");
                then.status(500).body("internal error");
            })
            .await;

        let err = source_for(&server).quote("2").await.unwrap_err();
        assert!(matches!(err, QuoteError::Status { status: 500, .. }));
        assert_eq!(err.user_message(), "Failed to fetch conversion rate");
    }

    #[tokio::test]
    async fn test_quote_server_error_with_message() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/1inch/quote");
                then.status(429)
                    .header("content-type", "application/json")
                    .body(r#"{"error": "too many requests"}"#);
            })
            .await;

        let err = source_for(&server).quote("2").await.unwrap_err();
        assert_eq!(err.user_message(), "too many requests");
    }

    #[tokio::test]
    async fn test_quote_invalid_json() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/1inch/quote");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("not valid json");
            })
            .await;

        let err = source_for(&server).quote("2").await.unwrap_err();
        assert!(matches!(err, QuoteError::Parse(_)));
        assert_eq!(err.user_message(), "Failed to fetch conversion rate");
    }

    #[tokio::test]
    async fn test_quote_connection_error() {
        let config = SwapConfig {
            quote_api_base: "http://127.0.0.1:65534".to_string(),
            request_timeout_secs: 2,
            ..SwapConfig::defaults()
        };
        let source = HttpQuoteSource::new(&config).unwrap();

        let err = source.quote("1").await.unwrap_err();
        assert!(matches!(err, QuoteError::Transport(_)));
    }
}
