//! Quote data and wire format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Message used whenever the service gives no usable error text
pub const FALLBACK_ERROR: &str = "Failed to fetch conversion rate";

/// Lifecycle of the displayed quote
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum QuoteStatus {
    /// Nothing requested, or the amount was empty / non-positive
    #[default]
    Idle,
    Pending,
    Ready,
    Failed(String),
}

/// Conversion estimate for one source amount
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Tag of the request this state belongs to
    pub request_id: u64,
    /// Amount the request was issued for
    pub amount: String,
    pub from_amount: String,
    pub to_amount: String,
    pub rate: String,
    pub gas_estimate: String,
    pub eth_price_usd: Option<String>,
    pub xlm_price_usd: Option<String>,
    pub source: Option<String>,
    pub status: QuoteStatus,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Quote {
    pub fn is_loading(&self) -> bool {
        self.status == QuoteStatus::Pending
    }

    pub fn is_ready(&self) -> bool {
        self.status == QuoteStatus::Ready
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            QuoteStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// True when no figures are populated
    pub fn is_empty(&self) -> bool {
        self.from_amount.is_empty()
            && self.to_amount.is_empty()
            && self.rate.is_empty()
            && self.gas_estimate.is_empty()
            && self.eth_price_usd.is_none()
            && self.xlm_price_usd.is_none()
            && self.source.is_none()
    }

    /// Drop all figures, keeping the request tag
    pub(crate) fn clear_figures(&mut self) {
        let request_id = self.request_id;
        let amount = std::mem::take(&mut self.amount);
        *self = Quote {
            request_id,
            amount,
            ..Quote::default()
        };
    }

    pub(crate) fn apply(&mut self, data: QuoteData) {
        self.from_amount = data.from_amount;
        self.to_amount = data.to_amount;
        self.rate = data.rate;
        self.gas_estimate = data.gas_estimate;
        self.eth_price_usd = data.eth_price_usd;
        self.xlm_price_usd = data.xlm_price_usd;
        self.source = data.source;
        self.status = QuoteStatus::Ready;
        self.fetched_at = Some(Utc::now());
    }
}

/// Quote figures as returned by the quote service.
///
/// Numeric fields arrive as JSON numbers or strings and are kept as display
/// strings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    #[serde(deserialize_with = "string_or_number")]
    pub from_amount: String,
    #[serde(deserialize_with = "string_or_number")]
    pub to_amount: String,
    #[serde(deserialize_with = "string_or_number")]
    pub rate: String,
    #[serde(deserialize_with = "string_or_number")]
    pub gas_estimate: String,
    #[serde(
        rename = "ethPriceUSD",
        default,
        deserialize_with = "opt_string_or_number"
    )]
    pub eth_price_usd: Option<String>,
    #[serde(
        rename = "xlmPriceUSD",
        default,
        deserialize_with = "opt_string_or_number"
    )]
    pub xlm_price_usd: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Body of a quote response: `{"data": {...}}`, `{"error": "..."}` or the
/// figures inline.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum QuoteEnvelope {
    Error { error: String },
    Wrapped { data: QuoteData },
    Flat(QuoteData),
}

/// Failure of a single quote lookup
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quote service returned {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("Quote service error: {0}")]
    Service(String),
    #[error("Quote request failed: {0}")]
    Transport(String),
    #[error("Failed to parse quote response: {0}")]
    Parse(String),
}

impl QuoteError {
    /// Text shown to the user in the failed quote state
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(msg), ..
            } if !msg.is_empty() => msg.clone(),
            Self::Service(msg) if !msg.is_empty() => msg.clone(),
            _ => FALLBACK_ERROR.to_string(),
        }
    }
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    value_to_string(value).ok_or_else(|| serde::de::Error::custom("expected string or number"))
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_string(value))
}
