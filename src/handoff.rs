//! Wizard → progress page handoff
//!
//! Only the swap direction crosses this boundary, as a URL-encoded query value.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::wizard::step::SwapDirection;

/// Characters left alone by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const DEFAULT_PROGRESS_PATH: &str = "/swap-typeform/progress";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handoff {
    /// Direction label as answered, e.g. "ETH → XLM"
    pub direction: String,
}

impl Handoff {
    pub fn new(direction: impl Into<String>) -> Self {
        Self {
            direction: direction.into(),
        }
    }

    /// `direction=<encoded>`
    pub fn query(&self) -> String {
        format!("direction={}", encode_component(&self.direction))
    }

    pub fn path(&self, progress_path: &str) -> String {
        format!("{}?{}", progress_path, self.query())
    }

    /// Read the handoff back from a query string (with or without a leading
    /// `?` or path). A missing direction falls back to ETH → XLM.
    pub fn from_query(query: &str) -> Self {
        let query = query.split_once('?').map(|(_, q)| q).unwrap_or(query);

        let direction = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "direction")
            .map(|(_, value)| decode_component(value))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| SwapDirection::EthToXlm.label().to_string());

        Self { direction }
    }

    pub fn swap_direction(&self) -> Option<SwapDirection> {
        SwapDirection::from_label(&self.direction)
    }
}

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Decode a query value the way a form-encoded query is read: `+` is a space.
pub fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}
