//! Read-only review shown on the confirm step

use serde::Serialize;

use crate::quote::Quote;
use crate::wizard::step::{Field, SwapDirection};
use crate::wizard::WizardState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
    /// Rendered as an error row
    pub is_error: bool,
}

impl SummaryLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            is_error: false,
        }
    }

    fn error(value: impl Into<String>) -> Self {
        Self {
            label: "Error",
            value: value.into(),
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapSummary {
    pub lines: Vec<SummaryLine>,
}

impl SwapSummary {
    pub fn build(state: &WizardState, quote: &Quote) -> Self {
        // Only an explicit ETH → XLM reads as ETH → XLM
        let direction = match state.direction() {
            Some(SwapDirection::EthToXlm) => SwapDirection::EthToXlm,
            _ => SwapDirection::XlmToEth,
        };
        let answer = move |field: Field| state.answer(field).unwrap_or_default();

        let mut lines = vec![
            SummaryLine::new("Direction", answer(Field::Direction)),
            SummaryLine::new(
                "From",
                format!("{} {}", answer(Field::FromAmount), answer(Field::FromAsset)),
            ),
        ];

        let to = if quote.is_loading() {
            "Loading...".to_string()
        } else if !quote.to_amount.is_empty() {
            format!("{} {}", quote.to_amount, direction.to_symbol())
        } else {
            "~0".to_string()
        };
        lines.push(SummaryLine::new("To", to));

        if !quote.rate.is_empty() {
            lines.push(SummaryLine::new(
                "Rate",
                format!(
                    "1 {} = {} {}",
                    direction.from_symbol(),
                    quote.rate,
                    direction.to_symbol()
                ),
            ));
        }
        if let Some(price) = &quote.eth_price_usd {
            lines.push(SummaryLine::new("ETH Price", format!("${}", price)));
        }
        if let Some(price) = &quote.xlm_price_usd {
            lines.push(SummaryLine::new("XLM Price", format!("${}", price)));
        }
        if !quote.gas_estimate.is_empty() {
            lines.push(SummaryLine::new(
                "Gas",
                format!("~{} ETH", quote.gas_estimate),
            ));
        }
        if let Some(err) = quote.error() {
            lines.push(SummaryLine::error(err));
        }

        lines.push(SummaryLine::new("Network", direction.network_route()));
        lines.push(SummaryLine::new(
            "Wallet",
            shorten_address(answer(Field::WalletAddress)),
        ));

        Self { lines }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
    }
}

/// `GABCDEFG...WXYZ1234` style abbreviation (first and last 8 characters)
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 16 {
        return address.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", head, tail)
}
