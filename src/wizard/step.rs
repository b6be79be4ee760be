//! Step descriptors and answer fields

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input shape of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Connect,
    Direction,
    Asset,
    Amount,
    Wallet,
    Confirm,
}

/// Keys of the answer set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    EthAddress,
    /// Stellar address. Written by the Stellar bridge on the connect step and
    /// by the wallet step.
    WalletAddress,
    Direction,
    FromAsset,
    FromAmount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EthAddress => "ethAddress",
            Self::WalletAddress => "walletAddress",
            Self::Direction => "direction",
            Self::FromAsset => "fromAsset",
            Self::FromAmount => "fromAmount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethAddress" => Ok(Self::EthAddress),
            "walletAddress" => Ok(Self::WalletAddress),
            "direction" => Ok(Self::Direction),
            "fromAsset" => Ok(Self::FromAsset),
            "fromAmount" => Ok(Self::FromAmount),
            other => Err(format!("Unknown answer field: {}", other)),
        }
    }
}

/// Swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    #[serde(rename = "ETH → XLM")]
    EthToXlm,
    #[serde(rename = "XLM → ETH")]
    XlmToEth,
}

impl SwapDirection {
    pub const ALL: [SwapDirection; 2] = [Self::EthToXlm, Self::XlmToEth];

    /// Label stored in the answer set and carried by the handoff
    pub fn label(&self) -> &'static str {
        match self {
            Self::EthToXlm => "ETH → XLM",
            Self::XlmToEth => "XLM → ETH",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::EthToXlm => "Ethereum to Stellar",
            Self::XlmToEth => "Stellar to Ethereum",
        }
    }

    pub fn network_route(&self) -> &'static str {
        match self {
            Self::EthToXlm => "Ethereum → Stellar",
            Self::XlmToEth => "Stellar → Ethereum",
        }
    }

    pub fn from_symbol(&self) -> &'static str {
        match self {
            Self::EthToXlm => "ETH",
            Self::XlmToEth => "XLM",
        }
    }

    pub fn to_symbol(&self) -> &'static str {
        match self {
            Self::EthToXlm => "XLM",
            Self::XlmToEth => "ETH",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The only asset that can currently be swapped
pub const SWAPPABLE_ASSET: &str = "ETH";

/// Immutable step descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub kind: StepKind,
    pub options: &'static [&'static str],
}

impl Step {
    /// Answer field written by this step's input, if it has one.
    ///
    /// The connect step fills two fields through wallet bridges and the
    /// confirm step is read-only, so neither owns a field.
    pub fn field(&self) -> Option<Field> {
        match self.kind {
            StepKind::Connect | StepKind::Confirm => None,
            StepKind::Direction => Some(Field::Direction),
            StepKind::Asset => Some(Field::FromAsset),
            StepKind::Amount => Some(Field::FromAmount),
            StepKind::Wallet => Some(Field::WalletAddress),
        }
    }

    /// Whether `option` can be picked given the chosen direction.
    ///
    /// Asset options other than ETH stay listed but disabled; with XLM → ETH
    /// (or no direction yet) every asset is disabled.
    pub fn option_enabled(&self, option: &str, direction: Option<SwapDirection>) -> bool {
        if !self.options.contains(&option) {
            return false;
        }
        match self.kind {
            StepKind::Asset => {
                direction == Some(SwapDirection::EthToXlm) && option == SWAPPABLE_ASSET
            }
            _ => true,
        }
    }

    /// Hint shown under an option
    pub fn option_hint(&self, option: &str) -> Option<&'static str> {
        match self.kind {
            StepKind::Direction => SwapDirection::from_label(option).map(|d| d.description()),
            StepKind::Asset if option == SWAPPABLE_ASSET => Some("Available"),
            StepKind::Asset => Some("Coming Soon"),
            _ => None,
        }
    }
}

/// The fixed step sequence
pub static STEPS: [Step; 6] = [
    Step {
        id: "connect",
        title: "Connect your wallets",
        subtitle: "Link your Ethereum (Metamask) and Stellar (Freighter) wallets to continue",
        kind: StepKind::Connect,
        options: &[],
    },
    Step {
        id: "direction",
        title: "Which direction do you want to swap?",
        subtitle: "Choose your swap direction",
        kind: StepKind::Direction,
        options: &["ETH → XLM", "XLM → ETH"],
    },
    Step {
        id: "fromAsset",
        title: "Select the asset you are swapping",
        subtitle: "Select the asset you want to convert (only ETH available)",
        kind: StepKind::Asset,
        options: &["USDC", "USDT", "BTC", "ETH", "SOL", "ADA", "DOT", "LINK"],
    },
    Step {
        id: "fromAmount",
        title: "How much do you want to swap?",
        subtitle: "Enter the amount of ETH you want to convert to XLM",
        kind: StepKind::Amount,
        options: &[],
    },
    Step {
        id: "wallet",
        title: "Where should we send your XLM?",
        subtitle: "Enter your Stellar wallet address",
        kind: StepKind::Wallet,
        options: &[],
    },
    Step {
        id: "confirm",
        title: "Ready to transcend dimensions?",
        subtitle: "Review your swap details and conversion rate before proceeding",
        kind: StepKind::Confirm,
        options: &[],
    },
];

/// Parse an amount the way the amount step does: a finite decimal.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when `raw` parses to a strictly positive decimal
pub fn is_positive_amount(raw: &str) -> bool {
    parse_amount(raw).map(|v| v > 0.0).unwrap_or(false)
}
