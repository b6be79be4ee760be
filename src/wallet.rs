//! Wallet bridges
//!
//! A bridge is whatever supplies an address for one chain: a browser
//! extension, an SDK, a preconfigured address or a terminal prompt. The wizard
//! only ever asks three things of it.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::wizard::step::Field;

/// Chain a bridge connects to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Stellar,
}

impl Chain {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Stellar => "Stellar",
        }
    }

    /// Wallet product the front end advertises for this chain
    pub fn wallet_name(&self) -> &'static str {
        match self {
            Self::Ethereum => "MetaMask",
            Self::Stellar => "Freighter",
        }
    }

    /// Answer field the connected address is written to
    pub fn field(&self) -> Field {
        match self {
            Self::Ethereum => Field::EthAddress,
            Self::Stellar => Field::WalletAddress,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("{0} not detected")]
    NotAvailable(String),
    #[error("Failed to connect to {wallet}: {reason}")]
    ConnectFailed { wallet: String, reason: String },
    #[error("{0} returned an empty address")]
    EmptyAddress(String),
}

/// Capability interface for an injected wallet provider
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Display name, e.g. "MetaMask"
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Ask the wallet for an address, prompting the user if needed
    async fn request_connect(&self) -> Result<String, WalletError>;

    /// Whether the wallet already granted access
    async fn is_connected(&self) -> Result<bool, WalletError> {
        Ok(false)
    }
}

/// Bridge with an address known up front (config, environment, tests)
pub struct StaticWalletBridge {
    name: String,
    address: Option<String>,
    connected: RwLock<bool>,
}

impl StaticWalletBridge {
    pub fn new(name: impl Into<String>, address: Option<String>) -> Self {
        let address = address.filter(|a| !a.trim().is_empty());
        Self {
            name: name.into(),
            address,
            connected: RwLock::new(false),
        }
    }

    /// Bridge for `chain` using its advertised wallet name
    pub fn for_chain(chain: Chain, address: Option<String>) -> Self {
        Self::new(chain.wallet_name(), address)
    }

    /// Treat the wallet as already connected (access granted earlier)
    pub fn pre_connected(self) -> Self {
        *self.connected.write() = true;
        self
    }
}

#[async_trait]
impl WalletBridge for StaticWalletBridge {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.address.is_some()
    }

    async fn request_connect(&self) -> Result<String, WalletError> {
        let address = self
            .address
            .clone()
            .ok_or_else(|| WalletError::NotAvailable(self.name.clone()))?;
        *self.connected.write() = true;
        debug!("{} connected: {}", self.name, address);
        Ok(address)
    }

    async fn is_connected(&self) -> Result<bool, WalletError> {
        Ok(self.address.is_some() && *self.connected.read())
    }
}
