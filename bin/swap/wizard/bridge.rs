//! Wallet bridge that asks the user to paste an address

use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Input};
use swap_typeform::{Chain, WalletBridge, WalletError};

pub struct PromptWalletBridge {
    chain: Chain,
}

impl PromptWalletBridge {
    pub fn new(chain: Chain) -> Self {
        Self { chain }
    }

    fn placeholder(&self) -> &'static str {
        match self.chain {
            Chain::Ethereum => "0x...",
            Chain::Stellar => "G...",
        }
    }
}

#[async_trait]
impl WalletBridge for PromptWalletBridge {
    fn name(&self) -> &str {
        self.chain.wallet_name()
    }

    fn is_available(&self) -> bool {
        console::user_attended()
    }

    async fn request_connect(&self) -> Result<String, WalletError> {
        let address: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "  {} address ({})",
                self.chain.wallet_name(),
                self.placeholder()
            ))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| WalletError::ConnectFailed {
                wallet: self.name().to_string(),
                reason: e.to_string(),
            })?;

        if address.trim().is_empty() {
            return Err(WalletError::ConnectFailed {
                wallet: self.name().to_string(),
                reason: "User rejected the request".to_string(),
            });
        }
        Ok(address.trim().to_string())
    }
}
