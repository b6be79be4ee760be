//! Wizard controller
//!
//! Framework-independent driver for the swap wizard. A front end renders
//! [`WizardController::state`] and feeds user intent back through the
//! transition methods; nothing here knows about terminals or browsers.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::state::WizardState;
use super::step::{Field, Step};
use crate::handoff::Handoff;
use crate::quote::{Quote, QuoteFetcher, QuoteTask};
use crate::wallet::{Chain, WalletBridge, WalletError};

/// Result of an `advance` (or an Enter/Space press)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    /// Moved to the given step index
    Moved { index: usize },
    /// Current step is not answered yet
    Blocked,
    /// Final step confirmed; navigate with this handoff
    Submitted { handoff: Handoff },
    /// A submit is already pending
    SubmitPending,
    /// Quote still loading; the confirm step waits for its figures
    QuoteLoading,
}

/// Keys the wizard reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

pub struct WizardController {
    state: WizardState,
    quotes: QuoteFetcher,
    submitted: Option<Handoff>,
}

impl WizardController {
    pub fn new(quotes: QuoteFetcher) -> Self {
        Self {
            state: WizardState::new(),
            quotes,
            submitted: None,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> &'static Step {
        self.state.current_step()
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    pub fn current_step_is_answered(&self) -> bool {
        self.state.current_step_is_answered()
    }

    pub fn quotes(&self) -> &QuoteFetcher {
        &self.quotes
    }

    pub fn quote(&self) -> Quote {
        self.quotes.current()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitted.is_some()
    }

    /// Write an answer. No validation happens here; validity only gates
    /// `advance`.
    ///
    /// Writing `fromAmount` issues a quote request for the raw value. The
    /// returned task must be run or spawned by the caller; requests it
    /// supersedes are left to finish and get discarded.
    pub fn set_answer(&mut self, field: Field, value: impl Into<String>) -> Option<QuoteTask> {
        let value = value.into();
        debug!("Answer {} = {:?}", field, value);

        let task = if field == Field::FromAmount {
            self.quotes.issue(&value)
        } else {
            None
        };
        self.state.answers.insert(field, value);
        task
    }

    /// Write to the field owned by the current step. Steps without an input
    /// of their own (connect, confirm) ignore the value.
    pub fn set_current_answer(&mut self, value: impl Into<String>) -> Option<QuoteTask> {
        let field = self.current_step().field()?;
        self.set_answer(field, value)
    }

    /// Pick one of the current step's options, honouring disabled options.
    /// Returns whether the selection was taken.
    pub fn select_option(&mut self, option: &str) -> bool {
        let step = self.current_step();
        if !step.option_enabled(option, self.state.direction()) {
            debug!("Option {:?} is disabled on step {}", option, step.id);
            return false;
        }
        // Option steps never own the amount field, so no quote is issued
        let _ = self.set_current_answer(option);
        true
    }

    /// Options of the current step with their enabled flag
    pub fn current_options(&self) -> Vec<(&'static str, bool)> {
        let step = self.current_step();
        let direction = self.state.direction();
        step.options
            .iter()
            .map(|o| (*o, step.option_enabled(o, direction)))
            .collect()
    }

    pub fn advance(&mut self) -> Transition {
        if !self.state.current_step_is_answered() {
            debug!("Advance blocked on step {}", self.current_step().id);
            return Transition::Blocked;
        }

        if self.state.is_last_step() {
            return self.submit();
        }

        self.state.step_forward();
        debug!(
            "Advanced to step {} ({})",
            self.current_index(),
            self.current_step().id
        );
        Transition::Moved {
            index: self.current_index(),
        }
    }

    /// Returns false at the first step
    pub fn retreat(&mut self) -> bool {
        if !self.state.step_back() {
            return false;
        }
        debug!(
            "Went back to step {} ({})",
            self.current_index(),
            self.current_step().id
        );
        true
    }

    /// Hand the chosen direction to the progress view. Only valid on the last
    /// step, and only once.
    pub fn submit(&mut self) -> Transition {
        if self.submitted.is_some() {
            return Transition::SubmitPending;
        }
        if !self.state.is_last_step() || !self.state.current_step_is_answered() {
            return Transition::Blocked;
        }

        let direction = self
            .state
            .answer(Field::Direction)
            .unwrap_or_default()
            .to_string();
        let handoff = Handoff::new(direction);
        info!("Swap submitted: direction={}", handoff.direction);

        self.submitted = Some(handoff.clone());
        Transition::Submitted { handoff }
    }

    /// Enter and Space act like the primary button; anything else is ignored.
    ///
    /// On the last step the key only submits when no quote fetch and no
    /// submit is in flight.
    pub fn handle_key(&mut self, key: Key) -> Option<Transition> {
        match key {
            Key::Enter | Key::Space => {
                let awaiting_quote = self.state.is_last_step()
                    && self.submitted.is_none()
                    && self.quotes.current().is_loading();
                if awaiting_quote {
                    debug!("Submit key ignored while quote is loading");
                    return Some(Transition::QuoteLoading);
                }
                Some(self.advance())
            }
            Key::Other => None,
        }
    }

    /// Connect `chain` through `bridge` and store the address.
    ///
    /// Failures leave the answer set untouched so the user can retry.
    pub async fn connect_wallet(
        &mut self,
        chain: Chain,
        bridge: &dyn WalletBridge,
    ) -> Result<String, WalletError> {
        if !bridge.is_available() {
            warn!("{} bridge not available", bridge.name());
            return Err(WalletError::NotAvailable(bridge.name().to_string()));
        }

        let address = match bridge.request_connect().await {
            Ok(address) => address,
            Err(e) => {
                warn!("{} connection failed: {}", bridge.name(), e);
                return Err(e);
            }
        };

        let address = address.trim().to_string();
        if address.is_empty() {
            return Err(WalletError::EmptyAddress(bridge.name().to_string()));
        }

        info!("{} wallet connected: {}", chain, address);
        let _ = self.set_answer(chain.field(), address.clone());
        Ok(address)
    }

    /// Pick up a wallet that already granted access, without prompting.
    /// Returns the address if one was restored.
    pub async fn restore_connection(
        &mut self,
        chain: Chain,
        bridge: &dyn WalletBridge,
    ) -> Option<String> {
        if !bridge.is_available() {
            return None;
        }
        match bridge.is_connected().await {
            Ok(true) => self.connect_wallet(chain, bridge).await.ok(),
            Ok(false) => None,
            Err(e) => {
                warn!("Could not check {} connection: {}", bridge.name(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{QuoteData, QuoteError, QuoteSource, QuoteStatus};
    use crate::wallet::StaticWalletBridge;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedSource;

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn quote(&self, amount: &str) -> Result<QuoteData, QuoteError> {
            if amount == "9" {
                return Err(QuoteError::Service("rate unavailable".into()));
            }
            Ok(QuoteData {
                from_amount: amount.to_string(),
                to_amount: "42".to_string(),
                rate: "28".to_string(),
                gas_estimate: "0.001".to_string(),
                eth_price_usd: None,
                xlm_price_usd: None,
                source: None,
            })
        }
    }

    /// Never answers
    struct StalledSource;

    #[async_trait]
    impl QuoteSource for StalledSource {
        async fn quote(&self, _amount: &str) -> Result<QuoteData, QuoteError> {
            std::future::pending().await
        }
    }

    struct RejectingBridge;

    #[async_trait]
    impl WalletBridge for RejectingBridge {
        fn name(&self) -> &str {
            "MetaMask"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn request_connect(&self) -> Result<String, WalletError> {
            Err(WalletError::ConnectFailed {
                wallet: "MetaMask".into(),
                reason: "User rejected the request".into(),
            })
        }
    }

    fn controller() -> WizardController {
        WizardController::new(QuoteFetcher::new(Arc::new(FixedSource)))
    }

    fn at_confirm() -> WizardController {
        let mut wizard = controller();
        let _ = wizard.set_answer(Field::EthAddress, "0xabc");
        let _ = wizard.set_answer(Field::WalletAddress, "GABC");
        let _ = wizard.set_answer(Field::Direction, "ETH → XLM");
        let _ = wizard.set_answer(Field::FromAsset, "ETH");
        let _ = wizard.set_answer(Field::FromAmount, "1");
        for _ in 0..5 {
            assert!(matches!(wizard.advance(), Transition::Moved { .. }));
        }
        wizard
    }

    #[test]
    fn test_advance_blocked_when_unanswered() {
        let mut wizard = controller();
        assert_eq!(wizard.advance(), Transition::Blocked);
        assert_eq!(wizard.current_index(), 0);
    }

    #[test]
    fn test_retreat_at_start_is_noop() {
        let mut wizard = controller();
        assert!(!wizard.retreat());
        assert_eq!(wizard.current_index(), 0);
    }

    #[test]
    fn test_retreat_moves_back_one() {
        let mut wizard = at_confirm();
        assert!(wizard.retreat());
        assert_eq!(wizard.current_index(), 4);
    }

    #[test]
    fn test_advance_at_last_step_submits_once() {
        let mut wizard = at_confirm();
        assert_eq!(wizard.current_index(), 5);

        let handoff = match wizard.advance() {
            Transition::Submitted { handoff } => handoff,
            other => panic!("expected submit, got {:?}", other),
        };
        assert_eq!(handoff.direction, "ETH → XLM");
        assert_eq!(wizard.current_index(), 5);
        assert!(wizard.is_submitting());

        assert_eq!(wizard.handle_key(Key::Enter), Some(Transition::SubmitPending));
        assert_eq!(wizard.submit(), Transition::SubmitPending);
    }

    #[tokio::test]
    async fn test_enter_waits_for_loading_quote_on_confirm() {
        let mut wizard = WizardController::new(QuoteFetcher::new(Arc::new(StalledSource)));
        let _ = wizard.set_answer(Field::EthAddress, "0xabc");
        let _ = wizard.set_answer(Field::WalletAddress, "GABC");
        let _ = wizard.set_answer(Field::Direction, "ETH → XLM");
        let _ = wizard.set_answer(Field::FromAsset, "ETH");
        let _ = wizard.set_answer(Field::FromAmount, "1");
        for _ in 0..5 {
            wizard.advance();
        }
        assert_eq!(wizard.current_index(), 5);

        let task = wizard.set_answer(Field::FromAmount, "2").unwrap().spawn();
        assert!(wizard.quote().is_loading());

        assert_eq!(wizard.handle_key(Key::Enter), Some(Transition::QuoteLoading));
        assert_eq!(wizard.handle_key(Key::Space), Some(Transition::QuoteLoading));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.current_index(), 5);

        // Resetting the amount drops the pending state and unblocks the key
        assert!(wizard.set_answer(Field::FromAmount, "").is_none());
        assert!(matches!(
            wizard.handle_key(Key::Enter),
            Some(Transition::Submitted { .. })
        ));
        task.abort();
    }

    #[tokio::test]
    async fn test_enter_before_last_step_ignores_loading_quote() {
        let mut wizard = WizardController::new(QuoteFetcher::new(Arc::new(StalledSource)));
        let _ = wizard.set_answer(Field::EthAddress, "0xabc");
        let _ = wizard.set_answer(Field::WalletAddress, "GABC");
        let _task = wizard.set_answer(Field::FromAmount, "2").unwrap();
        assert!(wizard.quote().is_loading());

        assert_eq!(
            wizard.handle_key(Key::Enter),
            Some(Transition::Moved { index: 1 })
        );
    }

    #[test]
    fn test_submit_before_last_step_is_blocked() {
        let mut wizard = controller();
        assert_eq!(wizard.submit(), Transition::Blocked);
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_keys() {
        let mut wizard = controller();
        assert_eq!(wizard.handle_key(Key::Other), None);
        assert_eq!(wizard.handle_key(Key::Space), Some(Transition::Blocked));

        let _ = wizard.set_answer(Field::EthAddress, "0xabc");
        let _ = wizard.set_answer(Field::WalletAddress, "GABC");
        assert_eq!(
            wizard.handle_key(Key::Space),
            Some(Transition::Moved { index: 1 })
        );
    }

    #[test]
    fn test_set_current_answer_targets_step_field() {
        let mut wizard = controller();
        // Connect step has no input of its own
        assert!(wizard.set_current_answer("ignored").is_none());
        assert!(wizard.state().answers.is_empty());

        let _ = wizard.set_answer(Field::EthAddress, "0xabc");
        let _ = wizard.set_answer(Field::WalletAddress, "GABC");
        wizard.advance();
        let _ = wizard.set_current_answer("XLM → ETH");
        assert_eq!(wizard.state().answer(Field::Direction), Some("XLM → ETH"));
    }

    #[test]
    fn test_set_answer_is_unconditional() {
        let mut wizard = controller();
        let _ = wizard.set_answer(Field::FromAsset, "BTC");
        assert_eq!(wizard.state().answer(Field::FromAsset), Some("BTC"));
    }

    #[test]
    fn test_select_option_respects_gating() {
        let mut wizard = controller();
        let _ = wizard.set_answer(Field::EthAddress, "0xabc");
        let _ = wizard.set_answer(Field::WalletAddress, "GABC");
        wizard.advance();
        assert!(wizard.select_option("XLM → ETH"));
        wizard.advance();

        // XLM → ETH: nothing on the asset step is selectable
        assert!(!wizard.select_option("ETH"));
        assert!(wizard.current_options().iter().all(|(_, enabled)| !enabled));
        assert_eq!(wizard.advance(), Transition::Blocked);

        wizard.retreat();
        assert!(wizard.select_option("ETH → XLM"));
        wizard.advance();
        assert!(!wizard.select_option("BTC"));
        assert!(!wizard.select_option("DOGE"));
        assert!(wizard.select_option("ETH"));
        assert_eq!(wizard.current_options().len(), 8);
        assert_eq!(wizard.advance(), Transition::Moved { index: 3 });
    }

    #[tokio::test]
    async fn test_amount_answer_issues_quote() {
        let mut wizard = controller();
        let task = wizard.set_answer(Field::FromAmount, "1.5").unwrap();
        assert!(wizard.quote().is_loading());
        assert!(task.run().await);
        assert_eq!(wizard.quote().to_amount, "42");

        assert!(wizard.set_answer(Field::FromAmount, "0").is_none());
        assert_eq!(wizard.quote().status, QuoteStatus::Idle);
        assert!(wizard.set_answer(Field::Direction, "ETH → XLM").is_none());
    }

    #[tokio::test]
    async fn test_quote_error_does_not_block_navigation() {
        let mut wizard = controller();
        let _ = wizard.set_answer(Field::EthAddress, "0xabc");
        let _ = wizard.set_answer(Field::WalletAddress, "GABC");
        let _ = wizard.set_answer(Field::Direction, "ETH → XLM");
        let _ = wizard.set_answer(Field::FromAsset, "ETH");
        for _ in 0..3 {
            wizard.advance();
        }

        let task = wizard.set_current_answer("9").unwrap();
        task.run().await;
        assert_eq!(wizard.quote().error(), Some("rate unavailable"));
        assert_eq!(wizard.advance(), Transition::Moved { index: 4 });
    }

    #[tokio::test]
    async fn test_connect_wallets() {
        let mut wizard = controller();
        let eth = StaticWalletBridge::for_chain(Chain::Ethereum, Some("0xabc".into()));
        let xlm = StaticWalletBridge::for_chain(Chain::Stellar, Some("GABC".into()));

        assert_eq!(
            wizard.connect_wallet(Chain::Ethereum, &eth).await.unwrap(),
            "0xabc"
        );
        assert_eq!(wizard.advance(), Transition::Blocked);

        wizard.connect_wallet(Chain::Stellar, &xlm).await.unwrap();
        assert_eq!(wizard.state().answer(Field::WalletAddress), Some("GABC"));
        assert_eq!(wizard.advance(), Transition::Moved { index: 1 });
    }

    #[tokio::test]
    async fn test_wallet_errors_leave_state_untouched() {
        let mut wizard = controller();

        let missing = StaticWalletBridge::for_chain(Chain::Ethereum, None);
        let err = wizard
            .connect_wallet(Chain::Ethereum, &missing)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "MetaMask not detected");

        let err = wizard
            .connect_wallet(Chain::Ethereum, &RejectingBridge)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::ConnectFailed { .. }));

        assert!(!wizard.state().has_answer(Field::EthAddress));
    }

    #[tokio::test]
    async fn test_restore_connection() {
        let mut wizard = controller();

        let fresh = StaticWalletBridge::for_chain(Chain::Stellar, Some("GABC".into()));
        assert_eq!(wizard.restore_connection(Chain::Stellar, &fresh).await, None);
        assert!(!wizard.state().has_answer(Field::WalletAddress));

        let granted =
            StaticWalletBridge::for_chain(Chain::Stellar, Some("GABC".into())).pre_connected();
        assert_eq!(
            wizard.restore_connection(Chain::Stellar, &granted).await,
            Some("GABC".to_string())
        );
        assert!(wizard.state().has_answer(Field::WalletAddress));
    }
}
