//! Swap Typeform
//!
//! Core of the ETH ⇄ XLM swap wizard: a step-by-step form that collects wallet
//! addresses, a direction, an asset and an amount, prices the amount through
//! an external quote service, and hands the chosen direction to a cosmetic
//! progress view.
//!
//! ## Module Structure
//!
//! - `wizard/`: steps, answer state and the controller driving them
//! - `quote/`: quote service client and last-request-wins fetcher
//! - `wallet`: wallet bridge capability interface
//! - `handoff`: wizard → progress page query
//! - `progress`: timed milestone presenter
//! - `summary`: confirm-step review lines
//! - `config`: endpoints, timings, preconfigured addresses

pub mod config;
pub mod handoff;
pub mod progress;
pub mod quote;
pub mod summary;
pub mod wallet;
pub mod wizard;

pub use config::{default_config_path, SwapConfig};
pub use handoff::Handoff;
pub use progress::{ProgressHandle, ProgressPresenter, MILESTONES, MILESTONE_INTERVAL};
pub use quote::{
    HttpQuoteSource, Quote, QuoteData, QuoteError, QuoteFetcher, QuoteSource, QuoteStatus,
    QuoteTask,
};
pub use summary::{shorten_address, SummaryLine, SwapSummary};
pub use wallet::{Chain, StaticWalletBridge, WalletBridge, WalletError};
pub use wizard::{
    Field, Key, Step, StepKind, SwapDirection, Transition, WizardController, WizardState, STEPS,
};
