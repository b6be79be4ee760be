//! Swap wizard
//!
//! Six linear steps:
//! 1. Connect Ethereum and Stellar wallets
//! 2. Swap direction
//! 3. Source asset
//! 4. Amount (fetches a quote on every edit)
//! 5. Destination Stellar address
//! 6. Confirm

pub mod controller;
pub mod state;
pub mod step;

pub use controller::{Key, Transition, WizardController};
pub use state::WizardState;
pub use step::{Field, Step, StepKind, SwapDirection, STEPS};
