//! Interactive Wizard for Swap Typeform
//!
//! Walks the user through:
//! 1. Wallet connection
//! 2. Direction and asset
//! 3. Amount with a live quote
//! 4. Destination address
//! 5. Review and submit

pub mod bridge;
pub mod swap_wizard;

pub use swap_wizard::run_swap_wizard;
