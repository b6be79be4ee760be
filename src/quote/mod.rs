//! Conversion quotes
//!
//! - `types`: quote state, wire payload and errors
//! - `client`: the [`QuoteSource`] seam and its HTTP implementation
//! - `fetcher`: sequencing of overlapping requests (last issued wins)

pub mod client;
pub mod fetcher;
pub mod types;

pub use client::{HttpQuoteSource, QuoteSource};
pub use fetcher::{QuoteFetcher, QuoteTask};
pub use types::{Quote, QuoteData, QuoteError, QuoteStatus, FALLBACK_ERROR};
