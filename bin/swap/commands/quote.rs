//! Quote command - one-shot conversion quote

use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use std::sync::Arc;
use swap_typeform::{HttpQuoteSource, Quote, QuoteFetcher, QuoteStatus, SwapConfig};

use crate::style::*;

pub async fn run(config: &SwapConfig, amount: &str, json: bool) -> Result<()> {
    let source = HttpQuoteSource::new(config)?;
    if !json {
        print_info(&format!("Requesting quote from {}", source.url()));
    }

    let fetcher = QuoteFetcher::new(Arc::new(source));
    let quote = fetcher.fetch_quote(amount).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    match &quote.status {
        QuoteStatus::Ready => {
            println!("{}", quote_table(&quote));
            Ok(())
        }
        QuoteStatus::Failed(msg) => bail!("{}", msg),
        QuoteStatus::Idle | QuoteStatus::Pending => {
            print_warning("Enter an amount greater than 0 to get a quote");
            Ok(())
        }
    }
}

pub fn quote_table(quote: &Quote) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["From amount", quote.from_amount.as_str()]);
    table.add_row(vec!["To amount", quote.to_amount.as_str()]);
    table.add_row(vec!["Rate", quote.rate.as_str()]);
    table.add_row(vec!["Gas estimate", quote.gas_estimate.as_str()]);
    if let Some(price) = &quote.eth_price_usd {
        table.add_row(vec!["ETH price (USD)", price.as_str()]);
    }
    if let Some(price) = &quote.xlm_price_usd {
        table.add_row(vec!["XLM price (USD)", price.as_str()]);
    }
    if let Some(source) = &quote.source {
        table.add_row(vec!["Source", source.as_str()]);
    }
    table
}
