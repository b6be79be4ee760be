//! Swap Wizard - Interactive CLI

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use swap_typeform::{
    Chain, Field, HttpQuoteSource, Key, QuoteFetcher, QuoteStatus, StaticWalletBridge, StepKind,
    SwapConfig, SwapSummary, Transition, WalletBridge, WizardController, STEPS,
};

use super::bridge::PromptWalletBridge;
use crate::print_banner;
use crate::style::*;

/// What the user asked for after a step prompt
enum StepAction {
    Continue,
    Back,
    Cancel,
}

const BACK_LABEL: &str = "← Back";
const BACK_WORD: &str = "back";

pub async fn run_swap_wizard(config: &SwapConfig) -> Result<()> {
    let term = Term::stdout();
    term.clear_screen()?;

    print_banner();
    println!(
        "{}",
        style("  Interactive ETH ⇄ XLM Swap Wizard").cyan().bold()
    );
    println!(
        "  {}",
        style("Connect wallets, pick an amount and review your quote").dim()
    );

    let source = HttpQuoteSource::new(config)?;
    let quotes = QuoteFetcher::with_debounce(Arc::new(source), config.quote_debounce());
    let mut wizard = WizardController::new(quotes);

    loop {
        let step = wizard.current_step();
        println!();
        print_step(wizard.current_index() + 1, STEPS.len(), step.title);
        println!("  {}", style_dim(step.subtitle));
        println!(
            "  {}",
            progress_bar(wizard.state().progress_percent(), 30)
        );
        println!();

        let action = match step.kind {
            StepKind::Connect => connect_step(&mut wizard, config).await?,
            StepKind::Direction | StepKind::Asset => option_step(&mut wizard)?,
            StepKind::Amount => amount_step(&mut wizard).await?,
            StepKind::Wallet => wallet_step(&mut wizard)?,
            StepKind::Confirm => confirm_step(&wizard)?,
        };

        match action {
            StepAction::Continue => match wizard.handle_key(Key::Enter) {
                Some(Transition::Submitted { handoff }) => {
                    println!();
                    print_success(&format!(
                        "Navigating to {}",
                        style_cyan(&handoff.path(&config.progress_path))
                    ));
                    return crate::commands::progress::show(config, &handoff).await;
                }
                Some(Transition::Blocked) => print_warning(blocked_hint(step.kind)),
                Some(Transition::SubmitPending) => print_info("Swap already submitted"),
                Some(Transition::QuoteLoading) => print_info("Waiting for the conversion rate"),
                Some(Transition::Moved { .. }) | None => {}
            },
            StepAction::Back => {
                wizard.retreat();
            }
            StepAction::Cancel => {
                println!();
                println!("  {} Cancelled", style("✗").red());
                return Ok(());
            }
        }
    }
}

fn blocked_hint(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Connect => "Connect both wallets to continue",
        StepKind::Direction => "Choose a swap direction",
        StepKind::Asset => "Select an available asset",
        StepKind::Amount => "Enter an amount greater than 0",
        StepKind::Wallet => "Enter a Stellar address",
        StepKind::Confirm => "Review your swap",
    }
}

/// Configured addresses act like wallets that already granted access; without
/// one, the user pastes an address.
fn bridge_for(chain: Chain, config: &SwapConfig) -> Box<dyn WalletBridge> {
    let configured = match chain {
        Chain::Ethereum => config.eth_address.clone(),
        Chain::Stellar => config.stellar_address.clone(),
    };
    match configured {
        Some(address) if !address.trim().is_empty() => {
            Box::new(StaticWalletBridge::for_chain(chain, Some(address)).pre_connected())
        }
        _ => Box::new(PromptWalletBridge::new(chain)),
    }
}

async fn connect_step(wizard: &mut WizardController, config: &SwapConfig) -> Result<StepAction> {
    for chain in [Chain::Ethereum, Chain::Stellar] {
        let bridge = bridge_for(chain, config);

        if let Some(address) = wizard.state().answer(chain.field()).filter(|a| !a.is_empty()) {
            println!("  {} {} Wallet: {}", style("✓").green(), chain, style(address).cyan());
            continue;
        }

        if let Some(address) = wizard.restore_connection(chain, bridge.as_ref()).await {
            println!("  {} {} Wallet: {}", style("✓").green(), chain, style(address).cyan());
            continue;
        }

        loop {
            let items = [format!("Connect {}", chain.wallet_name()), "Cancel".to_string()];
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("  {} Wallet", chain))
                .items(&items)
                .default(0)
                .interact()?;
            if choice == 1 {
                return Ok(StepAction::Cancel);
            }

            match wizard.connect_wallet(chain, bridge.as_ref()).await {
                Ok(address) => {
                    print_success(&format!("{} Wallet: {}", chain, style_cyan(&address)));
                    break;
                }
                Err(e) => print_error(&e.to_string()),
            }
        }
    }
    Ok(StepAction::Continue)
}

fn option_step(wizard: &mut WizardController) -> Result<StepAction> {
    let step = wizard.current_step();
    let options = wizard.current_options();
    let field = step.field();

    let mut items: Vec<String> = options
        .iter()
        .map(|(option, enabled)| {
            let hint = step.option_hint(option).unwrap_or_default();
            let selected = field.and_then(|f| wizard.state().answer(f)) == Some(*option);
            let marker = if selected { "●" } else { " " };
            if *enabled {
                format!("{} {:<10} {}", marker, option, style_gray(hint))
            } else {
                style_dim(&format!("  {:<10} {}", option, hint))
            }
        })
        .collect();
    items.push(BACK_LABEL.to_string());

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("  Select")
            .items(&items)
            .default(0)
            .interact()?;

        if choice == options.len() {
            return Ok(StepAction::Back);
        }

        let (option, _) = options[choice];
        if wizard.select_option(option) {
            return Ok(StepAction::Continue);
        }
        print_warning(&format!("{} is not available yet", option));
        if options.iter().all(|(_, enabled)| !enabled) {
            print_info("Nothing can be selected for this direction; go back to change it");
        }
    }
}

async fn amount_step(wizard: &mut WizardController) -> Result<StepAction> {
    let symbol = wizard
        .state()
        .direction()
        .map(|d| d.from_symbol())
        .unwrap_or("ETH");
    let current = wizard
        .state()
        .answer(Field::FromAmount)
        .unwrap_or_default()
        .to_string();

    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("  {} amount (or '{}')", symbol, BACK_WORD))
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;

    if raw.trim().eq_ignore_ascii_case(BACK_WORD) {
        return Ok(StepAction::Back);
    }

    if let Some(task) = wizard.set_current_answer(raw.trim()) {
        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner.set_message("Fetching conversion rate...");
        task.run().await;
        spinner.finish_and_clear();
    }

    let quote = wizard.quote();
    let to_symbol = wizard
        .state()
        .direction()
        .map(|d| d.to_symbol())
        .unwrap_or("XLM");
    match &quote.status {
        QuoteStatus::Ready => print_info(&format!(
            "≈ {} {} (rate {})",
            style_bold(&quote.to_amount),
            to_symbol,
            quote.rate
        )),
        QuoteStatus::Failed(msg) => print_error(msg),
        QuoteStatus::Idle | QuoteStatus::Pending => {}
    }

    Ok(StepAction::Continue)
}

fn wallet_step(wizard: &mut WizardController) -> Result<StepAction> {
    let current = wizard
        .state()
        .answer(Field::WalletAddress)
        .unwrap_or_default()
        .to_string();

    let address: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("  Stellar address (G... or '{}')", BACK_WORD))
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;

    if address.trim().eq_ignore_ascii_case(BACK_WORD) {
        return Ok(StepAction::Back);
    }

    let _ = wizard.set_current_answer(address.trim());
    Ok(StepAction::Continue)
}

fn confirm_step(wizard: &WizardController) -> Result<StepAction> {
    let summary = SwapSummary::build(wizard.state(), &wizard.quote());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Review Your Swap", ""]);
    for line in &summary.lines {
        if line.is_error {
            table.add_row(vec![
                Cell::new(line.label).fg(Color::Red),
                Cell::new(&line.value).fg(Color::Red),
            ]);
        } else {
            table.add_row(vec![Cell::new(line.label), Cell::new(&line.value)]);
        }
    }
    println!("{}", table);
    println!();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("  Ready?")
        .items(&["Execute Swap", BACK_LABEL, "Cancel"])
        .default(0)
        .interact()?;

    match choice {
        0 => {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("  Execute this swap?")
                .default(true)
                .interact()?;
            Ok(if confirmed {
                StepAction::Continue
            } else {
                StepAction::Cancel
            })
        }
        1 => Ok(StepAction::Back),
        _ => Ok(StepAction::Cancel),
    }
}
