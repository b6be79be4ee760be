//! Progress command - replay swap milestones

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use swap_typeform::{Handoff, ProgressPresenter, SwapConfig, MILESTONES};

use crate::style::*;

pub async fn run(
    config: &SwapConfig,
    direction: Option<String>,
    query: Option<String>,
) -> Result<()> {
    let handoff = match (direction, query) {
        (Some(direction), _) => Handoff::new(direction),
        (None, Some(query)) => Handoff::from_query(&query),
        (None, None) => Handoff::from_query(""),
    };
    show(config, &handoff).await
}

/// Render the presenter until the last milestone
pub async fn show(config: &SwapConfig, handoff: &Handoff) -> Result<()> {
    let presenter = ProgressPresenter::from_handoff(handoff);

    print_header("Executing Swap");
    println!("  {}", style_dim(&format!("Direction: {}", presenter.direction())));
    println!();

    let bar = ProgressBar::new(MILESTONES.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    bar.set_position(1);
    bar.set_message(presenter.current());

    let mut handle = presenter.spawn(config.milestone_interval());
    while let Some(milestone) = handle.next().await {
        bar.set_position(handle.index() as u64 + 1);
        bar.set_message(milestone);
    }
    bar.finish();

    println!();
    print_success("Swap complete");
    Ok(())
}
