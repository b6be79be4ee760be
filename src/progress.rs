//! Swap progress presenter
//!
//! Cosmetic milestone replay shown after submission. It is not wired to any
//! real swap execution: it starts at the first milestone, steps forward on a
//! fixed timer and stops at the last one.

use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::handoff::Handoff;

pub const MILESTONES: [&str; 5] = [
    "Preparing swap",
    "Fetching conversion rate",
    "Submitting transaction",
    "Awaiting confirmation",
    "Swap complete",
];

/// Delay between milestones
pub const MILESTONE_INTERVAL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressPresenter {
    /// Display only
    direction: String,
    index: usize,
}

impl ProgressPresenter {
    pub fn new(direction: impl Into<String>) -> Self {
        Self {
            direction: direction.into(),
            index: 0,
        }
    }

    pub fn from_handoff(handoff: &Handoff) -> Self {
        Self::new(handoff.direction.clone())
    }

    pub fn direction(&self) -> &str {
        &self.direction
    }

    pub fn milestones(&self) -> &'static [&'static str] {
        &MILESTONES
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'static str {
        MILESTONES[self.index]
    }

    pub fn is_complete(&self) -> bool {
        self.index == MILESTONES.len() - 1
    }

    /// Step forward; false once the last milestone is reached
    pub fn tick(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Run the timer on the current runtime. The returned handle stops it
    /// when dropped.
    pub fn spawn(self, interval: Duration) -> ProgressHandle {
        let (tx, rx) = watch::channel(self.index);
        let task = tokio::spawn(async move {
            let mut presenter = self;
            while !presenter.is_complete() {
                tokio::time::sleep(interval).await;
                presenter.tick();
                debug!("Progress: {}", presenter.current());
                if tx.send(presenter.index).is_err() {
                    break;
                }
            }
        });
        ProgressHandle { rx, task }
    }
}

/// Running presenter; aborts its timer on drop
pub struct ProgressHandle {
    rx: watch::Receiver<usize>,
    task: JoinHandle<()>,
}

impl ProgressHandle {
    pub fn index(&self) -> usize {
        *self.rx.borrow()
    }

    pub fn current(&self) -> &'static str {
        MILESTONES[self.index()]
    }

    pub fn is_complete(&self) -> bool {
        self.index() == MILESTONES.len() - 1
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.rx.clone()
    }

    /// Wait for the next milestone. Returns None once the presenter stopped.
    pub async fn next(&mut self) -> Option<&'static str> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }

    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
