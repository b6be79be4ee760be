//! Wizard State Management

use serde::Serialize;
use std::collections::BTreeMap;

use super::step::{is_positive_amount, Field, Step, StepKind, SwapDirection, STEPS};

/// Answers collected so far plus the current position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    current_index: usize,
    pub answers: BTreeMap<Field, String>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            current_index: 0,
            answers: BTreeMap::new(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Move to the next step; false at the last one
    pub(crate) fn step_forward(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        self.current_index += 1;
        true
    }

    /// Move to the previous step; false at the first one
    pub(crate) fn step_back(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        true
    }

    pub fn steps(&self) -> &'static [Step] {
        &STEPS
    }

    pub fn current_step(&self) -> &'static Step {
        &STEPS[self.current_index]
    }

    pub fn is_last_step(&self) -> bool {
        self.current_index == STEPS.len() - 1
    }

    pub fn answer(&self, field: Field) -> Option<&str> {
        self.answers.get(&field).map(String::as_str)
    }

    /// Present and non-empty
    pub fn has_answer(&self, field: Field) -> bool {
        self.answer(field).map(|v| !v.is_empty()).unwrap_or(false)
    }

    pub fn direction(&self) -> Option<SwapDirection> {
        self.answer(Field::Direction)
            .and_then(SwapDirection::from_label)
    }

    /// Whether `step` has what it needs to move on
    pub fn is_step_answered(&self, step: &Step) -> bool {
        match step.kind {
            StepKind::Connect => {
                self.has_answer(Field::EthAddress) && self.has_answer(Field::WalletAddress)
            }
            StepKind::Direction => self.has_answer(Field::Direction),
            StepKind::Asset => self.has_answer(Field::FromAsset),
            StepKind::Amount => self
                .answer(Field::FromAmount)
                .map(is_positive_amount)
                .unwrap_or(false),
            StepKind::Wallet => self.has_answer(Field::WalletAddress),
            StepKind::Confirm => true,
        }
    }

    pub fn current_step_is_answered(&self) -> bool {
        self.is_step_answered(self.current_step())
    }

    /// Share of the wizard reached, counting the current step
    pub fn progress_percent(&self) -> f64 {
        (self.current_index + 1) as f64 / STEPS.len() as f64 * 100.0
    }
}
