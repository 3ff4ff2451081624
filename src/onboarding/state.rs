//! Step progression: which onboarding step is active and how the stepper
//! looks.
//!
//! `steps` is always re-derived from `current`, never edited directly, so
//! exactly one step is active and only steps before the current one are
//! completed.

use std::collections::HashMap;

use serde::Serialize;

use crate::application::model::{FeedbackItem, OnboardingStep, StatusSnapshot};
use crate::application::resolver::start_step;

use super::forms::StepValues;

/// One row of the stepper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStepState {
    pub id: u8,
    pub title: &'static str,
    pub completed: bool,
    pub active: bool,
    pub has_error: bool,
}

/// What a successful step save does to progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Flat increment (capped at the last step).
    Moved(OnboardingStep),
    /// In a correction cycle: the reconciler decides where to go next.
    Reconcile(OnboardingStep),
}

/// Correction summary shown above the stepper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionBanner {
    /// No reviewer feedback at all.
    Hidden,
    /// Every feedback item has been resubmitted.
    Submitted,
    /// Items still waiting on the seller, as `(label, feedback)`.
    Required(Vec<(&'static str, String)>),
}

/// Client-side progress through the onboarding steps.
#[derive(Debug, Clone)]
pub struct StepProgress {
    current: OnboardingStep,
    steps: Vec<OnboardingStepState>,
    form_data: HashMap<OnboardingStep, StepValues>,
    pending_feedback: Vec<FeedbackItem>,
    has_pending_corrections: bool,
}

impl Default for StepProgress {
    fn default() -> Self {
        let mut progress = Self {
            current: OnboardingStep::FIRST,
            steps: Vec::new(),
            form_data: HashMap::new(),
            pending_feedback: Vec::new(),
            has_pending_corrections: false,
        };
        progress.derive_steps();
        progress
    }
}

impl StepProgress {
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        let mut progress = Self::default();
        progress.initialize(snapshot);
        progress
    }

    /// Load feedback and the starting step from a snapshot.
    pub fn initialize(&mut self, snapshot: &StatusSnapshot) {
        self.has_pending_corrections = snapshot.has_pending_corrections;
        self.pending_feedback = snapshot.pending_feedback.clone();
        self.current = start_step(snapshot);
        self.derive_steps();
    }

    pub fn current_step(&self) -> OnboardingStep {
        self.current
    }

    pub fn steps(&self) -> &[OnboardingStepState] {
        &self.steps
    }

    pub fn has_pending_corrections(&self) -> bool {
        self.has_pending_corrections
    }

    pub fn pending_feedback(&self) -> &[FeedbackItem] {
        &self.pending_feedback
    }

    /// Cached values last submitted for `step`.
    pub fn form_values(&self, step: OnboardingStep) -> Option<&StepValues> {
        self.form_data.get(&step)
    }

    /// The reviewer note attached to `step`, resubmitted or not.
    pub fn feedback_for(&self, step: OnboardingStep) -> Option<&FeedbackItem> {
        self.pending_feedback
            .iter()
            .find(|item| item.step == step.id())
    }

    pub fn banner(&self) -> CorrectionBanner {
        if self.pending_feedback.is_empty() {
            return CorrectionBanner::Hidden;
        }
        let active: Vec<_> = self
            .pending_feedback
            .iter()
            .filter(|item| !item.resubmitted)
            .filter_map(|item| {
                item.onboarding_step()
                    .map(|step| (step.correction_label(), item.feedback.clone()))
            })
            .collect();
        if active.is_empty() {
            CorrectionBanner::Submitted
        } else {
            CorrectionBanner::Required(active)
        }
    }

    /// Record a successful save of `values` and work out what happens next.
    pub fn advance(&mut self, values: StepValues) -> Advance {
        let step = values.step();
        self.form_data.insert(step, values);

        if self.has_pending_corrections {
            return Advance::Reconcile(step);
        }

        let next = step.next().unwrap_or(OnboardingStep::LAST);
        self.move_to(next);
        Advance::Moved(next)
    }

    /// Step back one. Returns `false` at the first editable step.
    pub fn go_back(&mut self) -> bool {
        match self.current.previous() {
            Some(previous) => {
                self.move_to(previous);
                true
            }
            None => false,
        }
    }

    pub fn navigate_to_step(&mut self, step: OnboardingStep) {
        self.move_to(step);
    }

    pub(crate) fn replace_feedback(&mut self, feedback: Vec<FeedbackItem>) {
        self.pending_feedback = feedback;
        self.derive_steps();
    }

    pub(crate) fn move_to(&mut self, step: OnboardingStep) {
        self.current = step;
        self.derive_steps();
    }

    fn derive_steps(&mut self) {
        let current = self.current.id();
        self.steps = OnboardingStep::ALL
            .iter()
            .map(|step| {
                let id = step.id();
                OnboardingStepState {
                    id,
                    title: step.title(),
                    completed: id < current,
                    active: id == current,
                    has_error: self
                        .pending_feedback
                        .iter()
                        .any(|item| item.step == id && item.is_outstanding()),
                }
            })
            .collect();
    }
}
