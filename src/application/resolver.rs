//! Status resolver: the single decision table from a status snapshot to the
//! page a seller should be looking at.
//!
//! Every entry point that observes application state (the dashboard landing,
//! the onboarding page mount and each status page's poller) goes through
//! [`resolve_destination`], so re-evaluating a fresh snapshot from any page
//! yields the same answer.

use serde::Serialize;

use super::model::{ApplicationStatus, OnboardingStep, StatusSnapshot};
use super::routes::Route;

/// Where a seller belongs given a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "step", rename_all = "snake_case")]
pub enum Destination {
    DashboardHome,
    PendingReviewPage,
    RejectedPage,
    OnboardingFlow(OnboardingStep),
}

impl Destination {
    pub fn route(&self) -> Route {
        match self {
            Self::DashboardHome => Route::SellerDashboard,
            Self::PendingReviewPage => Route::ApplicationPending,
            Self::RejectedPage => Route::ApplicationRejected,
            Self::OnboardingFlow(_) => Route::Onboarding,
        }
    }

    /// Whether a page rendered at `route` is the right place for this destination.
    pub fn is_served_by(&self, route: Route) -> bool {
        self.route() == route
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnboardingFlow(step) => write!(f, "{} at {}", self.route(), step),
            _ => write!(f, "{}", self.route()),
        }
    }
}

/// Resolve a fetched snapshot. First match wins.
pub fn resolve_destination(snapshot: &StatusSnapshot) -> Destination {
    match snapshot.status {
        ApplicationStatus::Approved => Destination::DashboardHome,
        ApplicationStatus::Pending => Destination::PendingReviewPage,
        ApplicationStatus::Rejected => Destination::RejectedPage,
        ApplicationStatus::Draft => Destination::OnboardingFlow(start_step(snapshot)),
    }
}

/// Resolve a snapshot that may be missing because the fetch failed.
pub fn resolve_or_onboard(snapshot: Option<&StatusSnapshot>) -> Destination {
    snapshot
        .map(resolve_destination)
        .unwrap_or(Destination::OnboardingFlow(OnboardingStep::FIRST))
}

/// Step the onboarding flow should open on.
///
/// Outstanding corrections win over server progress; server progress wins
/// over the first step. A server step past the last one clamps to it.
pub fn start_step(snapshot: &StatusSnapshot) -> OnboardingStep {
    if snapshot.has_pending_corrections {
        if let Some(step) = snapshot.first_outstanding_step() {
            return step;
        }
    }

    match snapshot.current_step {
        Some(step) if step >= OnboardingStep::FIRST.id() => {
            OnboardingStep::from_id(step.min(OnboardingStep::LAST.id()))
                .unwrap_or(OnboardingStep::FIRST)
        }
        _ => OnboardingStep::FIRST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model::FeedbackItem;

    fn outstanding(step: u8) -> FeedbackItem {
        FeedbackItem {
            step,
            needs_correction: true,
            feedback: "please fix".into(),
            resubmitted: false,
        }
    }

    #[test]
    fn terminal_statuses_map_to_their_pages() {
        let cases = [
            (ApplicationStatus::Approved, Destination::DashboardHome, Route::SellerDashboard),
            (ApplicationStatus::Pending, Destination::PendingReviewPage, Route::ApplicationPending),
            (ApplicationStatus::Rejected, Destination::RejectedPage, Route::ApplicationRejected),
        ];
        for (status, expected, route) in cases {
            let destination = resolve_destination(&StatusSnapshot::new(status));
            assert_eq!(destination, expected, "{status}");
            assert_eq!(destination.route(), route);
        }
    }

    #[test]
    fn status_wins_over_corrections() {
        let snapshot = StatusSnapshot::new(ApplicationStatus::Pending)
            .with_corrections(vec![outstanding(3)]);
        assert_eq!(resolve_destination(&snapshot), Destination::PendingReviewPage);
    }

    #[test]
    fn fresh_draft_starts_at_tax_details() {
        let snapshot = StatusSnapshot::new(ApplicationStatus::Draft);
        assert_eq!(
            resolve_destination(&snapshot),
            Destination::OnboardingFlow(OnboardingStep::TaxDetails)
        );
    }

    #[test]
    fn draft_resumes_server_step() {
        let snapshot = StatusSnapshot::new(ApplicationStatus::Draft).with_current_step(4);
        assert_eq!(start_step(&snapshot), OnboardingStep::ShippingAddress);
    }

    #[test]
    fn server_step_below_two_starts_at_first() {
        let snapshot = StatusSnapshot::new(ApplicationStatus::Draft).with_current_step(1);
        assert_eq!(start_step(&snapshot), OnboardingStep::TaxDetails);
    }

    #[test]
    fn server_step_past_last_clamps() {
        let snapshot = StatusSnapshot::new(ApplicationStatus::Draft).with_current_step(6);
        assert_eq!(start_step(&snapshot), OnboardingStep::BankDetails);
    }

    #[test]
    fn corrections_target_lowest_outstanding_step() {
        let snapshot = StatusSnapshot::new(ApplicationStatus::Draft)
            .with_current_step(5)
            .with_corrections(vec![outstanding(5), outstanding(3)]);
        assert_eq!(
            resolve_destination(&snapshot),
            Destination::OnboardingFlow(OnboardingStep::StoreName)
        );
    }

    #[test]
    fn resolved_corrections_fall_back_to_server_step() {
        let mut done = outstanding(2);
        done.resubmitted = true;
        let snapshot = StatusSnapshot::new(ApplicationStatus::Draft)
            .with_current_step(4)
            .with_corrections(vec![done]);
        assert_eq!(start_step(&snapshot), OnboardingStep::ShippingAddress);
    }

    #[test]
    fn feedback_without_flag_is_ignored() {
        let mut snapshot = StatusSnapshot::new(ApplicationStatus::Draft).with_current_step(5);
        snapshot.pending_feedback = vec![outstanding(3)];
        assert_eq!(start_step(&snapshot), OnboardingStep::BankDetails);
    }

    #[test]
    fn missing_snapshot_opens_onboarding() {
        assert_eq!(
            resolve_or_onboard(None),
            Destination::OnboardingFlow(OnboardingStep::TaxDetails)
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let snapshots = [
            StatusSnapshot::new(ApplicationStatus::Draft),
            StatusSnapshot::new(ApplicationStatus::Draft).with_current_step(3),
            StatusSnapshot::new(ApplicationStatus::Draft)
                .with_corrections(vec![outstanding(4), outstanding(2)]),
            StatusSnapshot::new(ApplicationStatus::Approved),
            StatusSnapshot::new(ApplicationStatus::Rejected),
        ];
        for snapshot in &snapshots {
            assert_eq!(resolve_destination(snapshot), resolve_destination(snapshot));
        }
    }

    #[test]
    fn onboarding_destination_is_served_by_onboarding_page() {
        let destination = Destination::OnboardingFlow(OnboardingStep::BankDetails);
        assert!(destination.is_served_by(Route::Onboarding));
        assert!(!destination.is_served_by(Route::ApplicationPending));
    }
}
