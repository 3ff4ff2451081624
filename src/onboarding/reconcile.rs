//! Correction reconciliation.
//!
//! Runs after a step is saved while the application is in a correction
//! cycle and decides whether the seller leaves the flow for review or moves
//! on to the next step a reviewer flagged. Every await is followed by a
//! liveness check; a teardown mid-way yields `None` and leaves progress as
//! it was at the last applied update.

use tracing::{debug, info, warn};

use crate::api::SellerClient;
use crate::application::model::{ApplicationStatus, OnboardingStep, outstanding_steps};
use crate::application::resolver::Destination;
use crate::lifecycle::Mount;

use super::state::StepProgress;

pub const CORRECTIONS_SUBMITTED: &str =
    "All corrections submitted successfully! Your application is under review.";
pub const APPROVED_NOTICE: &str = "Application approved! Redirecting to your dashboard.";

/// Where the flow goes after a corrected step was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Leave the onboarding flow.
    Exit {
        destination: Destination,
        notice: Option<String>,
    },
    /// Stay in the flow at this step.
    Continue(OnboardingStep),
}

pub struct CorrectionReconciler<'a> {
    client: &'a SellerClient,
}

impl<'a> CorrectionReconciler<'a> {
    pub fn new(client: &'a SellerClient) -> Self {
        Self { client }
    }

    /// Reconcile after `saved` was stored. Returns `None` if the page was
    /// unmounted while a fetch was in flight.
    pub async fn reconcile(
        &self,
        progress: &mut StepProgress,
        saved: OnboardingStep,
        mount: &Mount,
    ) -> Option<Reconciliation> {
        let fresh = self.client.application_status().await;
        if !mount.is_live() {
            debug!(step = saved.id(), "Discarding reconciliation after unmount");
            return None;
        }

        match fresh {
            Ok(snapshot) => match snapshot.status {
                ApplicationStatus::Pending => {
                    info!(step = saved.id(), "Corrections complete, back to review");
                    return Some(pending_exit());
                }
                ApplicationStatus::Approved => {
                    info!(step = saved.id(), "Application approved mid-correction");
                    return Some(Reconciliation::Exit {
                        destination: Destination::DashboardHome,
                        notice: Some(APPROVED_NOTICE.to_string()),
                    });
                }
                _ => progress.replace_feedback(snapshot.pending_feedback),
            },
            Err(e) => {
                warn!(step = saved.id(), "Status refresh failed, using local feedback: {e}");
            }
        }

        let next = outstanding_steps(progress.pending_feedback())
            .filter(|step| *step > saved)
            .min();
        if let Some(step) = next {
            debug!(from = saved.id(), to = step.id(), "Next correction");
            progress.move_to(step);
            return Some(Reconciliation::Continue(step));
        }

        // The server may not have flipped to PENDING yet.
        let recheck = self.client.application_status().await;
        if !mount.is_live() {
            debug!(step = saved.id(), "Discarding reconciliation after unmount");
            return None;
        }
        match recheck {
            Ok(snapshot) if snapshot.status == ApplicationStatus::Pending => {
                info!(step = saved.id(), "Corrections complete on recheck");
                Some(pending_exit())
            }
            Ok(_) => {
                progress.move_to(OnboardingStep::LAST);
                Some(Reconciliation::Continue(OnboardingStep::LAST))
            }
            Err(e) => {
                warn!(step = saved.id(), "Status recheck failed: {e}");
                progress.move_to(OnboardingStep::LAST);
                Some(Reconciliation::Continue(OnboardingStep::LAST))
            }
        }
    }
}

fn pending_exit() -> Reconciliation {
    Reconciliation::Exit {
        destination: Destination::PendingReviewPage,
        notice: Some(CORRECTIONS_SUBMITTED.to_string()),
    }
}
