//! OnboardingManager: the onboarding page: mount-time routing, per-step
//! saves, correction handling and final submission.
//!
//! Nothing here returns an error to the caller. Every failure ends up as a
//! [`StepOutcome`] carrying the text to show in place of the form.

use tracing::{debug, info, warn};

use crate::api::SaveResult;
use crate::application::model::{ApplicationStatus, OnboardingStep};
use crate::application::resolver::{Destination, resolve_destination};
use crate::application::routes::Route;
use crate::context::PageDeps;
use crate::error::{ApiError, ValidationErrors};
use crate::lifecycle::Mount;
use crate::session::SellerUser;

use super::forms::{StepValues, TaxDetailsForm};
use super::reconcile::{CorrectionReconciler, Reconciliation};
use super::state::{Advance, CorrectionBanner, StepProgress};

pub const CORRECTIONS_OUTSTANDING: &str =
    "Please correct all feedback items before submitting your application.";
const SUBMITTED: &str = "Application submitted successfully! Your application is under review.";
const APPROVED: &str = "Application approved! Redirecting to your dashboard.";
const REJECTED: &str = "Application has been rejected. Please check the feedback.";
const STILL_DRAFT: &str = "Application saved. Please complete all steps.";
const SUBMIT_FAILED: &str = "Failed to submit application";
const SUBMIT_ERROR: &str = "Error submitting application. Please try again.";
const UPLOAD_FAILED: &str = "Failed to upload PAN document";

/// Result of opening the onboarding page.
pub enum MountOutcome {
    Ready(Box<OnboardingManager>),
    /// The seller belongs elsewhere; navigation already happened.
    Redirected(Route),
    /// Torn down before the status check returned.
    Discarded,
}

/// Result of a step submission or final submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Field errors; nothing was sent.
    Invalid(ValidationErrors),
    /// Remote or transport failure; the form stays editable.
    Failed { message: String },
    /// Now on this step.
    Moved(OnboardingStep),
    /// Submission refused locally.
    Blocked { message: String },
    /// Stayed on the page with a notice.
    Stayed { notice: String },
    /// Left the page.
    Routed { route: Route, notice: Option<String> },
    /// The page was unmounted while waiting; nothing applied.
    Discarded,
}

pub struct OnboardingManager {
    deps: PageDeps,
    mount: Mount,
    user: SellerUser,
    progress: StepProgress,
}

impl OnboardingManager {
    /// Open the onboarding page.
    ///
    /// Signed-out visitors go to `/auth`; sellers whose application is not a
    /// draft go wherever the resolver sends them. A failed status fetch
    /// starts the flow from the first step.
    pub async fn mount(deps: PageDeps, mount: Mount) -> MountOutcome {
        let Some(user) = deps.session.user().await else {
            deps.navigator.navigate(Route::Auth);
            return MountOutcome::Redirected(Route::Auth);
        };

        let fetched = deps.client.application_status().await;
        if !mount.is_live() {
            return MountOutcome::Discarded;
        }

        let progress = match fetched {
            Ok(snapshot) => match resolve_destination(&snapshot) {
                Destination::OnboardingFlow(step) => {
                    debug!(step = step.id(), "Opening onboarding");
                    StepProgress::from_snapshot(&snapshot)
                }
                other => {
                    info!(status = %snapshot.status, destination = %other, "Leaving onboarding");
                    let route = other.route();
                    deps.navigator.navigate(route);
                    return MountOutcome::Redirected(route);
                }
            },
            Err(e) => {
                warn!("Status check failed on onboarding mount: {e}");
                StepProgress::default()
            }
        };

        MountOutcome::Ready(Box::new(Self {
            deps,
            mount,
            user,
            progress,
        }))
    }

    pub fn user(&self) -> &SellerUser {
        &self.user
    }

    pub fn progress(&self) -> &StepProgress {
        &self.progress
    }

    pub fn current_step(&self) -> OnboardingStep {
        self.progress.current_step()
    }

    pub fn banner(&self) -> CorrectionBanner {
        self.progress.banner()
    }

    pub fn mount_handle(&self) -> &Mount {
        &self.mount
    }

    pub fn go_back(&mut self) -> bool {
        self.progress.go_back()
    }

    /// Jump straight to a step, as from the corrections banner.
    pub fn navigate_to_step(&mut self, step: OnboardingStep) {
        self.progress.navigate_to_step(step);
    }

    /// Validate, save and advance one step.
    pub async fn submit_step(&mut self, values: StepValues) -> StepOutcome {
        if let Err(errors) = values.validate() {
            return StepOutcome::Invalid(errors);
        }

        let step = values.step();
        let saved = match self.save(&values).await {
            Ok(result) => result,
            Err(message) => {
                if !self.mount.is_live() {
                    return StepOutcome::Discarded;
                }
                return StepOutcome::Failed { message };
            }
        };
        if !self.mount.is_live() {
            return StepOutcome::Discarded;
        }
        if !saved.success {
            return StepOutcome::Failed {
                message: saved
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| save_failure(step).to_string()),
            };
        }
        info!(step = step.id(), "Step saved");

        match self.progress.advance(values) {
            Advance::Reconcile(saved_step) => self.reconcile(saved_step).await,
            Advance::Moved(_) if step == OnboardingStep::LAST => self.submit_application().await,
            Advance::Moved(next) => StepOutcome::Moved(next),
        }
    }

    /// Final submission. Refused without a network call while corrections
    /// are outstanding locally.
    pub async fn submit_application(&mut self) -> StepOutcome {
        if self.progress.has_pending_corrections() {
            info!("Submission blocked by outstanding corrections");
            return StepOutcome::Blocked {
                message: CORRECTIONS_OUTSTANDING.to_string(),
            };
        }

        let submitted = self.deps.client.submit_application().await;
        if !self.mount.is_live() {
            return StepOutcome::Discarded;
        }
        match submitted {
            Ok(result) if result.success => {}
            Ok(result) => {
                return StepOutcome::Failed {
                    message: result
                        .message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| SUBMIT_FAILED.to_string()),
                };
            }
            Err(e) => {
                warn!("Application submission failed: {e}");
                return StepOutcome::Failed {
                    message: SUBMIT_ERROR.to_string(),
                };
            }
        }

        let fresh = self.deps.client.application_status().await;
        if !self.mount.is_live() {
            return StepOutcome::Discarded;
        }
        let (route, notice) = match fresh.map(|s| s.status) {
            Ok(ApplicationStatus::Approved) => (Route::SellerDashboard, APPROVED),
            Ok(ApplicationStatus::Pending) => (Route::ApplicationPending, SUBMITTED),
            Ok(ApplicationStatus::Rejected) => (Route::ApplicationRejected, REJECTED),
            Ok(ApplicationStatus::Draft) => {
                return StepOutcome::Stayed {
                    notice: STILL_DRAFT.to_string(),
                };
            }
            Err(e) => {
                warn!("Status check after submission failed: {e}");
                (Route::ApplicationPending, SUBMITTED)
            }
        };
        info!(route = %route, "Application submitted");
        self.route_to(route, Some(notice.to_string()))
    }

    /// Clear the session and go home.
    pub async fn logout(&self) -> Route {
        self.mount.unmount();
        crate::auth::logout(&self.deps).await
    }

    async fn reconcile(&mut self, saved: OnboardingStep) -> StepOutcome {
        let reconciled = CorrectionReconciler::new(&self.deps.client)
            .reconcile(&mut self.progress, saved, &self.mount)
            .await;

        match reconciled {
            None => StepOutcome::Discarded,
            Some(Reconciliation::Exit {
                destination,
                notice,
            }) => self.route_to(destination.route(), notice),
            Some(Reconciliation::Continue(step))
                if saved == OnboardingStep::LAST && step == OnboardingStep::LAST =>
            {
                StepOutcome::Blocked {
                    message: CORRECTIONS_OUTSTANDING.to_string(),
                }
            }
            Some(Reconciliation::Continue(step)) => StepOutcome::Moved(step),
        }
    }

    async fn save(&self, values: &StepValues) -> Result<SaveResult, String> {
        let client = &self.deps.client;
        let result = match values {
            StepValues::TaxDetails(form) => {
                let url = self.upload_document(form).await?;
                client.save_tax_details(&form.to_request(url)).await
            }
            StepValues::StoreName(form) => client.save_store_name(&form.store_name).await,
            StepValues::Shipping(form) => client.save_shipping_address(&form.to_request()).await,
            StepValues::BankDetails(form) => client.save_bank_details(&form.to_request()).await,
        };
        result.map_err(|e: ApiError| {
            warn!(step = values.step().id(), "Step save failed: {e}");
            e.user_message()
        })
    }

    async fn upload_document(&self, form: &TaxDetailsForm) -> Result<Option<String>, String> {
        let Some(path) = form.document() else {
            return Ok(None);
        };
        self.deps
            .uploader
            .upload(path)
            .await
            .map(Some)
            .map_err(|e| {
                warn!(path = %path.display(), "Document upload failed: {e}");
                UPLOAD_FAILED.to_string()
            })
    }

    fn route_to(&self, route: Route, notice: Option<String>) -> StepOutcome {
        self.deps.navigator.navigate(route);
        StepOutcome::Routed { route, notice }
    }
}

/// Fallback text when a save is refused without a message.
fn save_failure(step: OnboardingStep) -> &'static str {
    match step {
        OnboardingStep::TaxDetails => "Failed to save GST/PAN details",
        OnboardingStep::StoreName => "Failed to save store name",
        OnboardingStep::ShippingAddress => "Failed to save shipping address",
        OnboardingStep::BankDetails => "Failed to save bank details",
    }
}
