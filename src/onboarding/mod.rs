//! Onboarding flow: the four editable steps after account creation.
//!
//! `state` tracks which step is active, `reconcile` decides where a
//! correction cycle goes next, `forms` validates what the seller typed and
//! `manager` ties them to the remote operations.

pub mod forms;
pub mod manager;
pub mod reconcile;
pub mod state;

pub use forms::{
    BankDetailsForm, DocumentUploader, LocalPathUploader, ShippingForm, StepValues, StoreNameForm,
    TaxDetailsForm,
};
pub use manager::{MountOutcome, OnboardingManager, StepOutcome};
pub use reconcile::{CorrectionReconciler, Reconciliation};
pub use state::{Advance, CorrectionBanner, OnboardingStepState, StepProgress};
