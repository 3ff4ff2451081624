//! Seller application data as the server reports it.

use serde::{Deserialize, Serialize};

/// Review status of a seller application. Server-authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        write!(f, "{s}")
    }
}

/// One editable onboarding step.
///
/// Step 1 (account creation) is implied by being signed in, so the editable
/// range is 2..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OnboardingStep {
    TaxDetails = 2,
    StoreName = 3,
    ShippingAddress = 4,
    BankDetails = 5,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 4] = [
        Self::TaxDetails,
        Self::StoreName,
        Self::ShippingAddress,
        Self::BankDetails,
    ];

    pub const FIRST: OnboardingStep = Self::TaxDetails;
    pub const LAST: OnboardingStep = Self::BankDetails;

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            2 => Some(Self::TaxDetails),
            3 => Some(Self::StoreName),
            4 => Some(Self::ShippingAddress),
            5 => Some(Self::BankDetails),
            _ => None,
        }
    }

    /// Title shown in the stepper.
    pub fn title(self) -> &'static str {
        match self {
            Self::TaxDetails => "Verify tax details",
            Self::StoreName => "Store name",
            Self::ShippingAddress => "Shipping preferences & Pickup address",
            Self::BankDetails => "Bank details",
        }
    }

    /// Label used when listing reviewer corrections.
    pub fn correction_label(self) -> &'static str {
        match self {
            Self::TaxDetails => "Tax Details (GST/PAN)",
            Self::StoreName => "Store Name",
            Self::ShippingAddress => "Shipping Address",
            Self::BankDetails => "Bank Details",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_id(self.id() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_id(self.id() - 1)
    }
}

impl From<OnboardingStep> for u8 {
    fn from(step: OnboardingStep) -> Self {
        step.id()
    }
}

impl TryFrom<u8> for OnboardingStep {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or_else(|| format!("onboarding step {id} is outside 2..=5"))
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({})", self.id(), self.title())
    }
}

/// A reviewer's note attached to one onboarding step during a correction cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    /// Raw step id; items outside 2..=5 are kept but never routed to.
    pub step: u8,
    pub needs_correction: bool,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub resubmitted: bool,
}

impl FeedbackItem {
    /// Still waiting on the seller: needs correction and not yet resubmitted.
    pub fn is_outstanding(&self) -> bool {
        self.needs_correction && !self.resubmitted
    }

    pub fn onboarding_step(&self) -> Option<OnboardingStep> {
        OnboardingStep::from_id(self.step)
    }
}

/// Steps with an outstanding correction, in feedback order.
pub fn outstanding_steps(feedback: &[FeedbackItem]) -> impl Iterator<Item = OnboardingStep> + '_ {
    feedback
        .iter()
        .filter(|item| item.is_outstanding())
        .filter_map(FeedbackItem::onboarding_step)
}

/// A single point-in-time read of the server's view of the application.
///
/// Never reused across a step submission; callers fetch a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub status: ApplicationStatus,
    pub current_step: Option<u8>,
    pub has_pending_corrections: bool,
    pub pending_feedback: Vec<FeedbackItem>,
    /// Free-form server message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl StatusSnapshot {
    /// A bare snapshot with no feedback and no server step.
    pub fn new(status: ApplicationStatus) -> Self {
        Self {
            status,
            current_step: None,
            has_pending_corrections: false,
            pending_feedback: Vec::new(),
            message: None,
            is_active: None,
        }
    }

    pub fn with_current_step(mut self, step: u8) -> Self {
        self.current_step = Some(step);
        self
    }

    /// Attach reviewer feedback and mark the snapshot as in a correction cycle.
    pub fn with_corrections(mut self, feedback: Vec<FeedbackItem>) -> Self {
        self.has_pending_corrections = true;
        self.pending_feedback = feedback;
        self
    }

    /// Lowest step that still needs correcting.
    pub fn first_outstanding_step(&self) -> Option<OnboardingStep> {
        outstanding_steps(&self.pending_feedback).min()
    }
}
