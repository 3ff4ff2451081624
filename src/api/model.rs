//! Request and response shapes for the remote operations.

use secrecy::SecretString;
use serde::Deserialize;

use crate::application::model::{ApplicationStatus, FeedbackItem, StatusSnapshot};
use crate::session::{SellerUser, SessionTokens};

/// Credentials for `SignIn`.
#[derive(Debug, Clone)]
pub struct SignInRequest {
    pub email_or_mobile: String,
    pub password: SecretString,
}

/// Registration details for `SignUp`.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub mobile_number: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
}

/// What sign-in and sign-up hand back.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub message: Option<String>,
    pub user: SellerUser,
    pub tokens: SessionTokens,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthPayloadWire {
    #[serde(default)]
    message: Option<String>,
    user: SellerUser,
    access_token: String,
    refresh_token: String,
}

impl From<AuthPayloadWire> for AuthPayload {
    fn from(wire: AuthPayloadWire) -> Self {
        Self {
            message: wire.message,
            user: wire.user,
            tokens: SessionTokens {
                access_token: SecretString::from(wire.access_token),
                refresh_token: SecretString::from(wire.refresh_token),
            },
        }
    }
}

/// `SellerApplicationStatus` as it comes off the wire; nullable where the
/// server is loose.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplicationStatusWire {
    status: ApplicationStatus,
    #[serde(default)]
    current_step: Option<i64>,
    #[serde(default)]
    has_pending_corrections: Option<bool>,
    #[serde(default)]
    pending_feedback: Option<Vec<FeedbackItem>>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
}

impl From<ApplicationStatusWire> for StatusSnapshot {
    fn from(wire: ApplicationStatusWire) -> Self {
        Self {
            status: wire.status,
            current_step: wire.current_step.and_then(|step| u8::try_from(step).ok()),
            has_pending_corrections: wire.has_pending_corrections.unwrap_or(false),
            pending_feedback: wire.pending_feedback.unwrap_or_default(),
            message: wire.message,
            is_active: wire.is_active,
        }
    }
}

/// Tax identity for `SaveGstPanDetails`: either a GST number, or a PAN with
/// its uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxDetailsRequest {
    Gst {
        gst_number: String,
    },
    Pan {
        pan_number: String,
        pan_document_url: Option<String>,
    },
}

impl TaxDetailsRequest {
    pub fn document_type(&self) -> &'static str {
        match self {
            Self::Gst { .. } => "GST",
            Self::Pan { .. } => "PAN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddressRequest {
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankDetailsRequest {
    pub account_holder_name: String,
    pub bank_account_number: String,
    pub confirm_account_number: String,
    pub ifsc_code: String,
}

/// Result of any step save mutation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub seller_profile: Option<StepProfile>,
}

/// Progress flags the server echoes after a step save. Each mutation fills
/// only its own flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepProfile {
    #[serde(default)]
    pub current_step: Option<i64>,
    #[serde(default)]
    pub step2_completed: Option<bool>,
    #[serde(default)]
    pub step3_completed: Option<bool>,
    #[serde(default)]
    pub step4_completed: Option<bool>,
    #[serde(default)]
    pub step5_completed: Option<bool>,
    #[serde(default)]
    pub all_steps_completed: Option<bool>,
}

/// Result of `SubmitSellerApplication`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub seller_profile: Option<SubmittedProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedProfile {
    #[serde(default)]
    pub application_status: Option<ApplicationStatus>,
    #[serde(default)]
    pub submitted_at: Option<String>,
}
