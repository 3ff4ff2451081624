//! Step forms and their field validation.
//!
//! Validation runs before any network call. Each form reports at most one
//! message per field, keyed by the field name the step renders.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::api::{BankDetailsRequest, ShippingAddressRequest, TaxDetailsRequest};
use crate::application::model::OnboardingStep;
use crate::error::{UploadError, ValidationErrors};

static GST_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$").unwrap()
});
static PAN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$").unwrap());
static PINCODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").unwrap());
static HOLDER_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());
static ACCOUNT_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{9,18}$").unwrap());
static IFSC_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").unwrap());

/// States and union territories accepted for a pickup address.
pub const INDIAN_STATES: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

/// Step 2. A seller either has a GST registration or files a PAN with a
/// scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxDetailsForm {
    Gst {
        gst_number: String,
    },
    Pan {
        pan_number: String,
        document: Option<PathBuf>,
    },
}

impl TaxDetailsForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match self {
            Self::Gst { gst_number } => {
                if gst_number.is_empty() {
                    errors.add("gstNumber", "GST number is required");
                } else if !GST_NUMBER.is_match(gst_number) {
                    errors.add("gstNumber", "Invalid GST number format");
                }
            }
            Self::Pan {
                pan_number,
                document,
            } => {
                if pan_number.is_empty() {
                    errors.add("panNumber", "PAN number is required");
                } else if !PAN_NUMBER.is_match(pan_number) {
                    errors.add("panNumber", "Invalid PAN number format (e.g., ABCDE1234F)");
                }
                if document.is_none() {
                    errors.add("panDocument", "PAN document is required");
                }
            }
        }
        errors.into_result()
    }

    /// Build the save request. `document_url` is the uploaded PAN document,
    /// ignored in GST mode.
    pub fn to_request(&self, document_url: Option<String>) -> TaxDetailsRequest {
        match self {
            Self::Gst { gst_number } => TaxDetailsRequest::Gst {
                gst_number: gst_number.clone(),
            },
            Self::Pan { pan_number, .. } => TaxDetailsRequest::Pan {
                pan_number: pan_number.clone(),
                pan_document_url: document_url,
            },
        }
    }

    pub fn document(&self) -> Option<&Path> {
        match self {
            Self::Pan { document, .. } => document.as_deref(),
            Self::Gst { .. } => None,
        }
    }
}

/// Step 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreNameForm {
    pub store_name: String,
}

impl StoreNameForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let len = self.store_name.chars().count();
        if self.store_name.is_empty() {
            errors.add("storeName", "Store name is required");
        } else if len < 3 {
            errors.add("storeName", "Store name must be at least 3 characters");
        } else if len > 50 {
            errors.add("storeName", "Store name must not exceed 50 characters");
        }
        errors.into_result()
    }
}

/// Step 4: pickup address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingForm {
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub address: String,
}

impl ShippingForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.pincode.is_empty() {
            errors.add("pincode", "Pincode is required");
        } else if !PINCODE.is_match(&self.pincode) {
            errors.add("pincode", "Invalid pincode (must be 6 digits)");
        }

        if self.city.is_empty() {
            errors.add("city", "City is required");
        } else if self.city.chars().count() < 2 {
            errors.add("city", "City name must be at least 2 characters");
        }

        if self.state.is_empty() {
            errors.add("state", "State is required");
        } else if !INDIAN_STATES.contains(&self.state.as_str()) {
            errors.add("state", "Please select a valid state");
        }

        if self.address.is_empty() {
            errors.add("address", "Address is required");
        } else if self.address.chars().count() < 10 {
            errors.add("address", "Address must be at least 10 characters");
        }

        errors.into_result()
    }

    pub fn to_request(&self) -> ShippingAddressRequest {
        ShippingAddressRequest {
            pincode: self.pincode.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            address: self.address.clone(),
        }
    }
}

/// Step 5: payout account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankDetailsForm {
    pub account_holder_name: String,
    pub account_number: String,
    pub confirm_account_number: String,
    pub ifsc_code: String,
}

impl BankDetailsForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.account_holder_name.is_empty() {
            errors.add("accountHolderName", "Account holder name is required");
        } else if self.account_holder_name.chars().count() < 3 {
            errors.add("accountHolderName", "Name must be at least 3 characters");
        } else if !HOLDER_NAME.is_match(&self.account_holder_name) {
            errors.add("accountHolderName", "Name should contain only letters");
        }

        if self.account_number.is_empty() {
            errors.add("accountNumber", "Account number is required");
        } else if !ACCOUNT_NUMBER.is_match(&self.account_number) {
            errors.add("accountNumber", "Account number must be 9-18 digits");
        }

        if self.confirm_account_number.is_empty() {
            errors.add("confirmAccountNumber", "Please re-enter account number");
        } else if self.account_number != self.confirm_account_number {
            errors.add("confirmAccountNumber", "Account numbers do not match");
        }

        let ifsc_code = self.ifsc_code();
        if ifsc_code.is_empty() {
            errors.add("ifscCode", "IFSC code is required");
        } else if !IFSC_CODE.is_match(&ifsc_code) {
            errors.add("ifscCode", "Invalid IFSC code format (e.g., SBIN0001234)");
        }

        errors.into_result()
    }

    pub fn to_request(&self) -> BankDetailsRequest {
        BankDetailsRequest {
            account_holder_name: self.account_holder_name.clone(),
            bank_account_number: self.account_number.clone(),
            confirm_account_number: self.confirm_account_number.clone(),
            ifsc_code: self.ifsc_code(),
        }
    }

    /// IFSC as the server expects it; input is upper-cased as typed.
    pub fn ifsc_code(&self) -> String {
        self.ifsc_code.to_ascii_uppercase()
    }
}

/// Values submitted for one step; also what the progress cache keeps so a
/// revisited step can be prefilled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepValues {
    TaxDetails(TaxDetailsForm),
    StoreName(StoreNameForm),
    Shipping(ShippingForm),
    BankDetails(BankDetailsForm),
}

impl StepValues {
    pub fn step(&self) -> OnboardingStep {
        match self {
            Self::TaxDetails(_) => OnboardingStep::TaxDetails,
            Self::StoreName(_) => OnboardingStep::StoreName,
            Self::Shipping(_) => OnboardingStep::ShippingAddress,
            Self::BankDetails(_) => OnboardingStep::BankDetails,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::TaxDetails(form) => form.validate(),
            Self::StoreName(form) => form.validate(),
            Self::Shipping(form) => form.validate(),
            Self::BankDetails(form) => form.validate(),
        }
    }
}

/// "Submit file, receive URL."
#[async_trait]
pub trait DocumentUploader: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<String, UploadError>;
}

/// Uploader that keeps documents where they are and hands back their
/// `file://` URL once the file is confirmed readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalPathUploader;

#[async_trait]
impl DocumentUploader for LocalPathUploader {
    async fn upload(&self, path: &Path) -> Result<String, UploadError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(UploadError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(UploadError::Io(e)),
        };
        if !metadata.is_file() {
            return Err(UploadError::NotAFile(path.to_path_buf()));
        }

        let absolute = tokio::fs::canonicalize(path).await?;
        let url = reqwest::Url::from_file_path(&absolute)
            .map_err(|_| UploadError::NotAFile(absolute.clone()))?;
        debug!(url = %url, bytes = metadata.len(), "Document ready");
        Ok(url.to_string())
    }
}
