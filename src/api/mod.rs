//! Seller API client.
//!
//! [`SellerClient`] turns each remote operation into a typed call over a
//! [`Transport`]. Any GraphQL error on a response is treated as a remote
//! rejection carrying the first error's message.

pub mod model;
pub mod operations;
pub mod transport;

#[cfg(test)]
pub(crate) mod scripted;

pub use model::{
    AuthPayload, BankDetailsRequest, SaveResult, ShippingAddressRequest, SignInRequest,
    SignUpRequest, StepProfile, SubmitResult, SubmittedProfile, TaxDetailsRequest,
};
pub use operations::Operation;
pub use transport::{GraphQlError, GraphQlRequest, GraphQlResponse, HttpTransport, Transport};

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::application::model::StatusSnapshot;
use crate::error::ApiError;

use model::{ApplicationStatusWire, AuthPayloadWire};

/// Typed access to the seller onboarding operations.
#[derive(Clone)]
pub struct SellerClient {
    transport: Arc<dyn Transport>,
}

impl SellerClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AuthPayload, ApiError> {
        let variables = json!({
            "emailOrMobile": request.email_or_mobile,
            "password": request.password.expose_secret(),
        });
        let wire: AuthPayloadWire = self.run(&operations::SIGN_IN, variables).await?;
        Ok(wire.into())
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthPayload, ApiError> {
        let variables = json!({
            "email": request.email,
            "mobileNumber": request.mobile_number,
            "password": request.password.expose_secret(),
            "passwordConfirm": request.password_confirm.expose_secret(),
        });
        let wire: AuthPayloadWire = self.run(&operations::SIGN_UP, variables).await?;
        Ok(wire.into())
    }

    /// Fetch a fresh status snapshot. Never served from a cache.
    pub async fn application_status(&self) -> Result<StatusSnapshot, ApiError> {
        let wire: ApplicationStatusWire = self
            .run(&operations::SELLER_APPLICATION_STATUS, json!({}))
            .await?;
        Ok(wire.into())
    }

    pub async fn save_tax_details(
        &self,
        request: &TaxDetailsRequest,
    ) -> Result<SaveResult, ApiError> {
        let variables = match request {
            TaxDetailsRequest::Gst { gst_number } => json!({
                "documentType": request.document_type(),
                "gstNumber": gst_number,
            }),
            TaxDetailsRequest::Pan {
                pan_number,
                pan_document_url,
            } => json!({
                "documentType": request.document_type(),
                "panNumber": pan_number,
                "panDocumentUrl": pan_document_url,
            }),
        };
        self.run(&operations::SAVE_GST_PAN_DETAILS, variables).await
    }

    pub async fn save_store_name(&self, store_name: &str) -> Result<SaveResult, ApiError> {
        self.run(
            &operations::SAVE_STORE_NAME,
            json!({ "storeName": store_name }),
        )
        .await
    }

    pub async fn save_shipping_address(
        &self,
        request: &ShippingAddressRequest,
    ) -> Result<SaveResult, ApiError> {
        let variables = json!({
            "pincode": request.pincode,
            "city": request.city,
            "state": request.state,
            "address": request.address,
        });
        self.run(&operations::SAVE_SHIPPING_ADDRESS, variables).await
    }

    pub async fn save_bank_details(
        &self,
        request: &BankDetailsRequest,
    ) -> Result<SaveResult, ApiError> {
        let variables = json!({
            "accountHolderName": request.account_holder_name,
            "bankAccountNumber": request.bank_account_number,
            "confirmAccountNumber": request.confirm_account_number,
            "ifscCode": request.ifsc_code,
        });
        self.run(&operations::SAVE_BANK_DETAILS, variables).await
    }

    pub async fn submit_application(&self) -> Result<SubmitResult, ApiError> {
        self.run(&operations::SUBMIT_SELLER_APPLICATION, json!({}))
            .await
    }

    async fn run<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
    ) -> Result<T, ApiError> {
        debug!(operation = operation.name, "Executing remote operation");
        let request = GraphQlRequest::new(operation, variables);
        let response = self.transport.execute(&request).await?;

        if let Some(first) = response.errors.first() {
            return Err(ApiError::Rejected {
                message: first.message.clone(),
            });
        }

        let payload = response
            .data
            .and_then(|mut data| data.get_mut(operation.field).map(Value::take))
            .filter(|value| !value.is_null())
            .ok_or_else(|| ApiError::InvalidResponse {
                operation: operation.name.to_string(),
                reason: format!("missing `{}` in response data", operation.field),
            })?;

        serde_json::from_value(payload).map_err(|e| ApiError::InvalidResponse {
            operation: operation.name.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model::{ApplicationStatus, FeedbackItem};
    use scripted::ScriptedTransport;

    #[tokio::test]
    async fn application_status_decodes_snapshot() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(
            &operations::SELLER_APPLICATION_STATUS,
            json!({
                "status": "DRAFT",
                "currentStep": 3,
                "hasPendingCorrections": true,
                "pendingFeedback": [
                    {"step": 4, "needsCorrection": true, "feedback": "Wrong pincode", "resubmitted": false}
                ],
                "message": null,
                "isActive": true
            }),
        );
        let client = SellerClient::new(transport.clone());

        let snapshot = client.application_status().await.unwrap();
        assert_eq!(snapshot.status, ApplicationStatus::Draft);
        assert_eq!(snapshot.current_step, Some(3));
        assert_eq!(
            snapshot.pending_feedback,
            vec![FeedbackItem {
                step: 4,
                needs_correction: true,
                feedback: "Wrong pincode".into(),
                resubmitted: false,
            }]
        );
        assert_eq!(transport.calls(), vec!["SellerApplicationStatus"]);
    }

    #[tokio::test]
    async fn graphql_error_becomes_rejection() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_error(&operations::SIGN_IN, "Invalid credentials");
        let client = SellerClient::new(transport);

        let err = client
            .sign_in(&SignInRequest {
                email_or_mobile: "seller@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { ref message } if message == "Invalid credentials"));
    }

    #[tokio::test]
    async fn null_payload_is_invalid_response() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(&operations::SUBMIT_SELLER_APPLICATION, Value::Null);
        let client = SellerClient::new(transport);

        let err = client.submit_application().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { ref operation, .. } if operation == "SubmitSellerApplication"));
    }

    #[tokio::test]
    async fn tax_details_send_only_the_chosen_mode() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(
            &operations::SAVE_GST_PAN_DETAILS,
            json!({"success": true, "message": "Saved", "sellerProfile": {"currentStep": 3, "step2Completed": true}}),
        );
        let client = SellerClient::new(transport.clone());

        let result = client
            .save_tax_details(&TaxDetailsRequest::Pan {
                pan_number: "ABCDE1234F".into(),
                pan_document_url: Some("file:///tmp/pan.pdf".into()),
            })
            .await
            .unwrap();
        assert!(result.success);

        let variables = transport.last_variables().unwrap();
        assert_eq!(variables["documentType"], "PAN");
        assert_eq!(variables["panNumber"], "ABCDE1234F");
        assert!(variables.get("gstNumber").is_none());
    }

    #[tokio::test]
    async fn network_failure_passes_through() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(&operations::SELLER_APPLICATION_STATUS);
        let client = SellerClient::new(transport);

        let err = client.application_status().await.unwrap_err();
        assert!(err.is_network());
    }
}
