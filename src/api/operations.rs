//! GraphQL documents for every remote operation the client issues.

/// A named operation and the top-level response field it populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub field: &'static str,
    pub document: &'static str,
}

pub const SIGN_IN: Operation = Operation {
    name: "SignIn",
    field: "signIn",
    document: r#"
mutation SignIn($emailOrMobile: String!, $password: String!) {
  signIn(emailOrMobile: $emailOrMobile, password: $password) {
    message
    user { id email mobileNumber }
    accessToken
    refreshToken
  }
}"#,
};

pub const SIGN_UP: Operation = Operation {
    name: "SignUp",
    field: "signUp",
    document: r#"
mutation SignUp($email: String!, $mobileNumber: String!, $password: String!, $passwordConfirm: String!) {
  signUp(email: $email, mobileNumber: $mobileNumber, password: $password, passwordConfirm: $passwordConfirm) {
    message
    user { id email mobileNumber }
    accessToken
    refreshToken
  }
}"#,
};

pub const SELLER_APPLICATION_STATUS: Operation = Operation {
    name: "SellerApplicationStatus",
    field: "sellerApplicationStatus",
    document: r#"
query SellerApplicationStatus {
  sellerApplicationStatus {
    status
    currentStep
    hasPendingCorrections
    pendingFeedback { step needsCorrection feedback resubmitted }
    message
    isActive
  }
}"#,
};

pub const SAVE_GST_PAN_DETAILS: Operation = Operation {
    name: "SaveGstPanDetails",
    field: "saveGstPanDetails",
    document: r#"
mutation SaveGstPanDetails($documentType: String!, $gstNumber: String, $panNumber: String, $panDocumentUrl: String) {
  saveGstPanDetails(documentType: $documentType, gstNumber: $gstNumber, panNumber: $panNumber, panDocumentUrl: $panDocumentUrl) {
    success
    message
    sellerProfile { currentStep step2Completed }
  }
}"#,
};

pub const SAVE_STORE_NAME: Operation = Operation {
    name: "SaveStoreName",
    field: "saveStoreName",
    document: r#"
mutation SaveStoreName($storeName: String!) {
  saveStoreName(storeName: $storeName) {
    success
    message
    sellerProfile { currentStep step3Completed }
  }
}"#,
};

pub const SAVE_SHIPPING_ADDRESS: Operation = Operation {
    name: "SaveShippingAddress",
    field: "saveShippingAddress",
    document: r#"
mutation SaveShippingAddress($pincode: String!, $city: String!, $state: String!, $address: String!) {
  saveShippingAddress(pincode: $pincode, city: $city, state: $state, address: $address) {
    success
    message
    sellerProfile { currentStep step4Completed }
  }
}"#,
};

pub const SAVE_BANK_DETAILS: Operation = Operation {
    name: "SaveBankDetails",
    field: "saveBankDetails",
    document: r#"
mutation SaveBankDetails($accountHolderName: String!, $bankAccountNumber: String!, $confirmAccountNumber: String!, $ifscCode: String!) {
  saveBankDetails(accountHolderName: $accountHolderName, bankAccountNumber: $bankAccountNumber, confirmAccountNumber: $confirmAccountNumber, ifscCode: $ifscCode) {
    success
    message
    sellerProfile { currentStep step5Completed allStepsCompleted }
  }
}"#,
};

pub const SUBMIT_SELLER_APPLICATION: Operation = Operation {
    name: "SubmitSellerApplication",
    field: "submitSellerApplication",
    document: r#"
mutation SubmitSellerApplication {
  submitSellerApplication {
    success
    message
    sellerProfile { applicationStatus submittedAt }
  }
}"#,
};
