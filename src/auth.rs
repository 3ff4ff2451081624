//! Sign-in, sign-up and logout.
//!
//! Server and transport failures are reported against the last field of
//! the form (password on sign-in, confirmation on sign-up), which is where
//! the page shows them.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::api::{AuthPayload, SignInRequest, SignUpRequest};
use crate::application::routes::Route;
use crate::context::PageDeps;
use crate::error::{ApiError, ValidationErrors};
use crate::session::SellerUser;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap());
static MOBILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{9,14}$").unwrap());

const MIN_PASSWORD: usize = 6;

#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email_or_mobile: String,
    pub password: SecretString,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.email_or_mobile.is_empty() {
            errors.add("emailOrMobile", "Email or mobile number is required");
        }
        check_password(&mut errors, "password", &self.password);
        errors.into_result()
    }

    fn to_request(&self) -> SignInRequest {
        SignInRequest {
            email_or_mobile: self.email_or_mobile.to_lowercase(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub email: String,
    pub mobile_number: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.email.is_empty() {
            errors.add("email", "Email is required");
        } else if !EMAIL.is_match(&self.email) {
            errors.add("email", "Invalid email address");
        }

        if self.mobile_number.is_empty() {
            errors.add("mobileNumber", "Mobile number is required");
        } else if !MOBILE.is_match(&self.mobile_number) {
            errors.add("mobileNumber", "Invalid mobile number format");
        }

        check_password(&mut errors, "password", &self.password);

        let confirm = self.password_confirm.expose_secret();
        if confirm.is_empty() {
            errors.add("passwordConfirm", "Please confirm your password");
        } else if confirm != self.password.expose_secret() {
            errors.add("passwordConfirm", "Passwords do not match");
        }

        errors.into_result()
    }

    fn to_request(&self) -> SignUpRequest {
        SignUpRequest {
            email: self.email.to_lowercase(),
            mobile_number: self.mobile_number.clone(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
        }
    }
}

fn check_password(errors: &mut ValidationErrors, field: &'static str, password: &SecretString) {
    let password = password.expose_secret();
    if password.is_empty() {
        errors.add(field, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD {
        errors.add(field, "Password must be at least 6 characters");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Session stored; navigated to `route`.
    SignedIn { user: SellerUser, route: Route },
    Invalid(ValidationErrors),
    /// Shown under `field`.
    Failed { field: &'static str, message: String },
}

/// The auth page.
pub struct AuthService {
    deps: PageDeps,
}

impl AuthService {
    pub fn new(deps: PageDeps) -> Self {
        Self { deps }
    }

    /// Opening the auth page while signed in goes straight to the dashboard.
    pub async fn enter(&self) -> Option<Route> {
        if self.deps.session.is_authenticated().await {
            self.deps.navigator.navigate(Route::Dashboard);
            Some(Route::Dashboard)
        } else {
            None
        }
    }

    pub async fn sign_in(&self, form: &SignInForm) -> AuthOutcome {
        if let Err(errors) = form.validate() {
            return AuthOutcome::Invalid(errors);
        }
        let result = self.deps.client.sign_in(&form.to_request()).await;
        self.complete(
            result,
            "password",
            "Invalid credentials. Please try again.",
        )
        .await
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> AuthOutcome {
        if let Err(errors) = form.validate() {
            return AuthOutcome::Invalid(errors);
        }
        let result = self.deps.client.sign_up(&form.to_request()).await;
        self.complete(
            result,
            "passwordConfirm",
            "Registration failed. Please try again.",
        )
        .await
    }

    /// Drop tokens and user together, then go home.
    pub async fn logout(&self) -> Route {
        logout(&self.deps).await
    }

    async fn complete(
        &self,
        result: Result<AuthPayload, ApiError>,
        field: &'static str,
        empty_reply: &str,
    ) -> AuthOutcome {
        let payload = match result {
            Ok(payload) => payload,
            Err(ApiError::InvalidResponse { operation, reason }) => {
                warn!(operation = %operation, "Auth reply unusable: {reason}");
                return AuthOutcome::Failed {
                    field,
                    message: empty_reply.to_string(),
                };
            }
            Err(e) => {
                warn!("Authentication failed: {e}");
                return AuthOutcome::Failed {
                    field,
                    message: e.user_message(),
                };
            }
        };

        let user = payload.user.clone();
        if let Err(e) = self.deps.session.save(payload.user, payload.tokens).await {
            warn!("Failed to store session: {e}");
            return AuthOutcome::Failed {
                field,
                message: "An unexpected error occurred. Please try again.".to_string(),
            };
        }

        info!(user = %user.display_name(), "Signed in");
        self.deps.navigator.navigate(Route::Dashboard);
        AuthOutcome::SignedIn {
            user,
            route: Route::Dashboard,
        }
    }
}

/// Clear the session and navigate to `/`.
pub async fn logout(deps: &PageDeps) -> Route {
    if let Err(e) = deps.session.clear().await {
        warn!("Failed to clear session: {e}");
    }
    deps.navigator.navigate(Route::Home);
    Route::Home
}
