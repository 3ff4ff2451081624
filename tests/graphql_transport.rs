//! Integration tests for the HTTP GraphQL transport.
//!
//! Each test spins up a stub GraphQL server on a random port and drives the
//! real `HttpTransport` against it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use seller_onboarding::api::{HttpTransport, SellerClient};
use seller_onboarding::application::{Route, RouteHistory};
use seller_onboarding::auth::{AuthOutcome, AuthService, SignInForm};
use seller_onboarding::config::ClientConfig;
use seller_onboarding::context::PageDeps;
use seller_onboarding::error::ApiError;
use seller_onboarding::pages;
use seller_onboarding::session::{Session, SessionStore};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// What the stub saw: operation name and Authorization header per request.
type Seen = Arc<Mutex<Vec<(String, Option<String>)>>>;

async fn graphql(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push((operation.clone(), auth.clone()));

    let reply = match operation.as_str() {
        "SignIn" => {
            if body["variables"]["password"] == "secret1" {
                json!({"data": {"signIn": {
                    "message": "Welcome back",
                    "user": {"id": "42", "email": body["variables"]["emailOrMobile"], "mobileNumber": null},
                    "accessToken": "token-42",
                    "refreshToken": "refresh-42"
                }}})
            } else {
                json!({"data": {"signIn": null}, "errors": [{"message": "Invalid credentials", "path": ["signIn"]}]})
            }
        }
        "SellerApplicationStatus" if auth.as_deref() == Some("Bearer token-42") => {
            json!({"data": {"sellerApplicationStatus": {
                "status": "PENDING",
                "currentStep": 5,
                "hasPendingCorrections": false,
                "pendingFeedback": [],
                "message": "Under review",
                "isActive": true
            }}})
        }
        "SellerApplicationStatus" => {
            json!({"data": null, "errors": [{"message": "Authentication required"}]})
        }
        _ => json!({"data": null, "errors": [{"message": format!("unknown operation {operation}")}]}),
    };
    Json(reply)
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "upstream unavailable")
}

/// Start the stub on a random port, return (port, seen requests).
async fn start_server() -> (u16, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/graphql/", post(graphql))
        .route("/broken/", post(broken))
        .with_state(Arc::clone(&seen));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, seen)
}

fn config(endpoint: String) -> ClientConfig {
    ClientConfig {
        endpoint,
        request_timeout: Duration::from_secs(2),
        session_path: None,
        ..ClientConfig::default()
    }
}

fn session() -> Arc<dyn SessionStore> {
    Arc::new(Session::in_memory(
        chrono::Duration::days(7),
        chrono::Duration::days(30),
    ))
}

#[tokio::test]
async fn sign_in_then_status_sends_bearer_token() {
    timeout(TEST_TIMEOUT, async {
        let (port, seen) = start_server().await;
        let history = Arc::new(RouteHistory::new());
        let deps = PageDeps::connect(
            &config(format!("http://127.0.0.1:{port}/graphql/")),
            session(),
            history.clone(),
        )
        .unwrap();

        let outcome = AuthService::new(deps.clone())
            .sign_in(&SignInForm {
                email_or_mobile: "Seller@Example.com".into(),
                password: "secret1".into(),
            })
            .await;
        match outcome {
            AuthOutcome::SignedIn { user, route } => {
                assert_eq!(user.id, "42");
                assert_eq!(user.email.as_deref(), Some("seller@example.com"));
                assert_eq!(route, Route::Dashboard);
            }
            other => panic!("sign-in failed: {other:?}"),
        }

        let route = pages::land(&deps).await;
        assert_eq!(route, Route::ApplicationPending);
        assert_eq!(history.history(), vec![Route::Dashboard, Route::ApplicationPending]);

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen[0], ("SignIn".to_string(), None));
        assert_eq!(
            seen[1],
            (
                "SellerApplicationStatus".to_string(),
                Some("Bearer token-42".to_string())
            )
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn graphql_errors_become_rejections() {
    timeout(TEST_TIMEOUT, async {
        let (port, _seen) = start_server().await;
        let transport =
            HttpTransport::new(&config(format!("http://127.0.0.1:{port}/graphql/")), session())
                .unwrap();
        let client = SellerClient::new(Arc::new(transport));

        let err = client.application_status().await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { ref message } if message == "Authentication required"));
        assert_eq!(err.user_message(), "Authentication required");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn wrong_password_shows_server_message() {
    timeout(TEST_TIMEOUT, async {
        let (port, _seen) = start_server().await;
        let session = session();
        let deps = PageDeps::connect(
            &config(format!("http://127.0.0.1:{port}/graphql/")),
            session.clone(),
            Arc::new(RouteHistory::new()),
        )
        .unwrap();

        let outcome = AuthService::new(deps)
            .sign_in(&SignInForm {
                email_or_mobile: "seller@example.com".into(),
                password: "wrong-one".into(),
            })
            .await;
        assert_eq!(
            outcome,
            AuthOutcome::Failed {
                field: "password",
                message: "Invalid credentials".into(),
            }
        );
        assert!(!session.is_authenticated().await);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn non_json_error_page_is_http_error() {
    timeout(TEST_TIMEOUT, async {
        let (port, _seen) = start_server().await;
        let transport =
            HttpTransport::new(&config(format!("http://127.0.0.1:{port}/broken/")), session())
                .unwrap();
        let client = SellerClient::new(Arc::new(transport));

        let err = client.application_status().await.unwrap_err();
        match err {
            ApiError::Http { status, ref body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream unavailable");
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_endpoint_is_network_error() {
    timeout(TEST_TIMEOUT, async {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport =
            HttpTransport::new(&config(format!("http://127.0.0.1:{port}/graphql/")), session())
                .unwrap();
        let client = SellerClient::new(Arc::new(transport));

        let err = client.application_status().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(
            err.user_message(),
            "Network error. Please check your connection."
        );
    })
    .await
    .expect("test timed out");
}
