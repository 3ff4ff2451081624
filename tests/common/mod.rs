//! Shared fixtures for the integration tests.
//!
//! Pages run against the real `HttpTransport`, pointed at an axum stub that
//! answers each GraphQL operation from a queue of canned replies.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;

use seller_onboarding::api::operations::{Operation, SELLER_APPLICATION_STATUS};
use seller_onboarding::application::{RouteHistory, StatusSnapshot};
use seller_onboarding::config::ClientConfig;
use seller_onboarding::context::PageDeps;
use seller_onboarding::session::{SellerUser, Session, SessionStore, SessionTokens};

/// Canned replies keyed by operation name. The last reply for an operation
/// keeps answering once its queue is down to one.
#[derive(Default)]
pub struct StubServer {
    replies: Mutex<HashMap<String, VecDeque<Value>>>,
    calls: Mutex<Vec<String>>,
}

impl StubServer {
    pub fn reply(&self, operation: &Operation, payload: Value) {
        let mut data = Map::new();
        data.insert(operation.field.to_string(), payload);
        self.replies
            .lock()
            .unwrap()
            .entry(operation.name.to_string())
            .or_default()
            .push_back(json!({ "data": data }));
    }

    pub fn status(&self, snapshot: &StatusSnapshot) {
        self.reply(&SELLER_APPLICATION_STATUS, serde_json::to_value(snapshot).unwrap());
    }

    pub fn count(&self, operation: &Operation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|name| *name == operation.name)
            .count()
    }

    fn answer(&self, operation: &str) -> Value {
        self.calls.lock().unwrap().push(operation.to_string());
        let mut replies = self.replies.lock().unwrap();
        let next = replies.get_mut(operation).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });
        next.unwrap_or_else(|| {
            json!({ "data": null, "errors": [{ "message": format!("no reply for {operation}") }] })
        })
    }
}

async fn graphql(State(stub): State<Arc<StubServer>>, Json(body): Json<Value>) -> Json<Value> {
    let operation = body["operationName"].as_str().unwrap_or_default();
    Json(stub.answer(operation))
}

pub struct Fixture {
    pub server: Arc<StubServer>,
    pub history: Arc<RouteHistory>,
    pub deps: PageDeps,
}

/// Signed-in page dependencies talking to a fresh stub server.
pub async fn signed_in() -> Fixture {
    let server = Arc::new(StubServer::default());
    let app = Router::new()
        .route("/graphql/", post(graphql))
        .with_state(Arc::clone(&server));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let session = Arc::new(Session::in_memory(
        chrono::Duration::days(7),
        chrono::Duration::days(30),
    ));
    session
        .save(
            SellerUser {
                id: "seller-1".into(),
                email: Some("asha@example.com".into()),
                mobile_number: None,
            },
            SessionTokens {
                access_token: "access".into(),
                refresh_token: "refresh".into(),
            },
        )
        .await
        .unwrap();

    let config = ClientConfig {
        endpoint: format!("http://127.0.0.1:{port}/graphql/"),
        request_timeout: Duration::from_secs(2),
        session_path: None,
        ..ClientConfig::default()
    };
    let history = Arc::new(RouteHistory::new());
    let mut deps = PageDeps::connect(&config, session, history.clone()).unwrap();
    deps.poll_interval = Duration::from_millis(20);

    Fixture {
        server,
        history,
        deps,
    }
}
