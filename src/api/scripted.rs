//! Scripted transport for unit tests.
//!
//! Replies are queued per operation name. The last reply for an operation
//! repeats once its queue drains to one entry, so pollers can tick freely.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::operations::Operation;
use super::transport::{GraphQlRequest, GraphQlResponse, Transport};
use crate::application::model::StatusSnapshot;
use crate::error::ApiError;

#[derive(Clone)]
enum Scripted {
    Reply(GraphQlResponse),
    Network,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<&'static str, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(&'static str, Value)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, operation: &Operation, scripted: Scripted) {
        self.replies
            .lock()
            .unwrap()
            .entry(operation.name)
            .or_default()
            .push_back(scripted);
    }

    pub(crate) fn reply(&self, operation: &Operation, payload: Value) {
        self.push(
            operation,
            Scripted::Reply(GraphQlResponse::with_field(operation.field, payload)),
        );
    }

    pub(crate) fn reply_status(&self, snapshot: &StatusSnapshot) {
        self.reply(
            &super::operations::SELLER_APPLICATION_STATUS,
            serde_json::to_value(snapshot).unwrap(),
        );
    }

    pub(crate) fn reply_error(&self, operation: &Operation, message: &str) {
        self.push(operation, Scripted::Reply(GraphQlResponse::with_error(message)));
    }

    pub(crate) fn fail(&self, operation: &Operation) {
        self.push(operation, Scripted::Network);
    }

    /// Operation names in call order.
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(name, _)| *name).collect()
    }

    pub(crate) fn count(&self, operation: &Operation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == operation.name)
            .count()
    }

    pub(crate) fn last_variables(&self) -> Option<Value> {
        self.calls.lock().unwrap().last().map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &GraphQlRequest) -> Result<GraphQlResponse, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.operation_name, request.variables.clone()));

        let next = {
            let mut replies = self.replies.lock().unwrap();
            replies.get_mut(request.operation_name).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };

        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Network) => Err(ApiError::Network("connection refused".into())),
            None => Err(ApiError::Network(format!(
                "no scripted reply for {}",
                request.operation_name
            ))),
        }
    }
}
