//! In-memory Okapi for deterministic testing
//!
//! Implements [`OkapiApi`] without any network I/O. Every call is recorded
//! in arrival order, and the number of calls in flight is tracked so tests
//! can assert that replays never overlap.
//!
//! # Example
//! ```no_run
//! use rollover_replay::okapi::mock::MockOkapi;
//! use rollover_replay::okapi::{Credentials, OkapiApi};
//!
//! # async fn demo() {
//! let api = MockOkapi::new().rejecting("bad-id", 422);
//! let session = api.login(&Credentials::new("u", "p")).await.unwrap();
//! assert_eq!(session.token(), "mock-token");
//! # }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::Value;

use super::api::OkapiApi;
use super::client::{LOGIN_PATH, PO_LINES_PATH};
use super::session::{Credentials, Session};
use crate::error::ReplayError;
use crate::source::OrderLine;

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Login { username: String },
    Update { id: String, token: String, body: Value },
}

pub struct MockOkapi {
    token: String,
    login_status: Option<StatusCode>,
    rejected: HashMap<String, StatusCode>,
    call_delay: Duration,
    calls: Mutex<Vec<MockCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockOkapi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOkapi {
    pub fn new() -> Self {
        Self {
            token: "mock-token".to_string(),
            login_status: None,
            rejected: HashMap::new(),
            call_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    /// Make login fail with the given status.
    pub fn failing_login(mut self, status: u16) -> Self {
        self.login_status = StatusCode::from_u16(status).ok();
        self
    }

    /// Reject the PUT for one PO line id.
    pub fn rejecting(mut self, id: &str, status: u16) -> Self {
        if let Ok(status) = StatusCode::from_u16(status) {
            self.rejected.insert(id.to_string(), status);
        }
        self
    }

    /// Sleep inside every call, widening the window for overlapping requests.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Ids of every PUT attempted, in order.
    pub fn updated_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                MockCall::Update { id, .. } => Some(id.clone()),
                MockCall::Login { .. } => None,
            })
            .collect()
    }

    /// Highest number of calls that were ever running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, call: MockCall) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().push(call);
        if !self.call_delay.is_zero() {
            tokio::time::sleep(self.call_delay).await;
        } else {
            tokio::task::yield_now().await;
        }
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl OkapiApi for MockOkapi {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ReplayError> {
        self.enter(MockCall::Login {
            username: credentials.username.clone(),
        })
        .await;
        self.exit();

        match self.login_status {
            Some(status) => Err(ReplayError::Status {
                method: "POST",
                path: LOGIN_PATH.to_string(),
                status,
                body: "Invalid credentials".to_string(),
            }),
            None => Ok(Session::new(self.token.as_str())),
        }
    }

    async fn update_order_line(
        &self,
        session: &Session,
        order_line: &OrderLine,
    ) -> Result<(), ReplayError> {
        self.enter(MockCall::Update {
            id: order_line.id().to_string(),
            token: session.token().to_string(),
            body: order_line.clone().into_value(),
        })
        .await;
        self.exit();

        match self.rejected.get(order_line.id()) {
            Some(status) => Err(ReplayError::Status {
                method: "PUT",
                path: format!("{}/{}", PO_LINES_PATH, order_line.id()),
                status: *status,
                body: format!("{{\"errors\":[{{\"message\":\"rejected {}\"}}]}}", order_line.id()),
            }),
            None => Ok(()),
        }
    }
}
