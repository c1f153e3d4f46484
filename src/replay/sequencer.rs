//! Strictly ordered replay of recovered PO lines.
//!
//! One worker owns the session. It logs in first, then pulls records off the
//! queue one at a time and waits for each PUT to settle before taking the
//! next, so at most one request is ever in flight.
//!
//! Failure policy:
//! - login failure aborts the drain before any PUT is issued;
//! - a failed PUT is logged with the PO line id and the run moves on.

use tokio::sync::mpsc;

use crate::error::ReplayError;
use crate::okapi::{Credentials, OkapiApi};
use crate::source::OrderLine;

/// Outcome counts for the PUTs issued by one drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayTally {
    pub succeeded: usize,
    pub failed: usize,
}

impl ReplayTally {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub struct Sequencer<A> {
    api: A,
    credentials: Credentials,
}

impl<A: OkapiApi> Sequencer<A> {
    pub fn new(api: A, credentials: Credentials) -> Self {
        Self { api, credentials }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Log in, then replay every queued record in arrival order.
    ///
    /// Returns once the queue is closed and empty. A login error is returned
    /// as-is and the queue is dropped unread.
    pub async fn drain(
        &self,
        mut queue: mpsc::Receiver<OrderLine>,
    ) -> Result<ReplayTally, ReplayError> {
        tracing::info!(username = %self.credentials.username, "Logging in to Okapi");
        let session = match self.api.login(&self.credentials).await {
            Ok(session) => session,
            Err(err) => {
                tracing::error!(error = %err, "Login failed, no PO lines will be replayed");
                return Err(err);
            }
        };
        tracing::info!("Login successful");

        let mut tally = ReplayTally::default();
        while let Some(order_line) = queue.recv().await {
            let id = order_line.id();
            tracing::debug!(id = %id, "Attempting to save order line");
            match self.api.update_order_line(&session, &order_line).await {
                Ok(()) => {
                    tally.succeeded += 1;
                    tracing::info!(id = %id, "Order line saved");
                }
                Err(err) => {
                    tally.failed += 1;
                    tracing::warn!(id = %id, error = %err, "Order line was not saved");
                }
            }
        }
        Ok(tally)
    }
}
