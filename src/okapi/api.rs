use async_trait::async_trait;

use super::session::{Credentials, Session};
use crate::error::ReplayError;
use crate::source::OrderLine;

/// The two Okapi calls a replay needs.
#[async_trait]
pub trait OkapiApi: Send + Sync {
    /// Authenticate and return the session used by every later call.
    async fn login(&self, credentials: &Credentials) -> Result<Session, ReplayError>;

    /// PUT one PO line back to orders-storage.
    async fn update_order_line(
        &self,
        session: &Session,
        order_line: &OrderLine,
    ) -> Result<(), ReplayError>;
}
