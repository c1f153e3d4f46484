//! Okapi session and orders-storage client.

pub mod api;
pub mod client;
pub mod mock;
pub mod session;

pub use api::OkapiApi;
pub use client::{OkapiClient, LOGIN_PATH, PO_LINES_PATH, TENANT_HEADER, TOKEN_HEADER};
pub use session::{Credentials, Session};
