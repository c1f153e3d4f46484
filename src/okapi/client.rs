use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use super::api::OkapiApi;
use super::session::{Credentials, Session};
use crate::config::Config;
use crate::error::ReplayError;
use crate::source::OrderLine;

pub const TENANT_HEADER: &str = "x-okapi-tenant";
pub const TOKEN_HEADER: &str = "x-okapi-token";
pub const LOGIN_PATH: &str = "/bl-users/login";
pub const PO_LINES_PATH: &str = "/orders-storage/po-lines";

/// HTTP client for one Okapi tenant.
#[derive(Clone)]
pub struct OkapiClient {
    base_url: String,
    tenant: String,
    client: Client,
}

impl OkapiClient {
    pub fn new(
        base_url: impl Into<String>,
        tenant: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ReplayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tenant: tenant.into(),
            client: builder.build()?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ReplayError> {
        Self::new(
            config.base_url.clone(),
            config.tenant.clone(),
            config.request_timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a status >= 400 into an error carrying the raw response body.
    async fn check(
        response: Response,
        method: &'static str,
        path: String,
    ) -> Result<Response, ReplayError> {
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplayError::Status {
                method,
                path,
                status,
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl OkapiApi for OkapiClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ReplayError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .header(TENANT_HEADER, &self.tenant)
            .json(credentials)
            .send()
            .await?;
        let response = Self::check(response, "POST", LOGIN_PATH.to_string()).await?;

        response
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|token| !token.is_empty())
            .map(Session::new)
            .ok_or(ReplayError::MissingToken)
    }

    async fn update_order_line(
        &self,
        session: &Session,
        order_line: &OrderLine,
    ) -> Result<(), ReplayError> {
        let path = format!("{}/{}", PO_LINES_PATH, order_line.id());
        let response = self
            .client
            .put(self.url(&path))
            .header(TENANT_HEADER, &self.tenant)
            .header(TOKEN_HEADER, session.token())
            .json(order_line)
            .send()
            .await?;
        Self::check(response, "PUT", path).await?;
        Ok(())
    }
}
