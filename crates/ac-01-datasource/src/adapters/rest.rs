//! # REST Adapter
//!
//! Treats the query as a URL (with `${var}` tokens filled from params),
//! performs a GET and parses the body as JSON. Never streams.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use shared_types::Params;
use tracing::debug;

use crate::domain::errors::AdapterError;
use crate::domain::query::substitute_variables;
use crate::ports::DataSourceAdapter;

/// HTTP GET adapter.
pub struct RestAdapter {
    client: reqwest::Client,
}

impl RestAdapter {
    /// Registry id.
    pub const ID: &'static str = "rest";

    /// Create an adapter with its own client and request timeout.
    pub fn new(timeout: Duration) -> Result<Self, AdapterError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Create an adapter around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSourceAdapter for RestAdapter {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn execute(&self, query: &str, params: &Params) -> Result<Value, AdapterError> {
        let url = substitute_variables(query.trim(), params);
        if url.is_empty() {
            return Err(AdapterError::invalid_query(Self::ID, "URL is empty"));
        }

        debug!(url = %url, "REST fetch");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
