//! Client side of the query gateway (`GET /query?sql=...`).

use std::future::Future;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::GatewayClientError;
use crate::record::Record;

/// Default gateway endpoint.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8000/query";

/// Something that executes a SQL string and returns rows.
pub trait QueryGateway: Send + Sync {
    fn run_query(
        &self,
        sql: &str,
    ) -> impl Future<Output = Result<Vec<Record>, GatewayClientError>> + Send;
}

/// Error body returned by the gateway on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Calls a remote gateway over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    /// `endpoint` is the full query URL, e.g. `http://127.0.0.1:8000/query`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self { http, endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query_url(&self, sql: &str) -> Result<Url, GatewayClientError> {
        Url::parse_with_params(&self.endpoint, &[("sql", sql)]).map_err(|e| {
            GatewayClientError::InvalidUrl { url: self.endpoint.clone(), message: e.to_string() }
        })
    }
}

impl QueryGateway for HttpGateway {
    async fn run_query(&self, sql: &str) -> Result<Vec<Record>, GatewayClientError> {
        let url = self.query_url(sql)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), body_len = body.len(), "gateway response");

        if status != StatusCode::OK {
            return Err(GatewayClientError::Status {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        serde_json::from_str::<Vec<Record>>(&body)
            .map_err(|e| GatewayClientError::InvalidBody(e.to_string()))
    }
}

/// The `detail` field of an error body, or the raw body when it has none.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { detail: Value::String(s) }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.to_owned(),
    }
}
