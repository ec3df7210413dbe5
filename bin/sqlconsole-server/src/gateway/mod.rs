//! Query execution behind the safety gate.
//!
//! [`QueryExecutor`] is the driver seam: it receives SQL that already passed
//! [`sqlconsole_core::is_safe`] and materialises every row. The default
//! implementation is [`any::AnyExecutor`]. [`Gateway`] applies the gate,
//! the optional timeout, and folds every driver failure into
//! [`GatewayError::Execution`].

pub mod any;

use std::future::Future;
use std::time::Duration;

use sqlconsole_core::{Record, forbidden_keyword};
use thiserror::Error;
use tracing::{error, info, warn};

/// Executes a vetted statement and returns all of its rows.
pub trait QueryExecutor: Send + Sync + 'static {
    fn fetch_records(
        &self,
        sql: &str,
    ) -> impl Future<Output = Result<Vec<Record>, sqlx::Error>> + Send;
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The safety gate rejected the statement; no connection was opened.
    #[error("forbidden query: contains `{keyword}`")]
    Forbidden { keyword: &'static str },

    /// Connection, driver, decoding or timeout failure. Carries the raw message.
    #[error("{0}")]
    Execution(String),
}

#[derive(Debug)]
pub struct Gateway<E> {
    executor: E,
    timeout: Option<Duration>,
}

impl<E: QueryExecutor> Gateway<E> {
    pub fn new(executor: E, timeout: Option<Duration>) -> Self {
        Self { executor, timeout }
    }

    /// Gate, then execute `sql`. All rows or an error; never a partial result.
    pub async fn execute(&self, sql: &str) -> Result<Vec<Record>, GatewayError> {
        if let Some(keyword) = forbidden_keyword(sql) {
            warn!(keyword, "query rejected by safety gate");
            return Err(GatewayError::Forbidden { keyword });
        }

        let fetch = self.executor.fetch_records(sql);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => {
                    error!(timeout_secs = limit.as_secs(), "query timed out");
                    return Err(GatewayError::Execution(format!(
                        "query timed out after {}s",
                        limit.as_secs()
                    )));
                }
            },
            None => fetch.await,
        };

        match result {
            Ok(rows) => {
                info!(rows = rows.len(), "query executed");
                Ok(rows)
            }
            Err(e) => {
                error!(error = %e, "query execution failed");
                Err(GatewayError::Execution(e.to_string()))
            }
        }
    }
}
