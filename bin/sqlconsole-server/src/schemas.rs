//! Request / response shapes of the HTTP API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query-string parameters of `GET /query`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QueryParams {
    /// SQL statement to execute. Rejected if it contains a mutating keyword.
    pub sql: Option<String>,
}

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Database driver selected by the connection settings.
    pub backend: String,
    /// Per-query time limit in seconds, when one is configured.
    pub query_timeout_secs: Option<u64>,
}
