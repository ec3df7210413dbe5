//! `GET /query?sql=...`: gate, execute, return rows.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use sqlconsole_core::Record;
use tracing::debug;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::{ErrorBody, QueryParams};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(run_query), components(schemas(ErrorBody)))]
pub struct QueryApi;

/// Register the query route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/query", get(run_query))
}

/// Execute a read-only SQL statement.
///
/// Statements containing INSERT, UPDATE, DELETE, DROP, ALTER, TRUNCATE or
/// EXEC anywhere (case-insensitive) are rejected before a connection is
/// opened. Everything else runs on a fresh connection and all rows are
/// returned as an array of column-name → value objects.
#[utoipa::path(
    get,
    path = "/query",
    tag = "query",
    params(QueryParams),
    responses(
        (status = 200, description = "Rows returned", body = Vec<serde_json::Value>),
        (status = 400, description = "Rejected by the safety gate", body = ErrorBody),
        (status = 422, description = "Missing or malformed `sql` parameter", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody),
    )
)]
pub async fn run_query(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<Vec<Record>>, ServerError> {
    let Query(params) = params.map_err(|e| ServerError::Unprocessable(e.body_text()))?;
    let sql = params
        .sql
        .ok_or_else(|| ServerError::Unprocessable("missing required query parameter `sql`".into()))?;

    debug!(sql_len = sql.len(), "query received");
    let rows = state.gateway.execute(&sql).await?;
    Ok(Json(rows))
}
