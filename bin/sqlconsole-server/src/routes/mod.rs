//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Health / heartbeat route
//! - `GET /query`, the gated SQL endpoint
//! - Optional OpenAPI document (disable with `SQLCONSOLE_ENABLE_DOCS=false`)

pub mod doc;
mod health;
mod query;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router, middleware};
use tower::ServiceBuilder;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(query::router());

    if state.config.enable_docs {
        let api_doc = doc::get_docs();
        app = app.route("/api-docs/openapi.json", get(move || async move { Json(api_doc) }));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(&state.config)))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
