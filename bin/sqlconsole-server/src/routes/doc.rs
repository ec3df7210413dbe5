use utoipa::OpenApi;

use crate::routes::{health, query};

#[derive(OpenApi)]
#[openapi(info(
    title = "sqlconsole-server",
    description = "Read-only SQL query gateway",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(query::QueryApi::openapi());
    root
}
