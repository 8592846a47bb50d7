//! OpenAPI documentation configuration

use utoipa::OpenApi;

use crate::api;

/// Combined OpenAPI documentation for Commerce API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Commerce API",
        version = "0.1.0",
        description = "Commerce chatbot: intent routing, product retrieval, and LLM-formatted replies",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/chat", api = api::chat::ChatApi),
        (path = "/api/admin", api = api::admin::AdminApi)
    ),
    tags(
        (name = "Chat", description = "Shopping assistant endpoints"),
        (name = "Admin", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;
