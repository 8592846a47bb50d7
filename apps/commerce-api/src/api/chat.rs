//! Chat endpoint.

use axum::{extract::State, routing::post, Json, Router};
use axum_helpers::{
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
    AppError,
};
use domain_chat::{ChatRequest, ChatResponse};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI documentation for the chat endpoints
#[derive(OpenApi)]
#[openapi(
    paths(ask),
    components(
        schemas(
            ChatRequest,
            ChatResponse,
            domain_chat::ConversationTurn,
            domain_chat::Intent,
            domain_catalog::Product,
            domain_catalog::ProductAttributes,
        ),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Chat", description = "Shopping assistant endpoints")
    )
)]
pub struct ChatApi;

pub fn router(state: AppState) -> Router {
    Router::new().route("/ask", post(ask)).with_state(state)
}

/// Ask the shopping assistant.
///
/// Accepts text, an image, or both; when both are present the image drives
/// retrieval. Provider and store failures degrade to deterministic replies,
/// so this endpoint only errors on an empty request.
#[utoipa::path(
    post,
    path = "/ask",
    tag = "Chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply with up to three products", body = ChatResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.is_empty() {
        return Err(AppError::BadRequest(
            "Provide text_input or image_base64".to_string(),
        ));
    }

    let engine = state.engine().await;
    Ok(Json(engine.handle(&request).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::stub_state;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn empty_request_is_rejected() {
        let app = router(stub_state().await);
        let response = app.oneshot(post_json("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn greeting_answers_without_products() {
        let app = router(stub_state().await);
        let response = app
            .oneshot(post_json(r#"{"text_input": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["intent"], "general_chat");
        assert_eq!(body["products"], serde_json::json!([]));
        assert_eq!(body["metadata"], serde_json::json!({}));
    }
}
