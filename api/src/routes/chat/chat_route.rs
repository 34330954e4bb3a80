use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use contextor::ChatResponse;
use tracing::{debug, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    middleware_layer::json_extractor::ValidJson,
    routes::chat::chat_request::ChatRequest,
};

/// `POST /api/chat`: validate, delegate to the chain, respond.
pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidJson(query): ValidJson<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let request_id = headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    debug!(
        request_id = %request_id,
        query_chars = query.query.chars().count(),
        "chat_route: start"
    );

    let resp = state.chain.chat(&query).await?;

    info!(
        request_id = %request_id,
        sources = resp.sources.len(),
        "chat_route: success"
    );
    Ok(Json(resp))
}
