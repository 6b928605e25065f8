use axum::extract::State;
use axum::Json;
use pollflow_core::AppState;
use pollflow_models::ChatMessage;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub question: String,
    pub message: String,
    #[serde(default)]
    pub past_messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct SummaryRequest {
    pub question: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

pub async fn respond(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".into()));
    }
    let response = state
        .assistant
        .respond(&body.question, &body.message, &body.past_messages)
        .await?;
    Ok(Json(json!({ "response": response })))
}

pub async fn summary(
    State(state): State<AppState>,
    Json(body): Json<SummaryRequest>,
) -> Result<Json<Value>, ApiError> {
    let summary = state
        .assistant
        .summarize(&body.question, &body.messages)
        .await?;
    Ok(Json(json!({ "summary": summary })))
}
