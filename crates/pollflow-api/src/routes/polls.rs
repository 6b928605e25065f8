use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use pollflow_core::{report, results, AppState};
use pollflow_models::Poll;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_text_based: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub option_id: String,
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

pub async fn list_polls(State(state): State<AppState>) -> Result<Json<Vec<Poll>>, ApiError> {
    Ok(Json(state.backend.list_polls().await?))
}

pub async fn get_poll(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Poll>, ApiError> {
    let poll = state.backend.get_poll(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(poll))
}

/// Create a poll. Validation lives here, not in the backend facade: the
/// question must be non-blank and a choice poll needs at least 2 non-empty
/// options.
pub async fn create_poll(
    State(state): State<AppState>,
    Json(body): Json<CreatePollRequest>,
) -> Result<(StatusCode, Json<Poll>), ApiError> {
    let question = body.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".into()));
    }

    let options: Vec<String> = body
        .options
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if !body.is_text_based && options.len() < 2 {
        return Err(ApiError::BadRequest(
            "a choice poll needs at least 2 options".into(),
        ));
    }

    let poll = state
        .backend
        .create_poll(question, &options, body.is_text_based)
        .await?;
    Ok((StatusCode::CREATED, Json(poll)))
}

pub async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<VoteRequest>,
) -> Result<Json<Poll>, ApiError> {
    if body.option_id.trim().is_empty() {
        return Err(ApiError::BadRequest("optionId must not be empty".into()));
    }
    let poll = state
        .backend
        .cast_vote(&id, &body.option_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(poll))
}

pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AnswerRequest>,
) -> Result<Json<Poll>, ApiError> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("answer text must not be empty".into()));
    }
    let poll = state
        .backend
        .submit_answer(&id, text)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(poll))
}

pub async fn analyze(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let analysis = state.backend.analyze_answers(&id).await?;
    Ok(Json(json!({ "analysis": analysis })))
}

/// Downloadable PDF report: the simulated analysis for text polls, the vote
/// breakdown for choice polls.
pub async fn report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let poll = state.backend.get_poll(&id).await?.ok_or(ApiError::NotFound)?;

    let (section, body) = if poll.is_text_based {
        ("AI Analysis:", state.backend.analyze_answers(&id).await?)
    } else {
        ("Results:", report::tally_body(&results::tally(&poll)))
    };

    let bytes = report::analysis_pdf(&poll.question, section, &body)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
    let filename = report::report_filename(&poll.question, &poll.id);

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes))
}
