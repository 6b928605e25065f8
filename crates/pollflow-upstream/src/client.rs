use crate::UpstreamError;
use pollflow_models::{ChatMessage, Poll};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    analysis: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

/// HTTP client for an upstream service implementing the poll REST contract.
/// 404 is translated to [`UpstreamError::NotFound`]; any other non-2xx
/// status is a transport error the caller may retry.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    base_url: String,
    http: Client,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent("PollFlow/0.3")
            .build()
            .map_err(|e| UpstreamError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub async fn list_polls(&self) -> Result<Vec<Poll>, UpstreamError> {
        self.get_json("/api/polls").await
    }

    pub async fn get_poll(&self, id: &str) -> Result<Poll, UpstreamError> {
        self.get_json(&format!("/api/polls/{id}")).await
    }

    pub async fn create_poll(
        &self,
        question: &str,
        options: &[String],
        is_text_based: bool,
    ) -> Result<Poll, UpstreamError> {
        self.post_json(
            "/api/polls",
            &json!({
                "question": question,
                "options": options,
                "isTextBased": is_text_based,
            }),
        )
        .await
    }

    pub async fn cast_vote(&self, poll_id: &str, option_id: &str) -> Result<Poll, UpstreamError> {
        self.put_json(
            &format!("/api/polls/{poll_id}/vote"),
            &json!({ "optionId": option_id }),
        )
        .await
    }

    pub async fn submit_answer(&self, poll_id: &str, text: &str) -> Result<Poll, UpstreamError> {
        self.post_json(
            &format!("/api/polls/{poll_id}/answer"),
            &json!({ "text": text }),
        )
        .await
    }

    pub async fn analyze(&self, poll_id: &str) -> Result<String, UpstreamError> {
        let body: AnalysisResponse = self
            .post_json(&format!("/api/polls/{poll_id}/analyze"), &json!({}))
            .await?;
        Ok(body.analysis)
    }

    pub async fn chat_respond(
        &self,
        question: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, UpstreamError> {
        let body: ChatResponse = self
            .post_json(
                "/api/chat/respond",
                &json!({
                    "question": question,
                    "message": message,
                    "pastMessages": history,
                }),
            )
            .await?;
        Ok(body.response)
    }

    pub async fn summarize(
        &self,
        question: &str,
        messages: &[ChatMessage],
    ) -> Result<String, UpstreamError> {
        let body: SummaryResponse = self
            .post_json(
                "/api/chat/summary",
                &json!({
                    "question": question,
                    "messages": messages,
                }),
            )
            .await?;
        Ok(body.summary)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| UpstreamError::Http(e.to_string()))?;
        decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::Http(e.to_string()))?;
        decode(response).await
    }

    async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::Http(e.to_string()))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, UpstreamError> {
    match response.status() {
        StatusCode::NOT_FOUND => Err(UpstreamError::NotFound),
        status if !status.is_success() => {
            tracing::warn!("upstream returned {status}");
            Err(UpstreamError::Status(status.as_u16()))
        }
        _ => response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string())),
    }
}
