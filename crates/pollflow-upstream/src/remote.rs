use crate::{UpstreamClient, UpstreamError};
use async_trait::async_trait;
use pollflow_core::assistant::{Assistant, AssistantError};
use pollflow_core::backend::PollBackend;
use pollflow_core::CoreError;
use pollflow_models::{ChatMessage, Poll, PollAnswer};

fn core_error(e: UpstreamError) -> CoreError {
    match e {
        UpstreamError::NotFound => CoreError::NotFound,
        other => CoreError::Upstream(other.to_string()),
    }
}

/// Collapse an upstream 404 into the facade's `Ok(None)`.
fn absent(result: Result<Poll, UpstreamError>) -> Result<Option<Poll>, CoreError> {
    match result {
        Ok(poll) => Ok(Some(poll)),
        Err(UpstreamError::NotFound) => Ok(None),
        Err(other) => Err(core_error(other)),
    }
}

/// Poll backend that delegates every operation to an upstream REST service.
pub struct RemoteBackend {
    client: UpstreamClient,
}

impl RemoteBackend {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PollBackend for RemoteBackend {
    async fn list_polls(&self) -> Result<Vec<Poll>, CoreError> {
        self.client.list_polls().await.map_err(core_error)
    }

    async fn get_poll(&self, id: &str) -> Result<Option<Poll>, CoreError> {
        absent(self.client.get_poll(id).await)
    }

    async fn create_poll(
        &self,
        question: &str,
        options: &[String],
        is_text_based: bool,
    ) -> Result<Poll, CoreError> {
        self.client
            .create_poll(question, options, is_text_based)
            .await
            .map_err(core_error)
    }

    async fn cast_vote(&self, poll_id: &str, option_id: &str) -> Result<Option<Poll>, CoreError> {
        absent(self.client.cast_vote(poll_id, option_id).await)
    }

    async fn submit_answer(&self, poll_id: &str, text: &str) -> Result<Option<Poll>, CoreError> {
        absent(self.client.submit_answer(poll_id, text).await)
    }

    async fn analyze_answers(&self, poll_id: &str) -> Result<String, CoreError> {
        self.client.analyze(poll_id).await.map_err(core_error)
    }
}

/// Assistant that forwards chat traffic to the upstream's chat endpoints.
pub struct RemoteAssistant {
    client: UpstreamClient,
}

impl RemoteAssistant {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Assistant for RemoteAssistant {
    async fn respond(
        &self,
        question: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, AssistantError> {
        self.client
            .chat_respond(question, message, history)
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))
    }

    async fn summarize(
        &self,
        question: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AssistantError> {
        self.client
            .summarize(question, messages)
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))
    }

    async fn analyze(
        &self,
        _question: &str,
        _answers: &[PollAnswer],
    ) -> Result<String, AssistantError> {
        // The upstream analyzes by poll id through its own endpoint; the
        // RemoteBackend goes there directly, so this path is never the one a
        // remote deployment takes.
        Err(AssistantError::Transport(
            "analysis is served by the upstream analyze endpoint".into(),
        ))
    }
}
