use crate::CoreError;
use async_trait::async_trait;
use pollflow_models::Poll;

/// Persistence facade for poll data. Two implementations exist: the
/// SQLite-backed [`crate::local::LocalBackend`] and a remote HTTP client
/// delegating to an upstream service with the same REST contract. Which one
/// a deployment uses is decided once at startup.
///
/// The facade performs no input validation; callers (the API layer) are
/// expected to reject empty questions, short option lists, and blank answer
/// text before getting here.
#[async_trait]
pub trait PollBackend: Send + Sync {
    async fn list_polls(&self) -> Result<Vec<Poll>, CoreError>;

    /// `Ok(None)` is the one well-defined "not found" outcome for a missing
    /// poll; implementations never fabricate placeholder data.
    async fn get_poll(&self, id: &str) -> Result<Option<Poll>, CoreError>;

    async fn create_poll(
        &self,
        question: &str,
        options: &[String],
        is_text_based: bool,
    ) -> Result<Poll, CoreError>;

    /// Increment the option's vote count by exactly 1 and return the updated
    /// poll, or `Ok(None)` if the poll or option is absent.
    async fn cast_vote(&self, poll_id: &str, option_id: &str) -> Result<Option<Poll>, CoreError>;

    /// Append a new answer with a fresh id and the current timestamp.
    /// Existing answers are never overwritten.
    async fn submit_answer(&self, poll_id: &str, text: &str) -> Result<Option<Poll>, CoreError>;

    /// Produce a human-readable analysis of a text poll's answers. Fails
    /// with [`CoreError::NoAnswers`] when the poll is not text-based or has
    /// no answers yet.
    async fn analyze_answers(&self, poll_id: &str) -> Result<String, CoreError>;
}
