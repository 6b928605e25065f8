use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Analysis was requested for a poll without any text responses.
    #[error("no text responses to analyze")]
    NoAnswers,
    #[error(transparent)]
    Database(pollflow_db::DbError),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("assistant error: {0}")]
    Assistant(String),
}

impl From<pollflow_db::DbError> for CoreError {
    fn from(e: pollflow_db::DbError) -> Self {
        match e {
            pollflow_db::DbError::NotFound => CoreError::NotFound,
            other => CoreError::Database(other),
        }
    }
}

impl From<crate::assistant::AssistantError> for CoreError {
    fn from(e: crate::assistant::AssistantError) -> Self {
        CoreError::Assistant(e.to_string())
    }
}
