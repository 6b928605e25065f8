use crate::assistant::Assistant;
use crate::backend::PollBackend;
use crate::id::generate_id;
use crate::CoreError;
use async_trait::async_trait;
use chrono::Utc;
use pollflow_db::{polls, DbError, DbPool};
use pollflow_models::{Poll, PollAnswer, PollOption};
use std::sync::Arc;

/// Poll backend over the local SQLite database. Analysis is delegated to the
/// injected assistant (the simulated one in a default deployment).
pub struct LocalBackend {
    db: DbPool,
    assistant: Arc<dyn Assistant>,
}

impl LocalBackend {
    pub fn new(db: DbPool, assistant: Arc<dyn Assistant>) -> Self {
        Self { db, assistant }
    }
}

/// Collapse the database's "not found" into the facade's `Ok(None)`.
fn absent<T>(result: Result<T, DbError>) -> Result<Option<T>, CoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DbError::NotFound) => Ok(None),
        Err(other) => Err(other.into()),
    }
}

#[async_trait]
impl PollBackend for LocalBackend {
    async fn list_polls(&self) -> Result<Vec<Poll>, CoreError> {
        Ok(polls::list_polls(&self.db).await?)
    }

    async fn get_poll(&self, id: &str) -> Result<Option<Poll>, CoreError> {
        absent(polls::get_poll(&self.db, id).await)
    }

    async fn create_poll(
        &self,
        question: &str,
        options: &[String],
        is_text_based: bool,
    ) -> Result<Poll, CoreError> {
        let poll = Poll {
            id: generate_id(),
            question: question.to_string(),
            options: options
                .iter()
                .map(|text| PollOption {
                    id: generate_id(),
                    text: text.clone(),
                    votes: 0,
                })
                .collect(),
            answers: Vec::new(),
            is_text_based,
            created_at: Utc::now(),
        };
        polls::insert_poll(&self.db, &poll).await?;
        tracing::info!(poll_id = %poll.id, text_based = is_text_based, "poll created");
        Ok(poll)
    }

    async fn cast_vote(&self, poll_id: &str, option_id: &str) -> Result<Option<Poll>, CoreError> {
        absent(polls::cast_vote(&self.db, poll_id, option_id).await)
    }

    async fn submit_answer(&self, poll_id: &str, text: &str) -> Result<Option<Poll>, CoreError> {
        let answer = PollAnswer {
            id: generate_id(),
            text: text.to_string(),
            user_id: None,
            created_at: Utc::now(),
        };
        absent(polls::add_answer(&self.db, poll_id, &answer).await)
    }

    async fn analyze_answers(&self, poll_id: &str) -> Result<String, CoreError> {
        let poll = polls::get_poll(&self.db, poll_id).await?;
        if !poll.is_text_based || poll.answers.is_empty() {
            return Err(CoreError::NoAnswers);
        }
        Ok(self
            .assistant
            .analyze(&poll.question, &poll.answers)
            .await?)
    }
}
