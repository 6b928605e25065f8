use crate::assistant::{Assistant, AssistantError};
use crate::id::generate_id;
use chrono::Utc;
use pollflow_models::{ChatMessage, Sender};
use thiserror::Error;

/// Finishing is only offered once the transcript holds the greeting plus at
/// least one full exchange.
pub const MIN_MESSAGES_TO_FINISH: usize = 3;

const APOLOGY: &str = "Sorry, I'm having trouble responding. Please try again.";
const CONTINUE_PROMPT: &str =
    "I see. Let's continue our discussion so I can better understand your perspective.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Chatting,
    SummaryPending,
    Submitted,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("nothing to send")]
    EmptyMessage,
    #[error("a request is already in flight")]
    Busy,
    #[error("the conversation is not accepting messages")]
    NotChatting,
    #[error("the conversation is too short to summarize")]
    TooFewMessages,
    #[error("no summary is pending")]
    NoPendingSummary,
    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

/// A single respondent's conversation on a text-based poll, from the seeded
/// greeting up to an accepted summary. The session never touches storage;
/// once `accept` hands back the final answer text the caller submits it
/// through the poll backend.
///
/// Assistant failures keep the session alive: a failed reply appends an
/// apology to the transcript, a failed summary leaves the state untouched,
/// and either way the respondent may retry.
pub struct ChatSession {
    question: String,
    transcript: Vec<ChatMessage>,
    phase: SessionPhase,
    pending_summary: Option<String>,
    busy: bool,
}

impl ChatSession {
    pub fn new(question: impl Into<String>) -> Self {
        let question = question.into();
        let greeting = format!(
            "Hi! I'm here to discuss the question: \"{question}\". What are your thoughts on this topic?"
        );
        let mut session = Self {
            question,
            transcript: Vec::new(),
            phase: SessionPhase::Chatting,
            pending_summary: None,
            busy: false,
        };
        session.push(Sender::Assistant, greeting);
        session
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn pending_summary(&self) -> Option<&str> {
        self.pending_summary.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the send control should be enabled for the given draft.
    pub fn can_send(&self, draft: &str) -> bool {
        self.phase == SessionPhase::Chatting && !self.busy && !draft.trim().is_empty()
    }

    pub fn can_finish(&self) -> bool {
        self.phase == SessionPhase::Chatting
            && !self.busy
            && self.transcript.len() >= MIN_MESSAGES_TO_FINISH
    }

    /// Append the respondent's message and wait for the assistant's reply.
    /// On failure the transcript gains an apology instead of a reply and the
    /// error is returned for the caller to surface.
    pub async fn send(
        &mut self,
        text: &str,
        assistant: &dyn Assistant,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Chatting {
            return Err(SessionError::NotChatting);
        }
        if self.busy {
            return Err(SessionError::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        self.push(Sender::User, text.to_string());
        self.busy = true;
        let result = assistant
            .respond(&self.question, text, &self.transcript)
            .await;
        self.busy = false;

        match result {
            Ok(reply) => {
                self.push(Sender::Assistant, reply);
                Ok(())
            }
            Err(err) => {
                self.push(Sender::Assistant, APOLOGY.to_string());
                Err(err.into())
            }
        }
    }

    /// Ask for a summary of the conversation so far and move to
    /// `SummaryPending`. On failure the session stays in `Chatting` with an
    /// unchanged transcript.
    pub async fn finish(&mut self, assistant: &dyn Assistant) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Chatting {
            return Err(SessionError::NotChatting);
        }
        if self.busy {
            return Err(SessionError::Busy);
        }
        if self.transcript.len() < MIN_MESSAGES_TO_FINISH {
            return Err(SessionError::TooFewMessages);
        }

        self.busy = true;
        let result = assistant.summarize(&self.question, &self.transcript).await;
        self.busy = false;

        let summary = result?;
        self.pending_summary = Some(summary);
        self.phase = SessionPhase::SummaryPending;
        Ok(())
    }

    /// Accept the pending summary as the final answer text. The session is
    /// terminal afterwards.
    pub fn accept(&mut self) -> Result<String, SessionError> {
        if self.phase != SessionPhase::SummaryPending {
            return Err(SessionError::NoPendingSummary);
        }
        let summary = self
            .pending_summary
            .take()
            .ok_or(SessionError::NoPendingSummary)?;
        self.phase = SessionPhase::Submitted;
        Ok(summary)
    }

    /// Discard the pending summary and resume the conversation.
    pub fn reject(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::SummaryPending {
            return Err(SessionError::NoPendingSummary);
        }
        self.pending_summary = None;
        self.push(Sender::Assistant, CONTINUE_PROMPT.to_string());
        self.phase = SessionPhase::Chatting;
        Ok(())
    }

    fn push(&mut self, sender: Sender, content: String) {
        self.transcript.push(ChatMessage {
            id: generate_id(),
            content,
            sender,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pollflow_models::PollAnswer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic assistant for driving the session in tests.
    #[derive(Default)]
    struct ScriptedAssistant {
        summarize_calls: AtomicUsize,
    }

    #[async_trait]
    impl Assistant for ScriptedAssistant {
        async fn respond(
            &self,
            _question: &str,
            message: &str,
            _history: &[ChatMessage],
        ) -> Result<String, AssistantError> {
            Ok(format!("noted: {message}"))
        }

        async fn summarize(
            &self,
            question: &str,
            _messages: &[ChatMessage],
        ) -> Result<String, AssistantError> {
            self.summarize_calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("summary of {question}"))
        }

        async fn analyze(
            &self,
            _question: &str,
            _answers: &[PollAnswer],
        ) -> Result<String, AssistantError> {
            Ok("analysis".to_string())
        }
    }

    struct FailingAssistant;

    #[async_trait]
    impl Assistant for FailingAssistant {
        async fn respond(
            &self,
            _question: &str,
            _message: &str,
            _history: &[ChatMessage],
        ) -> Result<String, AssistantError> {
            Err(AssistantError::Transport("connection reset".into()))
        }

        async fn summarize(
            &self,
            _question: &str,
            _messages: &[ChatMessage],
        ) -> Result<String, AssistantError> {
            Err(AssistantError::Transport("connection reset".into()))
        }

        async fn analyze(
            &self,
            _question: &str,
            _answers: &[PollAnswer],
        ) -> Result<String, AssistantError> {
            Err(AssistantError::Transport("connection reset".into()))
        }
    }

    #[test]
    fn new_session_is_seeded_with_a_greeting() {
        let session = ChatSession::new("Coffee or tea?");
        assert_eq!(session.phase(), SessionPhase::Chatting);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].sender, Sender::Assistant);
        assert!(session.transcript()[0].content.contains("Coffee or tea?"));
        assert!(!session.can_finish());
    }

    #[test]
    fn send_gating_rejects_blank_drafts() {
        let session = ChatSession::new("Q");
        assert!(!session.can_send(""));
        assert!(!session.can_send("   "));
        assert!(session.can_send("an opinion"));
    }

    #[tokio::test]
    async fn exchange_appends_user_and_assistant_messages() {
        let assistant = ScriptedAssistant::default();
        let mut session = ChatSession::new("Q");

        session.send("first thought", &assistant).await.unwrap();
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.transcript()[1].sender, Sender::User);
        assert_eq!(session.transcript()[2].content, "noted: first thought");
        assert!(session.can_finish());
    }

    #[tokio::test]
    async fn finish_calls_summarize_exactly_once() {
        let assistant = ScriptedAssistant::default();
        let mut session = ChatSession::new("Q");
        for text in ["one", "two", "three"] {
            session.send(text, &assistant).await.unwrap();
        }

        session.finish(&assistant).await.unwrap();
        assert_eq!(assistant.summarize_calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.phase(), SessionPhase::SummaryPending);
        assert_eq!(session.pending_summary(), Some("summary of Q"));
    }

    #[tokio::test]
    async fn finish_requires_a_minimum_transcript() {
        let assistant = ScriptedAssistant::default();
        let mut session = ChatSession::new("Q");
        assert!(matches!(
            session.finish(&assistant).await,
            Err(SessionError::TooFewMessages)
        ));
        assert_eq!(assistant.summarize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reject_resumes_chatting_with_one_extra_message() {
        let assistant = ScriptedAssistant::default();
        let mut session = ChatSession::new("Q");
        session.send("my view", &assistant).await.unwrap();
        session.finish(&assistant).await.unwrap();

        let before = session.transcript().len();
        session.reject().unwrap();

        assert_eq!(session.phase(), SessionPhase::Chatting);
        assert_eq!(session.transcript().len(), before + 1);
        assert_eq!(
            session.transcript().last().unwrap().sender,
            Sender::Assistant
        );
        assert!(session.pending_summary().is_none());

        // A second finish is not blocked after a rejection.
        assert!(session.can_finish());
        session.finish(&assistant).await.unwrap();
        assert_eq!(assistant.summarize_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn accept_is_terminal_and_yields_the_summary() {
        let assistant = ScriptedAssistant::default();
        let mut session = ChatSession::new("Q");
        session.send("my view", &assistant).await.unwrap();
        session.finish(&assistant).await.unwrap();

        let answer = session.accept().unwrap();
        assert_eq!(answer, "summary of Q");
        assert_eq!(session.phase(), SessionPhase::Submitted);

        assert!(matches!(
            session.send("more", &assistant).await,
            Err(SessionError::NotChatting)
        ));
        assert!(matches!(
            session.finish(&assistant).await,
            Err(SessionError::NotChatting)
        ));
        assert!(matches!(session.accept(), Err(SessionError::NoPendingSummary)));
    }

    #[tokio::test]
    async fn failed_reply_appends_apology_and_keeps_session_alive() {
        let mut session = ChatSession::new("Q");

        let result = session.send("my view", &FailingAssistant).await;
        assert!(matches!(result, Err(SessionError::Assistant(_))));
        assert_eq!(session.phase(), SessionPhase::Chatting);
        assert_eq!(session.transcript().len(), 3);
        assert!(session
            .transcript()
            .last()
            .unwrap()
            .content
            .starts_with("Sorry"));

        // Retry with a working assistant succeeds.
        let assistant = ScriptedAssistant::default();
        session.send("again", &assistant).await.unwrap();
        assert_eq!(session.transcript().len(), 5);
    }

    #[tokio::test]
    async fn failed_summary_leaves_state_unchanged() {
        let assistant = ScriptedAssistant::default();
        let mut session = ChatSession::new("Q");
        session.send("my view", &assistant).await.unwrap();
        let before = session.transcript().len();

        let result = session.finish(&FailingAssistant).await;
        assert!(matches!(result, Err(SessionError::Assistant(_))));
        assert_eq!(session.phase(), SessionPhase::Chatting);
        assert_eq!(session.transcript().len(), before);
        assert!(session.pending_summary().is_none());

        session.finish(&assistant).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::SummaryPending);
    }

    #[test]
    fn reject_without_pending_summary_is_an_error() {
        let mut session = ChatSession::new("Q");
        assert!(matches!(
            session.reject(),
            Err(SessionError::NoPendingSummary)
        ));
    }
}
