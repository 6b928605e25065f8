use async_trait::async_trait;
use pollflow_models::{ChatMessage, PollAnswer, Sender};
use rand::Rng;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant transport error: {0}")]
    Transport(String),
}

/// Conversational assistant facade. The simulated implementation below picks
/// canned templates after an artificial delay; a remote implementation posts
/// to the chat endpoints of an upstream service. Swapping in a genuine
/// model-backed implementation only requires another impl of this trait.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn respond(
        &self,
        question: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, AssistantError>;

    async fn summarize(
        &self,
        question: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AssistantError>;

    async fn analyze(
        &self,
        question: &str,
        answers: &[PollAnswer],
    ) -> Result<String, AssistantError>;
}

/// How long the simulated assistant pretends to think. Tests zero these out.
#[derive(Debug, Clone, Copy)]
pub struct AssistantDelays {
    pub respond: Duration,
    pub summarize: Duration,
    pub analyze: Duration,
}

impl Default for AssistantDelays {
    fn default() -> Self {
        Self {
            respond: Duration::from_millis(1000),
            summarize: Duration::from_millis(1500),
            analyze: Duration::from_millis(2000),
        }
    }
}

impl AssistantDelays {
    pub fn none() -> Self {
        Self {
            respond: Duration::ZERO,
            summarize: Duration::ZERO,
            analyze: Duration::ZERO,
        }
    }
}

/// Explicitly simulated assistant: random template selection and fixed
/// delays, no real language model anywhere.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAssistant {
    delays: AssistantDelays,
}

impl SimulatedAssistant {
    pub fn new(delays: AssistantDelays) -> Self {
        Self { delays }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[async_trait]
impl Assistant for SimulatedAssistant {
    async fn respond(
        &self,
        question: &str,
        message: &str,
        _history: &[ChatMessage],
    ) -> Result<String, AssistantError> {
        tokio::time::sleep(self.delays.respond).await;

        let templates = [
            format!("That's an interesting perspective on \"{question}\". Can you elaborate more?"),
            format!(
                "I understand your point about \"{}...\". Have you considered other aspects of this issue?",
                truncate_chars(message, 20)
            ),
            "Thanks for sharing. Would you like me to provide more information about this topic?"
                .to_string(),
            "That's a valid view. Is there anything specific you'd like to know about this question?"
                .to_string(),
        ];
        let pick = rand::thread_rng().gen_range(0..templates.len());
        Ok(templates[pick].clone())
    }

    async fn summarize(
        &self,
        question: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AssistantError> {
        tokio::time::sleep(self.delays.summarize).await;

        let user_messages = messages
            .iter()
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let gist = truncate_chars(&user_messages, 100);

        Ok(format!(
            "Based on our conversation about \"{question}\", your main points appear to be: {gist}... Is this summary accurate?"
        ))
    }

    async fn analyze(
        &self,
        question: &str,
        answers: &[PollAnswer],
    ) -> Result<String, AssistantError> {
        tokio::time::sleep(self.delays.analyze).await;

        let combined = answers
            .iter()
            .map(|a| a.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let word_count = combined.split_whitespace().count();

        const SENTIMENTS: [&str; 6] = [
            "positive",
            "negative",
            "neutral",
            "mixed",
            "enthusiastic",
            "concerned",
        ];
        let mut rng = rand::thread_rng();
        let sentiment = SENTIMENTS[rng.gen_range(0..SENTIMENTS.len())];
        let themes = if rng.gen_bool(0.5) {
            "agreement on core issues"
        } else {
            "diverse perspectives"
        };
        let tone = if rng.gen_bool(0.3) {
            "strong emotional content"
        } else {
            "factual observations"
        };
        let confidence = if rng.gen_bool(0.5) {
            "well-informed"
        } else {
            "somewhat uncertain"
        };
        let examples_pct = rng.gen_range(30..100);

        Ok(format!(
            "Analysis of {} responses to \"{}\":\n\n\
             The overall sentiment appears to be {}. The responses contain approximately {} words.\n\
             Common themes include {} with {}.\n\n\
             Respondents seem {} about the topic, with {}% providing specific examples or personal experiences.",
            answers.len(),
            question,
            sentiment,
            word_count,
            themes,
            tone,
            confidence,
            examples_pct
        ))
    }
}
