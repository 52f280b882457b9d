//! One conversation with the assistant

use crate::chat::history::ConversationHistory;
use crate::config::Config;
use crate::models::chat::{ChatMessage, Role};
use crate::services::openai::{CompletionRequest, TextGenerator};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

pub const SYSTEM_PROMPT: &str = "You are ChatZiPT, a helpful and friendly AI assistant. \
You provide accurate, informative, and engaging responses. \
Be concise but thorough in your answers.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub model: String,
    pub api_configured: bool,
}

pub struct ChatSession {
    generator: Option<Arc<dyn TextGenerator>>,
    history: ConversationHistory,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl ChatSession {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, model: impl Into<String>, max_history: usize) -> Self {
        Self {
            generator,
            history: ConversationHistory::new(max_history),
            model: model.into(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    pub fn from_config(config: &Config, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let mut session = Self::new(generator, config.chat_model.clone(), config.chat_max_history);
        session.max_tokens = config.chat_max_tokens;
        session.temperature = config.chat_temperature;
        session
    }

    /// Seed the history with earlier turns. System messages are ignored.
    pub fn with_history(mut self, messages: Vec<ChatMessage>) -> Self {
        for message in messages.into_iter().filter(|m| m.role != Role::System) {
            self.history.push(message.role, message.content);
        }
        self
    }

    pub async fn chat(&mut self, input: &str) -> String {
        if input.trim().is_empty() {
            return "Please enter a message.".to_string();
        }

        self.history.push(Role::User, input);

        let reply = match &self.generator {
            Some(generator) => {
                let mut messages = Vec::with_capacity(self.history.len() + 1);
                messages.push(ChatMessage::system(SYSTEM_PROMPT));
                messages.extend(self.history.context());

                let request = CompletionRequest {
                    model: self.model.clone(),
                    messages,
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                };

                match generator.complete(&request).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(model = %self.model, error = %e, "chat completion failed");
                        format!("Sorry, I encountered an error while trying to respond: {}", e)
                    }
                }
            }
            None => format!("Echo: {} (AI service not configured)", input),
        };

        if reply.is_empty() {
            return "I'm sorry, I couldn't generate a response.".to_string();
        }

        self.history.push(Role::Assistant, reply.clone());
        reply
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn stats(&self) -> ChatStats {
        let count = |role: Role| self.history.entries().filter(|e| e.role == role).count();
        ChatStats {
            total_messages: self.history.len(),
            user_messages: count(Role::User),
            assistant_messages: count(Role::Assistant),
            model: self.model.clone(),
            api_configured: self.generator.is_some(),
        }
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
