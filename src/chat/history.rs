use crate::models::chat::{ChatEntry, ChatMessage, Role};
use chrono::Utc;
use std::collections::VecDeque;

/// Bounded message log; the oldest entries are dropped first.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<ChatEntry>,
    max_history: usize,
}

impl ConversationHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.entries.push_back(ChatEntry {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        });
        while self.entries.len() > self.max_history {
            self.entries.pop_front();
        }
    }

    /// Role/content pairs in chronological order, ready for a completion call.
    pub fn context(&self) -> Vec<ChatMessage> {
        self.entries.iter().map(ChatEntry::to_message).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(10)
    }
}
