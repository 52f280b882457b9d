//! Conversational assistant used by the bot front ends

pub mod history;
pub mod session;
pub mod vibe;

pub use history::ConversationHistory;
pub use session::{ChatSession, ChatStats, SYSTEM_PROMPT};
pub use vibe::vibe_response;
