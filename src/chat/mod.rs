//! Conversation state and the completion endpoint client.

mod client;
mod conversation;
mod types;

pub use client::{CompletionClient, HttpCompletionClient};
pub use conversation::{ConversationState, Outbound, PRIMING_PROMPT, Ticket};
pub use types::{ChatAnswer, ChatMessage, ChatRequest, ChatResponse, Paper, Role};
