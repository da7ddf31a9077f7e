//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, Username};
use crate::infrastructure::dto::websocket::WireMessage;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for WireMessage {
    fn from(model: ChatMessage) -> Self {
        Self {
            username: model.author.into_string(),
            content: model.content,
        }
    }
}

// ========================================
// DTO → Domain Entity
// ========================================

impl WireMessage {
    /// Build the domain message with the authenticated author.
    ///
    /// The `username` field sent by the peer is not trusted.
    pub fn into_chat_message(self, author: Username) -> ChatMessage {
        ChatMessage::new(author, self.content)
    }
}
