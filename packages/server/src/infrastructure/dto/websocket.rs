//! WebSocket message DTOs.
//!
//! One JSON object per text frame, in both directions:
//!
//! ```json
//! { "username": "alice", "content": "hello" }
//! ```

use serde::{Deserialize, Serialize};

/// Chat message as it travels over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub username: String,
    pub content: String,
}
