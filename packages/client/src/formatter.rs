//! Message formatting utilities for client display.

use hiroba_server::{domain::Username, infrastructure::dto::websocket::WireMessage};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Banner printed once a session has been admitted
    pub fn format_connected(username: &str, expires_at_rfc3339: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Logged in as '{}'", username));
        if let Some(expires_at) = expires_at_rfc3339 {
            output.push_str(&format!(" (token valid until {})", expires_at));
        }
        output.push_str("\nType messages and press Enter to send. Press Ctrl+C to exit.\n");
        output.push_str("============================================================\n");
        output
    }

    /// Format a relayed message as `[author] content`
    ///
    /// Server notices are marked with `*` so they stand out from chat.
    pub fn format_chat_message(message: &WireMessage) -> String {
        if message.username == Username::SERVER {
            format!("\n* [{}] {}\n", message.username, message.content)
        } else {
            format!("\n[{}] {}\n", message.username, message.content)
        }
    }

    /// Format a confirmation message after sending
    pub fn format_sent_confirmation(clock_label: &str) -> String {
        format!("sent at {}\n", clock_label)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
