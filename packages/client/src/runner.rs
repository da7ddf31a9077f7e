//! Client execution logic with reconnection support.

use std::time::Duration;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use hiroba_shared::time::timestamp_to_rfc3339;

use super::{
    domain::{should_attempt_reconnect, websocket_url},
    error::ClientError,
    formatter::MessageFormatter,
    login::login,
    session::{SessionEnd, run_client_session},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client with reconnection logic
///
/// Every attempt logs in again, so an expired token is replaced transparently.
/// Rejected credentials end the client immediately.
pub async fn run_client(
    base_url: String,
    username: String,
    password: String,
) -> Result<(), ClientError> {
    let ws_url = websocket_url(&base_url)?;
    let http = reqwest::Client::new();
    let mut input_rx = spawn_readline(username.clone());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            base_url,
            username,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let result = match login(&http, &base_url, &username, &password).await {
            Ok(issued) => {
                let expires_at = timestamp_to_rfc3339(issued.expires_at);
                print!(
                    "{}",
                    MessageFormatter::format_connected(&issued.username, expires_at.as_deref())
                );
                run_client_session(&ws_url, &issued.token, &issued.username, &mut input_rx).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(SessionEnd::UserExit) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Session failed: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                        tracing::error!(
                            "Failed to reconnect after {} attempts. Exiting.",
                            MAX_RECONNECT_ATTEMPTS
                        );
                    }
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}

/// Read lines on a dedicated thread for the whole lifetime of the client
///
/// The channel closes on Ctrl+C, Ctrl+D or a readline failure.
fn spawn_readline(username: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", username);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
