//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::websocket::WireMessage;
use hiroba_shared::time::local_clock_label;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        http::{HeaderValue, StatusCode, header::COOKIE},
        protocol::Message,
    },
};

use crate::error::ClientError;

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// How a session ended without an error
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// The input stream was closed (Ctrl+C / Ctrl+D)
    UserExit,
}

/// Run one WebSocket session with an already issued token
///
/// Lines arriving on `input_rx` are sent as chat messages; everything the relay
/// pushes is printed. Returns an error when the connection is lost so the caller
/// can decide whether to reconnect.
pub async fn run_client_session(
    ws_url: &str,
    token: &str,
    username: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd, ClientError> {
    let mut request = ws_url
        .into_client_request()
        .map_err(|e| ClientError::InvalidUrl(format!("{} ({})", ws_url, e)))?;
    let cookie = HeaderValue::from_str(&format!("token={}", token))
        .map_err(|e| ClientError::Connection(format!("Invalid token: {}", e)))?;
    request.headers_mut().insert(COOKIE, cookie);

    let (ws_stream, _response) = match connect_async(request).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response)) if response.status() == StatusCode::UNAUTHORIZED => {
            return Err(ClientError::Unauthorized(
                "The relay refused the token".to_string(),
            ));
        }
        Err(e) => return Err(ClientError::Connection(e.to_string())),
    };

    tracing::info!("Connected to {}", ws_url);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let formatted = match serde_json::from_str::<WireMessage>(text.as_str()) {
                        Ok(message) => MessageFormatter::format_chat_message(&message),
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(username);
                }
                Some(Ok(Message::Binary(data))) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(username);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::Connection("Connection closed by server".to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::Connection(e.to_string()));
                }
            },
            line = input_rx.recv() => {
                let Some(content) = line else {
                    write.send(Message::Close(None)).await.ok();
                    return Ok(SessionEnd::UserExit);
                };

                let message = WireMessage {
                    username: username.to_string(),
                    content,
                };
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };

                if let Err(e) = write.send(Message::Text(json.into())).await {
                    tracing::warn!("Failed to send message: {}", e);
                    return Err(ClientError::Connection(e.to_string()));
                }

                print!("{}", MessageFormatter::format_sent_confirmation(&local_clock_label()));
                redisplay_prompt(username);
            }
        }
    }
}
