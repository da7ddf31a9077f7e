//! WebSocket connection handlers.
//!
//! One session per connection: the token is checked before the upgrade, then
//! the session is admitted (history replay + registration + join notice) and a
//! read loop relays every inbound message until the peer goes away.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ChatMessage, IdentityClaim, SessionState, TransportError},
    infrastructure::dto::websocket::WireMessage,
    ui::state::AppState,
};

use super::http::TOKEN_COOKIE;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, StatusCode> {
    let session_state = advance(SessionState::Connecting, SessionState::Authenticating);

    let token = jar.get(TOKEN_COOKIE).map(|cookie| cookie.value());
    let claim = match state.admit_session_usecase.authenticate(token) {
        Ok(claim) => claim,
        Err(e) => {
            advance(session_state, SessionState::Closed);
            tracing::warn!("Authentication failed, refusing upgrade: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    tracing::info!("'{}' authenticated, upgrading connection", claim.username);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, claim, session_state)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the socket write fails or every sender is dropped. Once it has
/// ended, pushes to this connection fail and the dispatcher prunes it.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<ChatMessage>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&WireMessage::from(msg)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::debug!("WebSocket write failed: {}", e);
                break;
            }
        }
        // Drops the sink half; the socket closes once the reader half is gone too.
    })
}

/// What the read loop should do with one inbound frame
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    Chat(WireMessage),
    Ignore,
    Close,
}

fn decode_frame(msg: Message) -> Result<Inbound, TransportError> {
    let decoded = match msg {
        Message::Text(text) => serde_json::from_str::<WireMessage>(text.as_str()),
        Message::Binary(bytes) => serde_json::from_slice::<WireMessage>(&bytes),
        Message::Ping(_) | Message::Pong(_) => return Ok(Inbound::Ignore),
        Message::Close(_) => return Ok(Inbound::Close),
    };

    decoded
        .map(Inbound::Chat)
        .map_err(|e| TransportError::Protocol(e.to_string()))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    claim: IdentityClaim,
    session_state: SessionState,
) {
    let username = claim.username.clone();
    let (sender, mut receiver) = socket.split();

    // The writer must run before admission so the history replay can flow.
    let (tx, rx) = mpsc::unbounded_channel();
    let mut send_task = pusher_loop(rx, sender);

    let admission = match state.admit_session_usecase.execute(&claim, tx).await {
        Ok(admission) => admission,
        Err(e) => {
            advance(session_state, SessionState::Closed);
            tracing::warn!("Failed to admit '{}': {}", username, e);
            send_task.abort();
            return;
        }
    };
    let session_state = advance(session_state, SessionState::Admitted);
    tracing::info!(
        "'{}' admitted as '{}' ({} messages replayed)",
        username,
        admission.connection_id,
        admission.replayed
    );

    let session_state = advance(session_state, SessionState::Streaming);

    let state_clone = state.clone();
    let author = username.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    let error = TransportError::Read(e.to_string());
                    tracing::info!("Session of '{}' ended: {}", author, error);
                    break;
                }
            };

            let wire = match decode_frame(msg) {
                Ok(Inbound::Chat(wire)) => wire,
                Ok(Inbound::Ignore) => continue,
                Ok(Inbound::Close) => {
                    tracing::info!("'{}' requested close", author);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Closing session of '{}': {}", author, e);
                    break;
                }
            };

            if wire.username != author.as_str() {
                tracing::debug!(
                    "'{}' sent a message labelled '{}', relaying under the authenticated name",
                    author,
                    wire.username
                );
            }

            let message = wire.into_chat_message(author.clone());
            match state_clone.send_message_usecase.execute(message).await {
                Ok(seq) => tracing::debug!("Queued {} from '{}'", seq, author),
                Err(e) => {
                    tracing::error!("Failed to queue message from '{}': {}", author, e);
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    advance(session_state, SessionState::Closed);
    state
        .disconnect_session_usecase
        .execute(&admission.connection_id)
        .await;
    tracing::info!(
        "'{}' disconnected ('{}' removed from registry)",
        username,
        admission.connection_id
    );
}

/// Log a session state change and return the new state
fn advance(current: SessionState, next: SessionState) -> SessionState {
    match current.transition(next) {
        Ok(next) => {
            tracing::trace!("Session {} -> {}", current, next);
            next
        }
        Err(current) => {
            tracing::error!("Invalid session transition {} -> {}", current, next);
            current
        }
    }
}
