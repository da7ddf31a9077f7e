//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderValue, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::{
    domain::CredentialError,
    infrastructure::dto::{
        http::{LoginForm, LoginResponseDto, StatsDto},
        websocket::WireMessage,
    },
    ui::state::AppState,
    usecase::LoginError,
};
use hiroba_shared::time::timestamp_to_http_date;

/// Name of the cookie carrying the identity token
pub const TOKEN_COOKIE: &str = "token";

/// Issue a token for the submitted username
///
/// Responds with the token in a `token` cookie and in the JSON body.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let issued = match state
        .login_usecase
        .execute(form.username, &form.password)
        .await
    {
        Ok(issued) => issued,
        Err(LoginError::InvalidUsername(e)) => {
            tracing::warn!("Rejected login: {}", e);
            return Err((StatusCode::BAD_REQUEST, e.to_string()));
        }
        Err(LoginError::Credentials(CredentialError::Rejected(username))) => {
            tracing::warn!("Rejected login for '{}'", username);
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
        }
        Err(e) => {
            tracing::error!("Failed to generate token: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate token".to_string(),
            ));
        }
    };

    let cookie = session_cookie(&issued.token, state.token_ttl_seconds, issued.expires_at)
        .ok_or_else(|| {
            tracing::error!("Token for '{}' is not a valid cookie value", issued.username);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate token".to_string(),
            )
        })?;

    let body = LoginResponseDto {
        username: issued.username.into_string(),
        token: issued.token,
        expires_at: issued.expires_at,
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)))
}

/// Build the `Set-Cookie` value for a freshly issued token
fn session_cookie(token: &str, max_age_seconds: i64, expires_at: i64) -> Option<HeaderValue> {
    let cookie = Cookie::build((TOKEN_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    let expires = timestamp_to_http_date(expires_at)?;

    HeaderValue::from_str(&format!(
        "{}; Max-Age={}; Expires={}",
        cookie, max_age_seconds, expires
    ))
    .ok()
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Connection and history counters
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    Json(StatsDto {
        connections: state.registry.count().await,
        history_len: state.history.count().await,
        history_capacity: state.history.capacity(),
    })
}

/// Debug endpoint to get the current history snapshot (for testing purposes)
pub async fn debug_history(State(state): State<Arc<AppState>>) -> Json<Vec<WireMessage>> {
    let snapshot = state.history.snapshot().await;
    Json(snapshot.into_iter().map(WireMessage::from).collect())
}
