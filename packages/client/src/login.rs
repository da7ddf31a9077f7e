//! Login over HTTP.

use hiroba_server::infrastructure::dto::http::LoginResponseDto;
use reqwest::StatusCode;

use crate::{domain::endpoint_url, error::ClientError};

/// Submit the login form and return the issued token
pub async fn login(
    http: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<LoginResponseDto, ClientError> {
    let url = endpoint_url(base_url, "/login");
    tracing::debug!("Logging in at {} as '{}'", url, username);

    let response = http
        .post(&url)
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .map_err(|e| ClientError::Login(e.to_string()))?;

    match response.status() {
        StatusCode::OK => response
            .json::<LoginResponseDto>()
            .await
            .map_err(|e| ClientError::Login(format!("Unexpected login response: {}", e))),
        StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized(format!(
            "Login rejected for '{}'",
            username
        ))),
        // An empty username will never succeed either
        StatusCode::BAD_REQUEST => Err(ClientError::Unauthorized(
            response.text().await.unwrap_or_default(),
        )),
        status => Err(ClientError::Login(format!(
            "Server responded with {}",
            status
        ))),
    }
}
