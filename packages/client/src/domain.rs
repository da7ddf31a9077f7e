//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if retrying cannot help (rejected credentials or an unusable URL),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Unauthorized(_) | ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of failed attempts so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Derive the relay endpoint from the server's HTTP base URL
///
/// `http://host:port` becomes `ws://host:port/ws`, `https://…` becomes `wss://…/ws`.
pub fn websocket_url(base_url: &str) -> Result<String, ClientError> {
    let base_url = base_url.trim_end_matches('/');

    let rest = if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else {
        return Err(ClientError::InvalidUrl(base_url.to_string()));
    };

    Ok(format!("{}/ws", rest))
}

/// Join the server's HTTP base URL and an endpoint path
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_with_unauthorized() {
        // テスト項目: Unauthorized エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::Unauthorized("401".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: Connection エラーの場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::Connection("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_with_unauthorized() {
        // テスト項目: Unauthorized エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::Unauthorized("401".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_and_at_limit() {
        // テスト項目: 上限未満なら再接続し、上限に達したら再接続しない
        // given (前提条件):
        let error = ClientError::Connection("network error".to_string());

        // when (操作) / then (期待する結果):
        assert!(should_attempt_reconnect(&error, 0, 5));
        assert!(should_attempt_reconnect(&error, 4, 5));
        assert!(!should_attempt_reconnect(&error, 5, 5));
    }

    #[test]
    fn test_should_attempt_reconnect_after_login_failure() {
        // テスト項目: 認証以外のログイン失敗（サーバー停止など）は再試行される
        // given (前提条件):
        let error = ClientError::Login("connection refused".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 1, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_websocket_url_from_http_base() {
        // テスト項目: http/https のベース URL から ws/wss のエンドポイントが導出される
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(
            websocket_url("http://127.0.0.1:8080").unwrap(),
            "ws://127.0.0.1:8080/ws"
        );
        assert_eq!(
            websocket_url("https://chat.example.com/").unwrap(),
            "wss://chat.example.com/ws"
        );
    }

    #[test]
    fn test_websocket_url_rejects_other_schemes() {
        // テスト項目: http/https 以外のスキームはエラーになる
        // given (前提条件):
        let base_url = "ftp://127.0.0.1";

        // when (操作):
        let result = websocket_url(base_url);

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        // テスト項目: 末尾のスラッシュが重複しない
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(
            endpoint_url("http://127.0.0.1:8080/", "/login"),
            "http://127.0.0.1:8080/login"
        );
    }
}
