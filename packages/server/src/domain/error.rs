//! ドメイン層のエラー型

use thiserror::Error;

use super::value_object::ConnectionId;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    EmptyUsername,
}

/// トークン検証エラー
///
/// いずれの場合もアップグレードは拒否される（401）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("token expired")]
    Expired,

    #[error("invalid claims: {0}")]
    InvalidClaims(String),
}

/// トークン署名エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to sign token: {0}")]
pub struct SigningError(pub String);

/// 接続の読み書きエラー
///
/// 所有するセッションだけを終了させる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection '{0}' is gone")]
    PeerGone(ConnectionId),

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("read failed: {0}")]
    Read(String),
}

/// 認証情報の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("credentials rejected for '{0}'")]
    Rejected(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}
