//! トークン発行・検証の trait
//!
//! 具体的な実装（JWT）は Infrastructure 層が提供します。

use super::{
    entity::{IdentityClaim, IssuedToken},
    error::{AuthError, SigningError},
    value_object::Username,
};

/// 署名付き・期限付きの本人確認トークンを扱うサービス
///
/// ステートレスで、暗号計算以外の副作用を持たない。
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// トークンを発行する
    fn issue(&self, username: &Username) -> Result<IssuedToken, SigningError>;

    /// トークンを検証し、埋め込まれたクレームを返す
    fn validate(&self, token: &str) -> Result<IdentityClaim, AuthError>;
}
