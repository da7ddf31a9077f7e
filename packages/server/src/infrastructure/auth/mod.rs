//! 認証まわりの実装
//!
//! - `jwt`: HS256 の JWT によるトークン発行・検証
//! - `credential`: ログイン時のパスワード確認（Argon2）

pub mod credential;
pub mod jwt;

pub use credential::{AcceptAnyCredentials, FirstUseCredentialStore};
pub use jwt::{DEFAULT_TOKEN_TTL_SECONDS, JwtTokenService};
