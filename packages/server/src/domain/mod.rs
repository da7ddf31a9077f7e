//! ドメイン層
//!
//! リレーの中核となる型（メッセージ、履歴バッファ、接続ハンドル）と、
//! インフラ層が実装すべき trait を定義します。

pub mod auth;
pub mod connection;
pub mod entity;
pub mod error;
pub mod history;
pub mod repository;
pub mod session;
pub mod value_object;

pub use auth::TokenService;
pub use connection::{ConnectionHandle, PusherChannel};
pub use entity::{ChatMessage, IdentityClaim, IssuedToken, SequencedMessage};
pub use error::{AuthError, CredentialError, SigningError, TransportError, ValueObjectError};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryBuffer};
pub use repository::{ConnectionRegistry, CredentialStore, HistoryStore};
pub use session::SessionState;
pub use value_object::{ConnectionId, Sequence, Username};
