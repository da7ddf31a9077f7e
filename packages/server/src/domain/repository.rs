//! Repository trait 定義
//!
//! ドメイン層が必要とする共有状態へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 複数のセッションとディスパッチャーから同時に呼ばれるため、
//! 実装は内部で排他制御を行う必要があります。

use async_trait::async_trait;

use super::{
    connection::ConnectionHandle, entity::ChatMessage, error::CredentialError,
    value_object::ConnectionId, value_object::Username,
};

/// 接続中のハンドルの集合
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// ハンドルを登録する（同じ ID なら置き換え）
    async fn add(&self, handle: ConnectionHandle);

    /// ハンドルを削除する。存在した場合は `true`
    async fn remove(&self, id: &ConnectionId) -> bool;

    /// 現在のハンドルのコピーを返す（順序保証なし）
    async fn snapshot(&self) -> Vec<ConnectionHandle>;

    /// 接続中のハンドル数
    async fn count(&self) -> usize;
}

/// 履歴バッファの共有ストア
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// メッセージを追加する
    async fn append(&self, message: ChatMessage);

    /// 到着順のコピーを返す
    async fn snapshot(&self) -> Vec<ChatMessage>;

    /// 現在の件数
    async fn count(&self) -> usize;

    /// 容量
    fn capacity(&self) -> usize;
}

/// ログイン時のパスワード確認
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// パスワードを確認する。ストアによっては初回ログイン時に登録する
    async fn verify(&self, username: &Username, password: &str) -> Result<(), CredentialError>;
}
