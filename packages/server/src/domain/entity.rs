//! エンティティ

use serde::{Deserialize, Serialize};

use super::value_object::{Sequence, Username};

/// チャットメッセージ
///
/// 生成後は変更されない。履歴バッファとディスパッチャーのキューで共有される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: Username,
    pub content: String,
}

impl ChatMessage {
    pub fn new(author: Username, content: impl Into<String>) -> Self {
        Self {
            author,
            content: content.into(),
        }
    }

    /// 参加通知（`Server` が送信者）
    pub fn join_notice(username: &Username) -> Self {
        Self::new(Username::server(), format!("{} joined the chat", username))
    }
}

/// キュー上の順番が付与されたメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedMessage {
    pub seq: Sequence,
    pub message: ChatMessage,
}

/// 検証済みトークンのペイロード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub username: Username,
    /// 有効期限（Unix 秒）
    pub expires_at: i64,
}

/// 発行されたトークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub username: Username,
    /// 有効期限（Unix 秒）
    pub expires_at: i64,
}
