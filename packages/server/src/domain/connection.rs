//! 接続ハンドル
//!
//! 1 本の WebSocket 接続への送信能力を表します。
//! 実際のソケット書き込みは UI 層の pusher タスクが行い、ハンドルはそのタスクへのチャンネルを持つだけです。
//! pusher タスクが終了している（ピアが切断済み）場合、`push` は失敗します。

use tokio::sync::mpsc;

use super::{
    entity::ChatMessage,
    error::TransportError,
    value_object::{ConnectionId, Sequence, Username},
};

/// pusher タスクへ送るチャンネル
pub type PusherChannel = mpsc::UnboundedSender<ChatMessage>;

/// 接続ハンドル
///
/// Registry はこのハンドルの clone（送信側のみ）を保持する。
/// 所有者はセッションハンドラーで、セッション終了とともにソケットは解放される。
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    username: Username,
    sender: PusherChannel,
    /// 受け入れ時点でキューに投入済みだった最後の順番
    admitted_at: Sequence,
}

impl ConnectionHandle {
    pub fn new(username: Username, sender: PusherChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            username,
            sender,
            admitted_at: Sequence::ZERO,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn admitted_at(&self) -> Sequence {
        self.admitted_at
    }

    /// 受け入れ時点の順番を記録したハンドルを返す
    pub fn admitted_after(mut self, seq: Sequence) -> Self {
        self.admitted_at = seq;
        self
    }

    /// このメッセージをブロードキャストで受け取るべきか
    ///
    /// 受け入れ時点までに投入されたメッセージは履歴リプレイで届いている（あるいは履歴から溢れている）。
    pub fn should_receive(&self, seq: Sequence) -> bool {
        seq > self.admitted_at
    }

    /// メッセージを 1 件送る
    pub fn push(&self, message: ChatMessage) -> Result<(), TransportError> {
        self.sender
            .send(message)
            .map_err(|_| TransportError::PeerGone(self.id))
    }

    /// pusher タスクがまだ生きているか
    #[cfg(test)]
    fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}
