//! メッセージの順序付け
//!
//! すべてのセッションハンドラーが共有するゲートです。
//!
//! - `publish`: 順番の払い出し・キュー投入・履歴追加を 1 つのロックの下で行う
//! - `announce`: 履歴には残さずにキューへ投入する（参加通知など）
//! - `admit`: 履歴スナップショットのリプレイとレジストリ登録を同じロックの下で行う
//!
//! 受け入れ時にはその時点で払い出し済みの最後の順番をハンドルに記録し、
//! ディスパッチャーはそれ以前のメッセージをそのハンドルに送りません。
//! これにより新規参加者は各メッセージを「リプレイ」か「ブロードキャスト」のどちらか一方で、
//! ちょうど 1 回ずつ、リプレイを先にして受け取ります。

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::domain::{
    ChatMessage, ConnectionHandle, ConnectionId, ConnectionRegistry, HistoryStore, Sequence,
    SequencedMessage,
};

use super::error::{AdmitError, SequencerError};

pub struct MessageSequencer {
    /// 最後に払い出した順番
    last_seq: Mutex<Sequence>,
    history: Arc<dyn HistoryStore>,
    registry: Arc<dyn ConnectionRegistry>,
    queue: mpsc::UnboundedSender<SequencedMessage>,
}

impl MessageSequencer {
    /// 新しい MessageSequencer と、ディスパッチャーが読むキューの受信側を作成
    pub fn new(
        history: Arc<dyn HistoryStore>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> (Self, mpsc::UnboundedReceiver<SequencedMessage>) {
        let (queue, rx) = mpsc::unbounded_channel();
        let sequencer = Self {
            last_seq: Mutex::new(Sequence::ZERO),
            history,
            registry,
            queue,
        };
        (sequencer, rx)
    }

    /// 履歴に追加してブロードキャストのキューに投入する
    ///
    /// 呼び出し元のタスクが途中で中断されても、順番は払い出し済みとして進め、
    /// 「履歴にもキューにも入らない」か「両方に入る」のどちらかになる。
    /// 履歴への追加が唯一の await で、キューへの投入は同期的に行う。
    pub async fn publish(&self, message: ChatMessage) -> Result<Sequence, SequencerError> {
        let mut last_seq = self.last_seq.lock().await;
        if self.queue.is_closed() {
            return Err(SequencerError::QueueClosed);
        }

        let seq = last_seq.next();
        *last_seq = seq;

        self.history.append(message.clone()).await;
        self.enqueue(seq, message)?;

        Ok(seq)
    }

    /// 受け入れ済みのハンドルを登録から外す
    pub async fn withdraw(&self, id: &ConnectionId) -> bool {
        self.registry.remove(id).await
    }

    /// 履歴には残さずブロードキャストのキューに投入する
    pub async fn announce(&self, message: ChatMessage) -> Result<Sequence, SequencerError> {
        let mut last_seq = self.last_seq.lock().await;
        let seq = last_seq.next();

        self.enqueue(seq, message)?;
        *last_seq = seq;

        Ok(seq)
    }

    /// 履歴をリプレイしてからレジストリに登録する
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - リプレイしたメッセージ数
    /// * `Err(AdmitError::Replay)` - リプレイ中に接続が切れた（登録はしない）
    pub async fn admit(&self, handle: ConnectionHandle) -> Result<usize, AdmitError> {
        let last_seq = self.last_seq.lock().await;

        let backlog = self.history.snapshot().await;
        let replayed = backlog.len();
        for message in backlog {
            handle.push(message)?;
        }

        self.registry.add(handle.admitted_after(*last_seq)).await;

        Ok(replayed)
    }

    /// 最後に払い出した順番
    #[cfg(test)]
    async fn last_sequence(&self) -> Sequence {
        *self.last_seq.lock().await
    }

    fn enqueue(&self, seq: Sequence, message: ChatMessage) -> Result<(), SequencerError> {
        self.queue
            .send(SequencedMessage { seq, message })
            .map_err(|_| SequencerError::QueueClosed)
    }
}
