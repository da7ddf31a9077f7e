//! UseCase: メッセージ送信
//!
//! 受信したメッセージを履歴に追加し、ブロードキャストのキューに投入します。
//! 両者は `MessageSequencer` のロックの下で 1 つの操作として行われます。

use std::sync::Arc;

use crate::domain::{ChatMessage, Sequence};

use super::{error::SendMessageError, sequencer::MessageSequencer};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    sequencer: Arc<MessageSequencer>,
}

impl SendMessageUseCase {
    pub fn new(sequencer: Arc<MessageSequencer>) -> Self {
        Self { sequencer }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Sequence)` - キュー上の順番
    /// * `Err(SendMessageError)` - ディスパッチャーが停止している
    pub async fn execute(&self, message: ChatMessage) -> Result<Sequence, SendMessageError> {
        let seq = self.sequencer.publish(message).await?;
        Ok(seq)
    }
}
