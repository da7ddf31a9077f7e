//! ブロードキャストディスパッチャー
//!
//! プロセスに 1 つだけ存在する配信タスクです。キューからメッセージを 1 件ずつ順番に取り出し、
//! その時点でレジストリに登録されているすべての接続へ送ります。
//! 送信に失敗した接続は「切断済み」とみなしてレジストリから削除し、再送はしません。

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::{ConnectionId, ConnectionRegistry, SequencedMessage};

/// 1 回の配信の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// 送信できた接続数
    pub delivered: usize,
    /// 受け入れ前のメッセージのため送らなかった接続数
    pub skipped: usize,
    /// 送信に失敗して削除した接続
    pub pruned: Vec<ConnectionId>,
}

pub struct BroadcastDispatcher {
    registry: Arc<dyn ConnectionRegistry>,
    queue: mpsc::UnboundedReceiver<SequencedMessage>,
}

impl BroadcastDispatcher {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        queue: mpsc::UnboundedReceiver<SequencedMessage>,
    ) -> Self {
        Self { registry, queue }
    }

    /// キューが閉じられるまで配信を続ける
    pub async fn run(mut self) {
        tracing::info!("Broadcast dispatcher started");

        while let Some(sequenced) = self.queue.recv().await {
            let seq = sequenced.seq;
            let report = dispatch(self.registry.as_ref(), sequenced).await;
            tracing::debug!(
                "Dispatched {}: delivered={}, skipped={}, pruned={}",
                seq,
                report.delivered,
                report.skipped,
                report.pruned.len()
            );
        }

        tracing::warn!("Broadcast queue closed, dispatcher stopped");
    }
}

/// 1 件のメッセージをレジストリのスナップショット全体に配信する
pub async fn dispatch(
    registry: &dyn ConnectionRegistry,
    sequenced: SequencedMessage,
) -> DispatchReport {
    let SequencedMessage { seq, message } = sequenced;
    let mut report = DispatchReport::default();

    for handle in registry.snapshot().await {
        if !handle.should_receive(seq) {
            report.skipped += 1;
            continue;
        }

        match handle.push(message.clone()) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                tracing::warn!(
                    "Failed to send {} to '{}' ({}): {}",
                    seq,
                    handle.id(),
                    handle.username(),
                    e
                );
                registry.remove(&handle.id()).await;
                report.pruned.push(handle.id());
            }
        }
    }

    report
}
