//! InMemory HistoryStore 実装
//!
//! `HistoryBuffer` を `tokio::sync::Mutex` で保護します。
//! 追加とスナップショットは同じロックの下で行うため、途中まで書き込まれたメッセージが見えることはありません。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, HistoryBuffer, HistoryStore};

pub struct InMemoryHistoryStore {
    buffer: Mutex<HistoryBuffer>,
    capacity: usize,
}

impl InMemoryHistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(HistoryBuffer::new(capacity)),
            capacity,
        }
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, message: ChatMessage) {
        let mut buffer = self.buffer.lock().await;
        buffer.append(message);
    }

    async fn snapshot(&self) -> Vec<ChatMessage> {
        let buffer = self.buffer.lock().await;
        buffer.snapshot()
    }

    async fn count(&self) -> usize {
        let buffer = self.buffer.lock().await;
        buffer.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;
    use crate::domain::{DEFAULT_HISTORY_CAPACITY, Username};

    #[tokio::test]
    async fn test_concurrent_appends_keep_capacity_without_corruption() {
        // テスト項目: 複数タスクから同時に追加しても min(N*M, 100) 件が重複なく保持される
        // given (前提条件):
        let store = Arc::new(InMemoryHistoryStore::new(DEFAULT_HISTORY_CAPACITY));
        let writers = 8;
        let per_writer = 40;

        // when (操作):
        let mut tasks = Vec::new();
        for w in 0..writers {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let author = Username::new(format!("writer{}", w)).unwrap();
                for i in 0..per_writer {
                    store
                        .append(ChatMessage::new(author.clone(), format!("{}-{}", w, i)))
                        .await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // then (期待する結果):
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), (writers * per_writer).min(DEFAULT_HISTORY_CAPACITY));
        assert_eq!(store.count().await, snapshot.len());
        let unique: HashSet<&str> = snapshot.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(unique.len(), snapshot.len());
        for message in &snapshot {
            let (writer, _) = message.content.split_once('-').unwrap();
            assert_eq!(message.author.as_str(), format!("writer{}", writer));
        }
    }
}
