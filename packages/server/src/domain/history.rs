//! 履歴バッファ
//!
//! 新規参加者にリプレイするための、容量固定の FIFO ログ。
//! 同期は持たない純粋なデータ構造で、共有する場合は `HistoryStore` 実装がロックで保護する。

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// 保持するメッセージ数の既定値
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// 容量固定の履歴バッファ
///
/// 不変条件: `len() <= capacity()`。容量を超える追加では最も古いメッセージから破棄する。
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<ChatMessage>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// メッセージを末尾に追加する
    ///
    /// 容量 0 のバッファは何も保持しない。
    pub fn append(&mut self, message: ChatMessage) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    /// 到着順のコピーを返す
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Username;

    fn message(index: usize) -> ChatMessage {
        ChatMessage::new(
            Username::new("alice".to_string()).unwrap(),
            format!("message {}", index),
        )
    }

    #[test]
    fn test_empty_buffer_snapshot() {
        // テスト項目: 空のバッファのスナップショットは空
        // given (前提条件):
        let buffer = HistoryBuffer::default();

        // when (操作):
        let snapshot = buffer.snapshot();

        // then (期待する結果):
        assert!(snapshot.is_empty());
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_snapshot_keeps_last_min_n_capacity_in_order() {
        // テスト項目: N 件追加後のスナップショットは直近 min(N, 100) 件を到着順で保持する
        // given (前提条件):
        let counts = [0, 1, 99, 100, 101, 250];

        for n in counts {
            let mut buffer = HistoryBuffer::new(DEFAULT_HISTORY_CAPACITY);

            // when (操作):
            for i in 0..n {
                buffer.append(message(i));
            }
            let snapshot = buffer.snapshot();

            // then (期待する結果):
            let expected_len = n.min(DEFAULT_HISTORY_CAPACITY);
            assert_eq!(snapshot.len(), expected_len, "n = {}", n);
            let expected: Vec<ChatMessage> = (n - expected_len..n).map(message).collect();
            assert_eq!(snapshot, expected, "n = {}", n);
        }
    }

    #[test]
    fn test_eviction_is_fifo() {
        // テスト項目: 容量超過時は最も古いメッセージから破棄される
        // given (前提条件):
        let mut buffer = HistoryBuffer::new(2);
        buffer.append(message(1));
        buffer.append(message(2));

        // when (操作):
        buffer.append(message(3));

        // then (期待する結果):
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.snapshot(), vec![message(2), message(3)]);
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        // テスト項目: 容量 0 のバッファは何も保持しない
        // given (前提条件):
        let mut buffer = HistoryBuffer::new(0);

        // when (操作):
        buffer.append(message(1));

        // then (期待する結果):
        assert!(buffer.is_empty());
    }
}
