//! InMemory ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - 接続中の `ConnectionHandle` を ID で管理
//! - ディスパッチャーへのスナップショット提供（copy-on-read）
//!
//! ## 排他制御
//!
//! `tokio::sync::Mutex` で HashMap を保護します。
//! ロックはメンバーシップの変更とコピーの間だけ保持し、送信中には保持しません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionHandle, ConnectionId, ConnectionRegistry};

/// インメモリの接続レジストリ
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: ConnectionId
    /// Value: ConnectionHandle
    connections: Mutex<HashMap<ConnectionId, ConnectionHandle>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add(&self, handle: ConnectionHandle) {
        let mut connections = self.connections.lock().await;
        let id = handle.id();
        let username = handle.username().clone();
        connections.insert(id, handle);
        tracing::debug!(
            "Connection '{}' ({}) registered, {} connected",
            id,
            username,
            connections.len()
        );
    }

    async fn remove(&self, id: &ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(id).is_some();
        if removed {
            tracing::debug!(
                "Connection '{}' unregistered, {} connected",
                id,
                connections.len()
            );
        }
        removed
    }

    async fn snapshot(&self) -> Vec<ConnectionHandle> {
        let connections = self.connections.lock().await;
        connections.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}
