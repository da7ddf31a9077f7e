//! UseCase: セッションの切断
//!
//! セッション終了時にハンドルをレジストリから削除します。
//! ディスパッチャーが送信失敗で先に削除している場合もあるため、削除は冪等です。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry};

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectSessionUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// レジストリに残っていて今回削除した場合は `true`
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.registry.remove(connection_id).await;
        if !removed {
            tracing::debug!(
                "Connection '{}' was already pruned by the dispatcher",
                connection_id
            );
        }
        removed
    }
}
