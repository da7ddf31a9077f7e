//! UseCase: セッションの認証と受け入れ
//!
//! ## 処理の流れ
//!
//! 1. `authenticate`: アップグレード前にトークンを検証する
//! 2. `execute`: 履歴をリプレイしてレジストリに登録し、参加通知をキューに投入する

use std::sync::Arc;

use crate::domain::{
    AuthError, ChatMessage, ConnectionHandle, ConnectionId, IdentityClaim, PusherChannel,
    TokenService,
};

use super::{error::AdmitError, sequencer::MessageSequencer};

/// セッション受け入れの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub connection_id: ConnectionId,
    /// リプレイした履歴の件数
    pub replayed: usize,
}

/// セッション受け入れのユースケース
pub struct AdmitSessionUseCase {
    token_service: Arc<dyn TokenService>,
    sequencer: Arc<MessageSequencer>,
}

impl AdmitSessionUseCase {
    pub fn new(token_service: Arc<dyn TokenService>, sequencer: Arc<MessageSequencer>) -> Self {
        Self {
            token_service,
            sequencer,
        }
    }

    /// トークンを検証する
    pub fn authenticate(&self, token: Option<&str>) -> Result<IdentityClaim, AuthError> {
        let token = token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;
        self.token_service.validate(token)
    }

    /// 認証済みのセッションを受け入れる
    ///
    /// # Arguments
    ///
    /// * `claim` - 検証済みのクレーム
    /// * `sender` - このセッションの pusher タスクへのチャンネル
    pub async fn execute(
        &self,
        claim: &IdentityClaim,
        sender: PusherChannel,
    ) -> Result<Admission, AdmitError> {
        let handle = ConnectionHandle::new(claim.username.clone(), sender);
        let connection_id = handle.id();

        // 1. 履歴リプレイ + レジストリ登録
        let replayed = self.sequencer.admit(handle).await?;

        // 2. 参加通知（履歴には残さない）。投入できなければ登録を取り消す
        if let Err(e) = self
            .sequencer
            .announce(ChatMessage::join_notice(&claim.username))
            .await
        {
            self.sequencer.withdraw(&connection_id).await;
            return Err(e.into());
        }

        Ok(Admission {
            connection_id,
            replayed,
        })
    }
}
