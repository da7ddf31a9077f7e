//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{CredentialError, SigningError, TransportError, ValueObjectError};

/// ディスパッチャーのキューへの投入エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// ディスパッチャーが停止している
    #[error("dispatcher queue is closed")]
    QueueClosed,
}

/// ログインのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] ValueObjectError),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Signing(#[from] SigningError),
}

/// セッション受け入れのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmitError {
    /// 履歴リプレイ中に接続が切れた
    #[error("history replay failed: {0}")]
    Replay(#[from] TransportError),

    #[error(transparent)]
    Sequencer(#[from] SequencerError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
}
