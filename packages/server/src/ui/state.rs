//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::{ConnectionRegistry, HistoryStore},
    usecase::{AdmitSessionUseCase, DisconnectSessionUseCase, LoginUseCase, SendMessageUseCase},
};

/// Shared application state
pub struct AppState {
    /// LoginUseCase（トークン発行のユースケース）
    pub login_usecase: Arc<LoginUseCase>,
    /// AdmitSessionUseCase（認証とセッション受け入れのユースケース）
    pub admit_session_usecase: Arc<AdmitSessionUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectSessionUseCase（セッション切断のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// 統計・デバッグ用の読み取り
    pub registry: Arc<dyn ConnectionRegistry>,
    pub history: Arc<dyn HistoryStore>,
    /// Cookie の Max-Age（秒）
    pub token_ttl_seconds: i64,
}
