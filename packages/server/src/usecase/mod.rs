//! UseCase 層
//!
//! セッションのライフサイクル（ログイン・受け入れ・送信・切断）と、
//! メッセージの順序付け・配信を担当します。

pub mod admit_session;
pub mod disconnect_session;
pub mod dispatcher;
pub mod error;
pub mod login;
pub mod send_message;
pub mod sequencer;

pub use admit_session::AdmitSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use dispatcher::{BroadcastDispatcher, DispatchReport};
pub use error::{AdmitError, LoginError, SendMessageError, SequencerError};
pub use login::LoginUseCase;
pub use send_message::SendMessageUseCase;
pub use sequencer::MessageSequencer;
