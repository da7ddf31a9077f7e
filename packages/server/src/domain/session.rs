//! セッションの状態遷移
//!
//! `Connecting → Authenticating → Admitted → Streaming → Closed`
//! どの状態からでも `Closed` には遷移できる。

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Authenticating,
    Admitted,
    Streaming,
    Closed,
}

impl SessionState {
    /// 次の状態へ遷移できるか
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, next),
            (Connecting, Authenticating)
                | (Authenticating, Admitted)
                | (Admitted, Streaming)
                | (Connecting | Authenticating | Admitted | Streaming, Closed)
        )
    }

    /// 遷移する。不正な遷移の場合は現在の状態を `Err` で返す
    pub fn transition(self, next: SessionState) -> Result<SessionState, SessionState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Connecting => "connecting",
            SessionState::Authenticating => "authenticating",
            SessionState::Admitted => "admitted",
            SessionState::Streaming => "streaming",
            SessionState::Closed => "closed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState::*;
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        // テスト項目: 正常系の遷移がすべて許可される
        // given (前提条件):
        let path = [Connecting, Authenticating, Admitted, Streaming, Closed];

        // when (操作) / then (期待する結果):
        let mut state = path[0];
        for next in &path[1..] {
            state = state.transition(*next).unwrap();
        }
        assert_eq!(state, Closed);
    }

    #[test]
    fn test_any_open_state_can_close() {
        // テスト項目: 認証失敗や読み込みエラーでどの状態からでも Closed に遷移できる
        // given (前提条件):
        let states = [Connecting, Authenticating, Admitted, Streaming];

        // when (操作) / then (期待する結果):
        for state in states {
            assert!(state.can_transition_to(Closed), "{} -> closed", state);
        }
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        // テスト項目: 状態を飛ばす遷移や Closed からの遷移は拒否される
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(Connecting.transition(Streaming), Err(Connecting));
        assert_eq!(Authenticating.transition(Streaming), Err(Authenticating));
        assert_eq!(Closed.transition(Connecting), Err(Closed));
        assert_eq!(Closed.transition(Closed), Err(Closed));
    }
}
