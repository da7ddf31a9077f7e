//! UseCase: ログイン（トークン発行）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：空でないユーザー名ならトークンが発行される
//! - 異常系：空のユーザー名、パスワード不一致、署名失敗

use std::sync::Arc;

use crate::domain::{CredentialStore, IssuedToken, TokenService, Username};

use super::error::LoginError;

/// ログインのユースケース
pub struct LoginUseCase {
    /// トークンの発行・検証
    token_service: Arc<dyn TokenService>,
    /// パスワード確認
    credentials: Arc<dyn CredentialStore>,
}

impl LoginUseCase {
    pub fn new(token_service: Arc<dyn TokenService>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            token_service,
            credentials,
        }
    }

    /// ログインを実行
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - 署名済みトークン
    /// * `Err(LoginError)` - ユーザー名が空、パスワード不一致、または署名失敗
    pub async fn execute(&self, username: String, password: &str) -> Result<IssuedToken, LoginError> {
        // 1. ユーザー名を検証
        let username = Username::new(username)?;

        // 2. パスワードを確認
        self.credentials.verify(&username, password).await?;

        // 3. トークンを発行
        let issued = self.token_service.issue(&username)?;
        tracing::info!("Issued token for '{}' (expires at {})", username, issued.expires_at);

        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{CredentialError, SigningError, ValueObjectError, auth::MockTokenService},
        infrastructure::auth::{AcceptAnyCredentials, FirstUseCredentialStore},
    };

    fn issued_for(username: &Username) -> IssuedToken {
        IssuedToken {
            token: "signed".to_string(),
            username: username.clone(),
            expires_at: 1_000,
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_for_any_password() {
        // テスト項目: 既定のストアではどのパスワードでもトークンが発行される
        // given (前提条件):
        let mut token_service = MockTokenService::new();
        token_service
            .expect_issue()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(|username| Ok(issued_for(username)));
        let usecase = LoginUseCase::new(Arc::new(token_service), Arc::new(AcceptAnyCredentials));

        // when (操作):
        let result = usecase.execute("alice".to_string(), "anything").await;

        // then (期待する結果):
        let issued = result.unwrap();
        assert_eq!(issued.username.as_str(), "alice");
        assert_eq!(issued.token, "signed");
    }

    #[tokio::test]
    async fn test_login_rejects_empty_username() {
        // テスト項目: 空のユーザー名ではトークンが発行されない
        // given (前提条件):
        let mut token_service = MockTokenService::new();
        token_service.expect_issue().times(0);
        let usecase = LoginUseCase::new(Arc::new(token_service), Arc::new(AcceptAnyCredentials));

        // when (操作):
        let result = usecase.execute(String::new(), "pw").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(LoginError::InvalidUsername(ValueObjectError::EmptyUsername))
        );
    }

    #[tokio::test]
    async fn test_login_surfaces_signing_error() {
        // テスト項目: 署名に失敗した場合 Signing エラーが返る
        // given (前提条件):
        let mut token_service = MockTokenService::new();
        token_service
            .expect_issue()
            .returning(|_| Err(SigningError("boom".to_string())));
        let usecase = LoginUseCase::new(Arc::new(token_service), Arc::new(AcceptAnyCredentials));

        // when (操作):
        let result = usecase.execute("alice".to_string(), "pw").await;

        // then (期待する結果):
        assert_eq!(result, Err(LoginError::Signing(SigningError("boom".to_string()))));
    }

    #[tokio::test]
    async fn test_login_with_first_use_store_rejects_wrong_password() {
        // テスト項目: FirstUse ストアでは 2 回目以降のパスワード不一致が拒否される
        // given (前提条件):
        let mut token_service = MockTokenService::new();
        token_service
            .expect_issue()
            .times(1)
            .returning(|username| Ok(issued_for(username)));
        let usecase = LoginUseCase::new(
            Arc::new(token_service),
            Arc::new(FirstUseCredentialStore::new()),
        );
        usecase.execute("alice".to_string(), "secret").await.unwrap();

        // when (操作):
        let result = usecase.execute("alice".to_string(), "wrong").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(LoginError::Credentials(CredentialError::Rejected(
                "alice".to_string()
            )))
        );
    }
}
