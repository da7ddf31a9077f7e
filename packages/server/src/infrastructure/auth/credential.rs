//! ログイン時のパスワード確認
//!
//! - `AcceptAnyCredentials`: パスワードを確認しない（どのパスワードでもトークンを発行する）
//! - `FirstUseCredentialStore`: 初回ログイン時にパスワードの Argon2 ハッシュを登録し、以降は照合する
//!
//! ハッシュ計算は CPU を占有するため blocking スレッドプールで実行します。

use std::collections::{HashMap, hash_map::Entry};

use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{CredentialError, CredentialStore, Username};

/// パスワードを確認しないストア
#[derive(Debug, Default)]
pub struct AcceptAnyCredentials;

#[async_trait]
impl CredentialStore for AcceptAnyCredentials {
    async fn verify(&self, username: &Username, _password: &str) -> Result<(), CredentialError> {
        tracing::debug!("Accepting login for '{}' without password check", username);
        Ok(())
    }
}

/// 初回ログインで登録し、以降は照合するストア
#[derive(Default)]
pub struct FirstUseCredentialStore {
    /// Key: Username
    /// Value: PHC 形式の Argon2 ハッシュ
    hashes: Mutex<HashMap<Username, String>>,
}

impl FirstUseCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みのハッシュと照合する
    async fn check(
        &self,
        username: &Username,
        password: String,
        stored: String,
    ) -> Result<(), CredentialError> {
        let matched = run_blocking(move || verify_password(&password, &stored)).await?;
        if matched {
            Ok(())
        } else {
            tracing::warn!("Password mismatch for '{}'", username);
            Err(CredentialError::Rejected(username.to_string()))
        }
    }
}

#[async_trait]
impl CredentialStore for FirstUseCredentialStore {
    async fn verify(&self, username: &Username, password: &str) -> Result<(), CredentialError> {
        // ハッシュ計算中はロックを保持しない
        let stored = self.hashes.lock().await.get(username).cloned();
        if let Some(stored) = stored {
            return self.check(username, password.to_string(), stored).await;
        }

        let candidate = password.to_string();
        let hash = run_blocking(move || hash_password(&candidate)).await??;

        // 同じユーザーの初回ログインが競合した場合は、先に登録された方と照合する
        let existing = match self.hashes.lock().await.entry(username.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(hash);
                None
            }
            Entry::Occupied(entry) => Some(entry.get().clone()),
        };

        match existing {
            None => {
                tracing::info!("Registered credentials for '{}'", username);
                Ok(())
            }
            Some(stored) => self.check(username, password.to_string(), stored).await,
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, CredentialError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CredentialError::Hashing(e.to_string()))
}

fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hashing(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn alice() -> Username {
        Username::new("alice".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_accept_any_accepts_every_password() {
        // テスト項目: AcceptAnyCredentials はどのパスワードも受け入れる
        // given (前提条件):
        let store = AcceptAnyCredentials;

        // when (操作) / then (期待する結果):
        assert!(store.verify(&alice(), "one").await.is_ok());
        assert!(store.verify(&alice(), "two").await.is_ok());
    }

    #[tokio::test]
    async fn test_first_use_registers_then_verifies() {
        // テスト項目: 初回ログインでパスワードが登録され、同じパスワードなら以降も成功する
        // given (前提条件):
        let store = FirstUseCredentialStore::new();

        // when (操作):
        let first = store.verify(&alice(), "secret").await;
        let second = store.verify(&alice(), "secret").await;

        // then (期待する結果):
        assert!(first.is_ok());
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_first_use_rejects_wrong_password() {
        // テスト項目: 登録済みユーザーに異なるパスワードでログインすると拒否される
        // given (前提条件):
        let store = FirstUseCredentialStore::new();
        store.verify(&alice(), "secret").await.unwrap();

        // when (操作):
        let result = store.verify(&alice(), "guess").await;

        // then (期待する結果):
        assert_eq!(result, Err(CredentialError::Rejected("alice".to_string())));
    }

    #[tokio::test]
    async fn test_first_use_concurrent_registration_keeps_first_password() {
        // テスト項目: 同じユーザーの初回ログインが同時に行われても、登録されるパスワードは 1 つだけ
        // given (前提条件):
        let store = Arc::new(FirstUseCredentialStore::new());

        // when (操作):
        let tasks: Vec<_> = ["red", "blue"]
            .into_iter()
            .map(|password| {
                let store = store.clone();
                tokio::spawn(async move { store.verify(&alice(), password).await })
            })
            .collect();
        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }

        // then (期待する結果):
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let accepted = if results[0].is_ok() { "red" } else { "blue" };
        assert!(store.verify(&alice(), accepted).await.is_ok());
    }

    #[tokio::test]
    async fn test_first_use_different_users_register_concurrently() {
        // テスト項目: 別々のユーザーの初回ログインは互いに影響せず全員成功する
        // given (前提条件):
        let store = Arc::new(FirstUseCredentialStore::new());

        // when (操作):
        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let username = Username::new(format!("user{}", i)).unwrap();
                    store.verify(&username, "pw").await
                })
            })
            .collect();

        // then (期待する結果):
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
        assert_eq!(store.hashes.lock().await.len(), 4);
    }

    #[test]
    fn test_stored_hash_is_argon2id_phc_string() {
        // テスト項目: 保存されるハッシュは Argon2id の PHC 形式で、平文を含まない
        // given (前提条件):
        let password = "secret";

        // when (操作):
        let hash = hash_password(password).unwrap();

        // then (期待する結果):
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains(password));
        assert!(verify_password(password, &hash));
        assert!(!verify_password("other", &hash));
    }
}
