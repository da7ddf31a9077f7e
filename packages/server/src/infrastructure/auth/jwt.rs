//! JWT によるトークン発行・検証
//!
//! 署名アルゴリズムは HS256 に固定します。ヘッダーが別のアルゴリズム（`none` を含む）を
//! 名乗るトークンは、ペイロードの内容にかかわらず拒否します。

use std::sync::Arc;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AuthError, IdentityClaim, IssuedToken, SigningError, TokenService, Username,
};
use hiroba_shared::time::{Clock, SystemClock};

/// トークンの有効期間の既定値（24 時間）
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    username: String,
    iat: i64,
    exp: i64,
}

/// HS256 の JWT を発行・検証するサービス
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.algorithms = vec![ALGORITHM];
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
            clock: Arc::new(SystemClock),
        }
    }

    /// 発行時刻の基準となる時計を差し替える
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, username: &Username) -> Result<IssuedToken, SigningError> {
        let issued_at = self.clock.now_unix_seconds();
        let claims = TokenClaims {
            username: username.as_str().to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl_seconds,
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| SigningError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            username: username.clone(),
            expires_at: claims.exp,
        })
    }

    fn validate(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    AuthError::UnexpectedAlgorithm
                }
                ErrorKind::MissingRequiredClaim(claim) => {
                    AuthError::InvalidClaims(format!("missing '{}'", claim))
                }
                _ => AuthError::Malformed(e.to_string()),
            })?
            .claims;

        let username = Username::new(claims.username)
            .map_err(|e| AuthError::InvalidClaims(e.to_string()))?;

        Ok(IdentityClaim {
            username,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use hiroba_shared::time::{FixedClock, get_unix_timestamp};

    use super::*;

    const TEST_SECRET: &[u8] = b"hiroba_test_secret_that_is_long_enough";

    fn alice() -> Username {
        Username::new("alice".to_string()).unwrap()
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        // テスト項目: 発行したトークンを検証すると同じユーザー名と約 24 時間後の期限が得られる
        // given (前提条件):
        let service = JwtTokenService::new(TEST_SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let before = get_unix_timestamp();

        // when (操作):
        let issued = service.issue(&alice()).unwrap();
        let claim = service.validate(&issued.token).unwrap();

        // then (期待する結果):
        let after = get_unix_timestamp();
        assert_eq!(claim.username, alice());
        assert_eq!(claim.expires_at, issued.expires_at);
        assert!(claim.expires_at >= before + DEFAULT_TOKEN_TTL_SECONDS);
        assert!(claim.expires_at <= after + DEFAULT_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_expiry_follows_injected_clock() {
        // テスト項目: 期限は注入した時計の時刻 + TTL になる
        // given (前提条件):
        let now = get_unix_timestamp();
        let service = JwtTokenService::new(TEST_SECRET, 3600)
            .with_clock(Arc::new(FixedClock::new(now)));

        // when (操作):
        let issued = service.issue(&alice()).unwrap();

        // then (期待する結果):
        assert_eq!(issued.expires_at, now + 3600);
    }

    #[test]
    fn test_rejects_expired_token() {
        // テスト項目: 期限切れのトークンは拒否される
        // given (前提条件):
        let issued_at = get_unix_timestamp() - DEFAULT_TOKEN_TTL_SECONDS - 10;
        let service = JwtTokenService::new(TEST_SECRET, DEFAULT_TOKEN_TTL_SECONDS)
            .with_clock(Arc::new(FixedClock::new(issued_at)));
        let issued = service.issue(&alice()).unwrap();

        // when (操作):
        let result = service.validate(&issued.token);

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::Expired));
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        // テスト項目: 別の鍵で署名されたトークンは署名エラーになる
        // given (前提条件):
        let other = JwtTokenService::new(b"another_secret_value_for_signing!", 60);
        let service = JwtTokenService::new(TEST_SECRET, 60);
        let issued = other.issue(&alice()).unwrap();

        // when (操作):
        let result = service.validate(&issued.token);

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_rejects_token_with_other_hmac_algorithm() {
        // テスト項目: 同じ鍵でも HS384 で署名されたトークンは拒否される
        // given (前提条件):
        let service = JwtTokenService::new(TEST_SECRET, 60);
        let now = get_unix_timestamp();
        let claims = TokenClaims {
            username: "alice".to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        // when (操作):
        let result = service.validate(&token);

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::UnexpectedAlgorithm));
    }

    #[test]
    fn test_rejects_unsigned_none_algorithm_token() {
        // テスト項目: alg=none の未署名トークンはペイロードにかかわらず拒否される
        // given (前提条件):
        let service = JwtTokenService::new(TEST_SECRET, 60);
        let now = get_unix_timestamp();
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"username":"alice","iat":{},"exp":{}}}"#,
            now,
            now + 60
        ));

        for token in [format!("{}.{}.", header, payload), format!("{}.{}", header, payload)] {
            // when (操作):
            let result = service.validate(&token);

            // then (期待する結果):
            assert!(result.is_err(), "token {} must be rejected", token);
        }
    }

    #[test]
    fn test_rejects_garbage_and_tampered_tokens() {
        // テスト項目: 形式不正・改ざんされたトークンは拒否される
        // given (前提条件):
        let service = JwtTokenService::new(TEST_SECRET, 60);
        let issued = service.issue(&alice()).unwrap();
        let tampered = format!("{}x", issued.token);

        // when (操作) / then (期待する結果):
        assert!(matches!(
            service.validate("not-a-token"),
            Err(AuthError::Malformed(_))
        ));
        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn test_rejects_token_with_empty_username() {
        // テスト項目: username クレームが空のトークンは拒否される
        // given (前提条件):
        let service = JwtTokenService::new(TEST_SECRET, 60);
        let now = get_unix_timestamp();
        let claims = TokenClaims {
            username: String::new(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        // when (操作):
        let result = service.validate(&token);

        // then (期待する結果):
        assert!(matches!(result, Err(AuthError::InvalidClaims(_))));
    }
}
