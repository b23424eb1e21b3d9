//! Session issuer: signs and verifies JWTs.
//!
//! Two token kinds share one secret. Access tokens authorize requests,
//! refresh tokens only buy a new pair.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::Account;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub role: String,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned after a successful login or refresh
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
    /// Always "Bearer"
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 28800)]
    pub expires_in: i64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait SessionIssuer: Send + Sync {
    /// Mint an access and refresh token for `account`
    fn issue(&self, account: &Account) -> AppResult<TokenResponse>;

    /// Check signature, expiry and kind. Any failure is `Unauthorized`.
    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims>;
}

/// HS256 implementation of [`SessionIssuer`]
pub struct JwtSessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_hours: i64,
    refresh_hours: i64,
}

impl JwtSessions {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret_bytes()),
            access_hours: config.jwt_expiration_hours,
            refresh_hours: config.jwt_refresh_expiration_hours,
        }
    }

    fn sign(&self, account: &Account, kind: TokenKind, hours: i64) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: account.id,
            email: account.email.clone(),
            role: account.role.to_string(),
            kind,
            exp: (now + Duration::hours(hours)).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }
}

impl SessionIssuer for JwtSessions {
    fn issue(&self, account: &Account) -> AppResult<TokenResponse> {
        Ok(TokenResponse {
            access_token: self.sign(account, TokenKind::Access, self.access_hours)?,
            refresh_token: self.sign(account, TokenKind::Refresh, self.refresh_hours)?,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.access_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| {
                tracing::debug!("Rejected token: {}", e);
                AppError::Unauthorized
            })?
            .claims;

        if claims.kind != kind {
            tracing::debug!(expected = ?kind, got = ?claims.kind, "Token kind mismatch");
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApprovalStatus, Role};

    fn sessions() -> JwtSessions {
        let config = Config::new("sqlite::memory:", "x".repeat(32)).unwrap();
        JwtSessions::new(&config)
    }

    fn account() -> Account {
        Account {
            id: 42,
            email: "a@x.com".to_string(),
            password_hash: String::new(),
            name: "Ada".to_string(),
            role: Role::Doctor,
            status: ApprovalStatus::Approved,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify_access() {
        let sessions = sessions();
        let tokens = sessions.issue(&account()).unwrap();

        let claims = sessions.verify(&tokens.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "doctor");
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 8 * 3600);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let sessions = sessions();
        let tokens = sessions.issue(&account()).unwrap();

        assert!(matches!(
            sessions.verify(&tokens.refresh_token, TokenKind::Access),
            Err(AppError::Unauthorized)
        ));
        assert!(sessions.verify(&tokens.refresh_token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = JwtSessions::new(&Config::new("sqlite::memory:", "y".repeat(32)).unwrap());
        let tokens = other.issue(&account()).unwrap();

        assert!(matches!(
            sessions().verify(&tokens.access_token, TokenKind::Access),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            sessions().verify("not-a-jwt", TokenKind::Access),
            Err(AppError::Unauthorized)
        ));
    }
}
