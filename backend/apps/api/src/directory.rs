//! Postgres Directory
//!
//! One Postgres-backed collaborator serving both seams: the gateway's
//! token verification and the OTP workflow's account promotion.
//!
//! Session tokens are `<session_uuid>.<base64url(hmac)>`; the HMAC is
//! checked before the database is ever consulted, so forged tokens
//! cost one hash, not one query.

use chrono::Utc;
use kernel::id::{AccountId, AuthSessionId};
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use gateway::{AuthBackend, GatewayError, GatewayResult, TokenVerification};
use otp::{AccountDirectory, OtpError, OtpResult, PendingRegistration};

#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
    session_secret: [u8; 32],
    session_ttl: Duration,
}

impl PgDirectory {
    pub fn new(pool: PgPool, session_secret: [u8; 32], session_ttl: Duration) -> Self {
        Self {
            pool,
            session_secret,
            session_ttl,
        }
    }

    fn mint_token(&self, session_id: &AuthSessionId) -> String {
        let signature =
            platform::crypto::hmac_sha256(&self.session_secret, session_id.as_uuid().as_bytes());
        format!(
            "{}.{}",
            session_id,
            platform::crypto::to_base64url(&signature)
        )
    }

    /// Check the token's signature and extract its session id.
    fn parse_token(&self, token: &str) -> Option<AuthSessionId> {
        let (id_part, sig_part) = token.split_once('.')?;
        let session_id = Uuid::parse_str(id_part).ok()?;
        let provided = platform::crypto::from_base64url(sig_part).ok()?;

        let expected = platform::crypto::hmac_sha256(&self.session_secret, session_id.as_bytes());
        if platform::crypto::constant_time_eq(&expected, &provided) {
            Some(AuthSessionId::from_uuid(session_id))
        } else {
            None
        }
    }

    /// Delete sessions past their expiry.
    pub async fn cleanup_expired(&self) -> Result<u64, sqlx::Error> {
        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions = deleted, "Cleaned up expired auth sessions");
        Ok(deleted)
    }
}

impl AuthBackend for PgDirectory {
    async fn verify_token(&self, token: &str) -> GatewayResult<TokenVerification> {
        let Some(session_id) = self.parse_token(token) else {
            return Ok(TokenVerification::invalid());
        };

        let account_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT account_id FROM auth_sessions
            WHERE session_id = $1 AND expires_at > NOW()
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        Ok(match account_id {
            Some(account_id) => TokenVerification::valid(account_id.to_string()),
            None => TokenVerification::invalid(),
        })
    }
}

impl AccountDirectory for PgDirectory {
    async fn account_exists(&self, email: &str) -> OtpResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_account(&self, registration: &PendingRegistration) -> OtpResult<Uuid> {
        let account_id = AccountId::new();

        let inserted = sqlx::query(
            r#"
            INSERT INTO accounts (account_id, email, display_name, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(&registration.email)
        .bind(&registration.name)
        .bind(&registration.password_hash)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(OtpError::DuplicateAccount);
        }

        tracing::info!(account_id = %account_id, "Account created");
        Ok(account_id.into_uuid())
    }

    async fn open_session(&self, account_id: Uuid) -> OtpResult<String> {
        let session_id = AuthSessionId::new();
        let expires_at = Utc::now() + chrono::Duration::seconds(self.session_ttl.as_secs() as i64);

        sqlx::query(
            r#"
            INSERT INTO auth_sessions (session_id, account_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(account_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(session_id = %session_id, "Session opened");
        Ok(self.mint_token(&session_id))
    }
}
