//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::{OtpChallenge, PendingRegistration};
use crate::domain::repository::{
    AttemptOutcome, ChallengeRepository, PendingRegistrationRepository,
};
use crate::domain::value_objects::{ChallengeKey, ChallengeKind, OtpCode};
use crate::error::{OtpError, OtpResult};

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up stale challenges and abandoned registrations.
    pub async fn cleanup_expired(
        &self,
        code_validity: chrono::Duration,
        pending_ttl: chrono::Duration,
    ) -> OtpResult<(u64, u64)> {
        let challenge_cutoff = Utc::now() - code_validity;
        let pending_cutoff = Utc::now() - pending_ttl;

        let challenges_deleted = sqlx::query("DELETE FROM otp_challenges WHERE issued_at < $1")
            .bind(challenge_cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let registrations_deleted =
            sqlx::query("DELETE FROM pending_registrations WHERE created_at < $1")
                .bind(pending_cutoff)
                .execute(&self.pool)
                .await?
                .rows_affected();

        tracing::info!(
            challenges = challenges_deleted,
            registrations = registrations_deleted,
            "Cleaned up expired OTP data"
        );

        Ok((challenges_deleted, registrations_deleted))
    }
}

impl ChallengeRepository for PgOtpRepository {
    async fn put(&self, challenge: &OtpChallenge) -> OtpResult<()> {
        sqlx::query(
            r#"
            INSERT INTO otp_challenges (
                subject,
                challenge_kind,
                otp_code,
                issued_at,
                resend_available_at,
                attempt_count
            ) VALUES ($1, $2, $3, $4, $5, 0)
            ON CONFLICT (subject, challenge_kind)
            DO UPDATE SET
                otp_code = EXCLUDED.otp_code,
                issued_at = EXCLUDED.issued_at,
                resend_available_at = EXCLUDED.resend_available_at,
                attempt_count = 0
            "#,
        )
        .bind(&challenge.key.subject)
        .bind(challenge.key.kind.as_str())
        .bind(challenge.code.as_str())
        .bind(challenge.issued_at)
        .bind(challenge.resend_available_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(kind = %challenge.key.kind, "Challenge stored");
        Ok(())
    }

    async fn replace_after_cooldown(&self, challenge: &OtpChallenge) -> OtpResult<()> {
        let replaced = sqlx::query(
            r#"
            UPDATE otp_challenges SET
                otp_code = $3,
                issued_at = $4,
                resend_available_at = $5,
                attempt_count = 0
            WHERE subject = $1 AND challenge_kind = $2 AND resend_available_at <= NOW()
            "#,
        )
        .bind(&challenge.key.subject)
        .bind(challenge.key.kind.as_str())
        .bind(challenge.code.as_str())
        .bind(challenge.issued_at)
        .bind(challenge.resend_available_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if replaced > 0 {
            return Ok(());
        }

        // Distinguish "inside the cooldown" from "never issued"
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM otp_challenges
                WHERE subject = $1 AND challenge_kind = $2
            )
            "#,
        )
        .bind(&challenge.key.subject)
        .bind(challenge.key.kind.as_str())
        .fetch_one(&self.pool)
        .await?;

        if exists {
            Err(OtpError::Throttled)
        } else {
            Err(OtpError::ChallengeNotFound)
        }
    }

    async fn verify_attempt(
        &self,
        key: &ChallengeKey,
        submitted: &str,
        max_attempts: u32,
    ) -> OtpResult<AttemptOutcome> {
        // The row lock serializes this attempt against concurrent
        // issue/resend for the same key, so a miss is always charged
        // to the challenge the comparison saw.
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ChallengeRow>(
            r#"
            SELECT
                subject,
                challenge_kind,
                otp_code,
                issued_at,
                resend_available_at,
                attempt_count
            FROM otp_challenges
            WHERE subject = $1 AND challenge_kind = $2
            FOR UPDATE
            "#,
        )
        .bind(&key.subject)
        .bind(key.kind.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.commit().await?;
            return Ok(AttemptOutcome::Missing);
        };
        let challenge = row.into_challenge()?;

        if challenge.code.matches(submitted) {
            sqlx::query("DELETE FROM otp_challenges WHERE subject = $1 AND challenge_kind = $2")
                .bind(&key.subject)
                .bind(key.kind.as_str())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            tracing::info!(kind = %key.kind, "Challenge consumed");
            return Ok(AttemptOutcome::Consumed(challenge));
        }

        let attempts = challenge.attempt_count + 1;
        if attempts >= max_attempts {
            sqlx::query("DELETE FROM otp_challenges WHERE subject = $1 AND challenge_kind = $2")
                .bind(&key.subject)
                .bind(key.kind.as_str())
                .execute(&mut *tx)
                .await?;

            tracing::warn!(kind = %key.kind, attempts, "Challenge invalidated");
        } else {
            sqlx::query(
                r#"
                UPDATE otp_challenges SET attempt_count = $3
                WHERE subject = $1 AND challenge_kind = $2
                "#,
            )
            .bind(&key.subject)
            .bind(key.kind.as_str())
            .bind(attempts as i32)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(AttemptOutcome::Miss { attempts })
    }
}

impl PendingRegistrationRepository for PgOtpRepository {
    async fn put_pending(&self, registration: &PendingRegistration) -> OtpResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pending_registrations (email, display_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email)
            DO UPDATE SET
                display_name = EXCLUDED.display_name,
                password_hash = EXCLUDED.password_hash,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(&registration.email)
        .bind(&registration.name)
        .bind(&registration.password_hash)
        .bind(registration.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_pending(&self, email: &str) -> OtpResult<Option<PendingRegistration>> {
        let row = sqlx::query_as::<_, PendingRegistrationRow>(
            r#"
            SELECT email, display_name, password_hash, created_at
            FROM pending_registrations
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PendingRegistrationRow::into_registration))
    }

    async fn take_pending(&self, email: &str) -> OtpResult<Option<PendingRegistration>> {
        let row = sqlx::query_as::<_, PendingRegistrationRow>(
            r#"
            DELETE FROM pending_registrations
            WHERE email = $1
            RETURNING email, display_name, password_hash, created_at
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PendingRegistrationRow::into_registration))
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct ChallengeRow {
    subject: String,
    challenge_kind: String,
    otp_code: String,
    issued_at: DateTime<Utc>,
    resend_available_at: DateTime<Utc>,
    attempt_count: i32,
}

impl ChallengeRow {
    fn into_challenge(self) -> OtpResult<OtpChallenge> {
        let kind = ChallengeKind::parse(&self.challenge_kind).ok_or_else(|| {
            OtpError::Internal(format!("Unknown challenge kind: {}", self.challenge_kind))
        })?;

        Ok(OtpChallenge {
            key: ChallengeKey::new(&self.subject, kind),
            code: OtpCode::new(self.otp_code),
            issued_at: self.issued_at,
            resend_available_at: self.resend_available_at,
            attempt_count: self.attempt_count as u32,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PendingRegistrationRow {
    email: String,
    display_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl PendingRegistrationRow {
    fn into_registration(self) -> PendingRegistration {
        PendingRegistration {
            email: self.email,
            name: self.display_name,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}
