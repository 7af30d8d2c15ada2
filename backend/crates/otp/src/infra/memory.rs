//! In-Memory Repository Implementation
//!
//! Single-node store used by tests and local development. Entries are
//! spread over a fixed set of shards, each behind its own mutex, so
//! operations on distinct (subject, kind) pairs do not contend with
//! each other. Every trait operation takes exactly one shard lock and
//! never awaits while holding it, which gives the same per-key
//! atomicity the SQL statements provide.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entities::{OtpChallenge, PendingRegistration};
use crate::domain::repository::{
    AttemptOutcome, ChallengeRepository, PendingRegistrationRepository,
};
use crate::domain::value_objects::ChallengeKey;
use crate::error::{OtpError, OtpResult};

const SHARD_COUNT: usize = 16;

#[derive(Default)]
struct Shard {
    challenges: HashMap<ChallengeKey, OtpChallenge>,
    registrations: HashMap<String, PendingRegistration>,
}

/// In-memory store
#[derive(Clone)]
pub struct MemoryOtpRepository {
    shards: Arc<[Mutex<Shard>; SHARD_COUNT]>,
}

impl Default for MemoryOtpRepository {
    fn default() -> Self {
        Self {
            shards: Arc::new(std::array::from_fn(|_| Mutex::new(Shard::default()))),
        }
    }
}

impl MemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the shard a key hashes to. Challenges hash the full
    /// (subject, kind) key; registrations hash the email.
    fn shard<K: Hash + ?Sized>(&self, key: &K) -> OtpResult<MutexGuard<'_, Shard>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % SHARD_COUNT;
        self.shards[index]
            .lock()
            .map_err(|_| OtpError::Internal("Store lock poisoned".to_string()))
    }
}

impl ChallengeRepository for MemoryOtpRepository {
    async fn put(&self, challenge: &OtpChallenge) -> OtpResult<()> {
        let mut shard = self.shard(&challenge.key)?;
        shard
            .challenges
            .insert(challenge.key.clone(), challenge.clone());
        Ok(())
    }

    async fn replace_after_cooldown(&self, challenge: &OtpChallenge) -> OtpResult<()> {
        let mut shard = self.shard(&challenge.key)?;

        let Some(existing) = shard.challenges.get(&challenge.key) else {
            return Err(OtpError::ChallengeNotFound);
        };
        if !existing.resend_available() {
            return Err(OtpError::Throttled);
        }

        shard
            .challenges
            .insert(challenge.key.clone(), challenge.clone());
        Ok(())
    }

    async fn verify_attempt(
        &self,
        key: &ChallengeKey,
        submitted: &str,
        max_attempts: u32,
    ) -> OtpResult<AttemptOutcome> {
        let mut shard = self.shard(key)?;

        let matched = shard
            .challenges
            .get(key)
            .map(|c| c.code.matches(submitted));

        match matched {
            None => Ok(AttemptOutcome::Missing),
            Some(true) => Ok(shard
                .challenges
                .remove(key)
                .map(AttemptOutcome::Consumed)
                .unwrap_or(AttemptOutcome::Missing)),
            Some(false) => {
                let Some(challenge) = shard.challenges.get_mut(key) else {
                    return Ok(AttemptOutcome::Missing);
                };
                challenge.attempt_count += 1;
                let attempts = challenge.attempt_count;
                if attempts >= max_attempts {
                    shard.challenges.remove(key);
                }
                Ok(AttemptOutcome::Miss { attempts })
            }
        }
    }
}

impl PendingRegistrationRepository for MemoryOtpRepository {
    async fn put_pending(&self, registration: &PendingRegistration) -> OtpResult<()> {
        let mut shard = self.shard(registration.email.as_str())?;
        shard
            .registrations
            .insert(registration.email.clone(), registration.clone());
        Ok(())
    }

    async fn get_pending(&self, email: &str) -> OtpResult<Option<PendingRegistration>> {
        let shard = self.shard(email)?;
        Ok(shard.registrations.get(email).cloned())
    }

    async fn take_pending(&self, email: &str) -> OtpResult<Option<PendingRegistration>> {
        let mut shard = self.shard(email)?;
        Ok(shard.registrations.remove(email))
    }
}
