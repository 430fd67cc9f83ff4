//! Database-backed login throttling for admin and gallery logins.
//!
//! Flow Overview:
//! 1) Track failed attempts per identity in the `login_attempts` table.
//! 2) Five failures inside a 15-minute window trigger a 15-minute lockout.
//! 3) A successful login clears the identity's record entirely.
//!
//! Scaling: state lives in the database so limits hold across instances.
//! The counter is updated read-modify-write without a lock; two concurrent
//! failures can lose an increment. That keeps the counter approximate, which
//! is acceptable for slowing brute force and not worth row locking.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;

pub(super) const FAILURE_THRESHOLD: i32 = 5;
pub(super) const ATTEMPT_WINDOW_SECONDS: i64 = 15 * 60;
pub(super) const LOCKOUT_SECONDS: i64 = 15 * 60;

/// Whether an identity may attempt a login right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Allowed,
    Locked { retry_after_seconds: i64 },
}

/// One row of `login_attempts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct AttemptRecord {
    pub(super) failure_count: i32,
    pub(super) first_failure_at: DateTime<Utc>,
    pub(super) locked_until: Option<DateTime<Utc>>,
}

/// Decide whether a login attempt is allowed for the given record state.
pub(super) fn evaluate(record: Option<&AttemptRecord>, now: DateTime<Utc>) -> ThrottleDecision {
    let Some(record) = record else {
        return ThrottleDecision::Allowed;
    };
    match record.locked_until {
        Some(locked_until) if locked_until > now => ThrottleDecision::Locked {
            retry_after_seconds: (locked_until - now).num_seconds().max(1),
        },
        _ => ThrottleDecision::Allowed,
    }
}

/// Fold one more failure into the record, creating or rolling the window.
pub(super) fn advance(record: Option<AttemptRecord>, now: DateTime<Utc>) -> AttemptRecord {
    let window = Duration::seconds(ATTEMPT_WINDOW_SECONDS);
    let mut next = match record {
        Some(record) if now - record.first_failure_at < window => AttemptRecord {
            failure_count: record.failure_count + 1,
            ..record
        },
        // No record, or the window elapsed: old failures no longer count.
        _ => AttemptRecord {
            failure_count: 1,
            first_failure_at: now,
            locked_until: None,
        },
    };
    if next.failure_count >= FAILURE_THRESHOLD {
        next.locked_until = Some(now + Duration::seconds(LOCKOUT_SECONDS));
        // Cap the counter so the next window starts from a clean budget.
        next.failure_count = 0;
        next.first_failure_at = now;
    }
    next
}

/// Per-identity failed-login throttle backed by `login_attempts`.
#[derive(Debug, Clone)]
pub struct LoginThrottle {
    pool: PgPool,
}

impl LoginThrottle {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether `identity` may attempt a login.
    ///
    /// # Errors
    /// Returns a store error if the lookup fails; callers treat that as an
    /// internal failure, never as "allowed".
    pub async fn check(&self, identity: &str) -> Result<ThrottleDecision> {
        let record = self.fetch(identity).await?;
        Ok(evaluate(record.as_ref(), Utc::now()))
    }

    /// Record one failed attempt, possibly engaging the lockout.
    ///
    /// # Errors
    /// Returns a store error if the read or write fails.
    pub async fn record_failure(&self, identity: &str) -> Result<()> {
        let now = Utc::now();
        let next = advance(self.fetch(identity).await?, now);

        let query = r"
            INSERT INTO login_attempts (identity, failure_count, first_failure_at, locked_until)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (identity) DO UPDATE
            SET failure_count = EXCLUDED.failure_count,
                first_failure_at = EXCLUDED.first_failure_at,
                locked_until = EXCLUDED.locked_until
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(identity)
            .bind(next.failure_count)
            .bind(next.first_failure_at)
            .bind(next.locked_until)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to record login failure")?;
        Ok(())
    }

    /// Clear the identity's record after a successful login.
    ///
    /// # Errors
    /// Returns a store error if the delete fails.
    pub async fn clear(&self, identity: &str) -> Result<()> {
        let query = "DELETE FROM login_attempts WHERE identity = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(identity)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to clear login attempts")?;
        Ok(())
    }

    async fn fetch(&self, identity: &str) -> Result<Option<AttemptRecord>> {
        let query = r"
            SELECT failure_count, first_failure_at, locked_until
            FROM login_attempts
            WHERE identity = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(identity)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to fetch login attempts")?;

        Ok(row.map(|row| AttemptRecord {
            failure_count: row.get("failure_count"),
            first_failure_at: row.get("first_failure_at"),
            locked_until: row.get("locked_until"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn fresh_identity_is_allowed() {
        assert_eq!(evaluate(None, at(0)), ThrottleDecision::Allowed);
    }

    #[test]
    fn single_failure_does_not_lock() {
        let record = advance(None, at(0));
        assert_eq!(record.failure_count, 1);
        assert_eq!(record.locked_until, None);
        assert_eq!(evaluate(Some(&record), at(1)), ThrottleDecision::Allowed);
    }

    #[test]
    fn each_failure_increments_by_one() {
        let mut record = None;
        for expected in 1..FAILURE_THRESHOLD {
            record = Some(advance(record, at(i64::from(expected))));
            assert_eq!(record.as_ref().unwrap().failure_count, expected);
        }
    }

    #[test]
    fn fifth_failure_in_window_locks_for_the_full_duration() {
        let mut record = None;
        for i in 0..FAILURE_THRESHOLD {
            record = Some(advance(record, at(i64::from(i))));
        }
        let record = record.unwrap();
        let lock_set_at = at(i64::from(FAILURE_THRESHOLD) - 1);
        assert_eq!(record.locked_until, Some(lock_set_at + Duration::seconds(LOCKOUT_SECONDS)));

        // Correct credentials submitted during the lockout still bounce.
        match evaluate(Some(&record), lock_set_at + Duration::seconds(60)) {
            ThrottleDecision::Locked {
                retry_after_seconds,
            } => assert_eq!(retry_after_seconds, LOCKOUT_SECONDS - 60),
            ThrottleDecision::Allowed => panic!("expected lockout"),
        }
    }

    #[test]
    fn lockout_expires_after_the_duration() {
        let mut record = None;
        for i in 0..FAILURE_THRESHOLD {
            record = Some(advance(record, at(i64::from(i))));
        }
        let record = record.unwrap();
        let after = at(i64::from(FAILURE_THRESHOLD) - 1 + LOCKOUT_SECONDS + 1);
        assert_eq!(evaluate(Some(&record), after), ThrottleDecision::Allowed);
    }

    #[test]
    fn window_rollover_resets_the_counter() {
        let mut record = Some(advance(None, at(0)));
        record = Some(advance(record, at(1)));
        // Next failure lands past the window; earlier failures no longer count.
        let rolled = advance(record, at(ATTEMPT_WINDOW_SECONDS + 2));
        assert_eq!(rolled.failure_count, 1);
        assert_eq!(rolled.first_failure_at, at(ATTEMPT_WINDOW_SECONDS + 2));
        assert_eq!(rolled.locked_until, None);
    }

    #[test]
    fn retry_after_is_at_least_one_second() {
        let record = AttemptRecord {
            failure_count: 0,
            first_failure_at: at(0),
            locked_until: Some(at(0) + Duration::milliseconds(400)),
        };
        match evaluate(Some(&record), at(0)) {
            ThrottleDecision::Locked {
                retry_after_seconds,
            } => assert_eq!(retry_after_seconds, 1),
            ThrottleDecision::Allowed => panic!("expected lockout"),
        }
    }
}
