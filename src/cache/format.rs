//! Cached validation record.
//!
//! A record remembers one definitive answer from the license server. It is
//! reusable while `0 <= now - checked_at <= ttl` and only for the key hash it
//! was written for.

use crate::clock::Clock;
use crate::protocol::models::LicenseValidationResult;
use crate::BlockGateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One cached validation answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// SHA-256 hex of the license key the answer belongs to.
    pub key_hash: String,

    /// Whether the server accepted the key.
    pub valid: bool,

    /// Email reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// When the server was asked.
    pub checked_at: DateTime<Utc>,
}

impl CacheRecord {
    /// Record `result` for `key_hash` at the clock's current time.
    pub fn new(key_hash: String, result: &LicenseValidationResult, clock: &dyn Clock) -> Self {
        Self {
            key_hash,
            valid: result.valid,
            email: result.email.clone(),
            checked_at: clock.now_utc(),
        }
    }

    /// Serialize the record to JSON.
    pub fn to_json(&self) -> Result<String, BlockGateError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BlockGateError::CacheIO(format!("Failed to serialize cache: {}", e)))
    }

    /// Deserialize a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, BlockGateError> {
        serde_json::from_str(json)
            .map_err(|e| BlockGateError::CacheIO(format!("Failed to deserialize cache: {}", e)))
    }

    /// Check the record may still stand in for a remote call.
    ///
    /// # Errors
    /// - `CacheTampered` if the record is for another key or dated in the future
    /// - `CacheExpired` if it is older than `ttl`
    pub fn check(&self, key_hash: &str, ttl: Duration, clock: &dyn Clock) -> Result<(), BlockGateError> {
        if self.key_hash != key_hash {
            return Err(BlockGateError::CacheTampered);
        }

        let age = clock.now_utc().signed_duration_since(self.checked_at);
        if age.num_seconds() < 0 {
            return Err(BlockGateError::CacheTampered);
        }

        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        if age.num_seconds() > ttl_secs {
            return Err(BlockGateError::CacheExpired);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    const TTL: Duration = Duration::from_secs(600);

    fn record(clock: &MockClock) -> CacheRecord {
        let result = LicenseValidationResult {
            valid: true,
            email: Some("x@y.com".to_string()),
            license_key: None,
        };
        CacheRecord::new("abc".to_string(), &result, clock)
    }

    #[test]
    fn fresh_record_passes() {
        let clock = MockClock::from_rfc3339("2025-05-01T10:00:00Z");
        let rec = record(&clock);
        clock.advance(chrono::Duration::seconds(599));
        assert!(rec.check("abc", TTL, &clock).is_ok());
    }

    #[test]
    fn exactly_ttl_old_still_passes() {
        let clock = MockClock::from_rfc3339("2025-05-01T10:00:00Z");
        let rec = record(&clock);
        clock.advance(chrono::Duration::seconds(600));
        assert!(rec.check("abc", TTL, &clock).is_ok());
    }

    #[test]
    fn stale_record_expires() {
        let clock = MockClock::from_rfc3339("2025-05-01T10:00:00Z");
        let rec = record(&clock);
        clock.advance(chrono::Duration::seconds(601));
        assert!(matches!(
            rec.check("abc", TTL, &clock),
            Err(BlockGateError::CacheExpired)
        ));
    }

    #[test]
    fn zero_ttl_expires_after_a_second() {
        let clock = MockClock::from_rfc3339("2025-05-01T10:00:00Z");
        let rec = record(&clock);
        clock.advance(chrono::Duration::seconds(1));
        assert!(matches!(
            rec.check("abc", Duration::ZERO, &clock),
            Err(BlockGateError::CacheExpired)
        ));
    }

    #[test]
    fn future_record_is_rejected() {
        let clock = MockClock::from_rfc3339("2025-05-01T10:00:00Z");
        let rec = record(&clock);
        clock.advance(chrono::Duration::minutes(-5));
        assert!(matches!(
            rec.check("abc", TTL, &clock),
            Err(BlockGateError::CacheTampered)
        ));
    }

    #[test]
    fn other_key_is_rejected() {
        let clock = MockClock::from_rfc3339("2025-05-01T10:00:00Z");
        let rec = record(&clock);
        assert!(matches!(
            rec.check("def", TTL, &clock),
            Err(BlockGateError::CacheTampered)
        ));
    }

    #[test]
    fn json_roundtrip_keeps_fields() {
        let clock = MockClock::from_rfc3339("2025-05-01T10:00:00Z");
        let rec = record(&clock);
        let back = CacheRecord::from_json(&rec.to_json().unwrap()).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn garbage_json_is_cache_io() {
        assert!(matches!(
            CacheRecord::from_json("{"),
            Err(BlockGateError::CacheIO(_))
        ));
    }
}
