//! Keyed rate limiting with governor.
//!
//! Two tiers, matched to mutation risk:
//! - [`RateTier::Strict`]: mutations and login attempts (~10/min)
//! - [`RateTier::Moderate`]: reads (~60/min)
//!
//! Exact thresholds come from [`RateLimitConfig`], not from code. Limiters
//! are constructed once at startup and handed to handlers through
//! `AppState` - there is no module-level state. Exceeding a quota is normal
//! control flow: handlers get `AppError::RateLimited` and return it exactly
//! like an auth rejection.

use std::net::IpAddr;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use willowline_core::UserId;

use crate::config::RateLimitConfig;
use crate::error::AppError;

/// Rate limit tier, chosen per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTier {
    /// Mutations: order updates/deletes, wishlist add/remove, login.
    Strict,
    /// Reads: order detail, my-orders, wishlist list/check.
    Moderate,
}

/// Key under which a caller's requests are counted.
///
/// Combines the authenticated user id (when present) with the client IP, so
/// anonymous and authenticated traffic from the same address are tracked
/// under distinguishable keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateKey {
    user: Option<UserId>,
    ip: IpAddr,
}

impl RateKey {
    /// Build a key for an authenticated caller.
    #[must_use]
    pub const fn user(user_id: UserId, ip: IpAddr) -> Self {
        Self {
            user: Some(user_id),
            ip,
        }
    }

    /// Build a key for an anonymous caller.
    #[must_use]
    pub const fn anonymous(ip: IpAddr) -> Self {
        Self { user: None, ip }
    }
}

impl std::fmt::Display for RateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.user {
            Some(id) => write!(f, "user:{id}@{}", self.ip),
            None => write!(f, "anon@{}", self.ip),
        }
    }
}

/// Per-tier keyed rate limiters (GCRA, process-local).
///
/// Safe under concurrent access from simultaneous requests; governor's
/// keyed state store is internally sharded.
pub struct RateLimits {
    strict: DefaultKeyedRateLimiter<RateKey>,
    moderate: DefaultKeyedRateLimiter<RateKey>,
}

impl RateLimits {
    /// Build both tiers from configured per-minute quotas.
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            strict: RateLimiter::keyed(Quota::per_minute(config.strict_per_minute)),
            moderate: RateLimiter::keyed(Quota::per_minute(config.moderate_per_minute)),
        }
    }

    /// Check whether a caller may proceed under the given tier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RateLimited` when the key has exhausted the
    /// tier's quota for the current window.
    pub fn check(&self, tier: RateTier, key: &RateKey) -> Result<(), AppError> {
        let limiter = match tier {
            RateTier::Strict => &self.strict,
            RateTier::Moderate => &self.moderate,
        };

        limiter.check_key(key).map_err(|_| {
            tracing::debug!(key = %key, ?tier, "rate limit exceeded");
            AppError::RateLimited
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::num::NonZeroU32;

    fn limits(strict: u32, moderate: u32) -> RateLimits {
        RateLimits::new(&RateLimitConfig {
            strict_per_minute: NonZeroU32::new(strict).unwrap(),
            moderate_per_minute: NonZeroU32::new(moderate).unwrap(),
        })
    }

    fn ip(last_octet: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last_octet))
    }

    #[test]
    fn test_strict_tier_exhausts_after_quota() {
        let limits = limits(3, 60);
        let key = RateKey::user(UserId::new(1), ip(1));

        for _ in 0..3 {
            assert!(limits.check(RateTier::Strict, &key).is_ok());
        }
        assert!(matches!(
            limits.check(RateTier::Strict, &key),
            Err(AppError::RateLimited)
        ));
    }

    #[test]
    fn test_keys_are_independent() {
        let limits = limits(1, 60);
        let first = RateKey::user(UserId::new(1), ip(1));
        let second = RateKey::user(UserId::new(2), ip(1));

        assert!(limits.check(RateTier::Strict, &first).is_ok());
        // Exhausting the first key must not affect the second.
        assert!(limits.check(RateTier::Strict, &first).is_err());
        assert!(limits.check(RateTier::Strict, &second).is_ok());
    }

    #[test]
    fn test_anonymous_and_user_tracked_separately() {
        let limits = limits(1, 60);
        let anon = RateKey::anonymous(ip(1));
        let user = RateKey::user(UserId::new(1), ip(1));

        assert_ne!(anon, user);
        assert!(limits.check(RateTier::Strict, &anon).is_ok());
        assert!(limits.check(RateTier::Strict, &user).is_ok());
    }

    #[test]
    fn test_tiers_do_not_share_state() {
        let limits = limits(1, 60);
        let key = RateKey::anonymous(ip(9));

        assert!(limits.check(RateTier::Strict, &key).is_ok());
        assert!(limits.check(RateTier::Strict, &key).is_err());
        // The moderate tier still has headroom for the same key.
        assert!(limits.check(RateTier::Moderate, &key).is_ok());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(
            RateKey::user(UserId::new(7), ip(2)).to_string(),
            "user:7@10.0.0.2"
        );
        assert_eq!(RateKey::anonymous(ip(2)).to_string(), "anon@10.0.0.2");
    }
}
