//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::{OrderRepository, UserRepository, WishlistRepository};
use crate::middleware::RateLimits;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Everything with lifecycle - the pool, the
/// rate limiters - is constructed once at startup and injected here; no
/// handler reaches for ambient singletons.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    rate_limits: RateLimits,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let rate_limits = RateLimits::new(&config.rate_limits);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                rate_limits,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the rate limiters.
    #[must_use]
    pub fn rate_limits(&self) -> &RateLimits {
        &self.inner.rate_limits
    }

    /// Order repository over the shared pool.
    #[must_use]
    pub fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(&self.inner.pool)
    }

    /// Wishlist repository over the shared pool.
    #[must_use]
    pub fn wishlist(&self) -> WishlistRepository<'_> {
        WishlistRepository::new(&self.inner.pool)
    }

    /// User repository over the shared pool.
    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.inner.pool)
    }
}
