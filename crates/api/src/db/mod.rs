//! Database operations for the Willowline `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Shop accounts (customers and staff), argon2 password hashes
//! - `orders` - Customer orders, matched to users by email
//! - `wishlists` - Wishlist entries, unique per (user, product)
//! - `sessions` - Tower-sessions storage
//!
//! Queries use sqlx's runtime-checked API (`query`/`query_as` with `FromRow`
//! rows) so the workspace builds without a live database. Every handler-facing
//! operation is a single filtered statement; ownership predicates are part of
//! the SQL, not the handler.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p willowline-cli -- migrate
//! ```

pub mod orders;
pub mod users;
pub mod wishlist;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use orders::OrderRepository;
pub use users::UserRepository;
pub use wishlist::WishlistRepository;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be parsed into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
