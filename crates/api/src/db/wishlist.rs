//! Wishlist repository for database operations.
//!
//! Every mutation binds the owner's user id in the WHERE clause, so a
//! cross-user delete affects zero rows regardless of what the handler does.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use willowline_core::{ProductId, UserId, WishlistEntryId};

use super::RepositoryError;
use crate::models::WishlistEntry;

/// Database row for a wishlist entry.
#[derive(sqlx::FromRow)]
struct WishlistRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    created_at: DateTime<Utc>,
}

impl From<WishlistRow> for WishlistEntry {
    fn from(row: WishlistRow) -> Self {
        Self {
            id: WishlistEntryId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            created_at: row.created_at,
        }
    }
}

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to a user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already on the
    /// user's wishlist. Returns `RepositoryError::Database` for other
    /// database errors.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<WishlistEntry, RepositoryError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            r"
            INSERT INTO wishlists (user_id, product_id)
            VALUES ($1, $2)
            RETURNING id, user_id, product_id, created_at
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
            {
                return RepositoryError::Conflict("product already on wishlist".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// List a user's wishlist entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<WishlistEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistRow>(
            r"
            SELECT id, user_id, product_id, created_at
            FROM wishlists
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Find a user's wishlist entry for a product, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<WishlistEntry>, RepositoryError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            r"
            SELECT id, user_id, product_id, created_at
            FROM wishlists
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a wishlist entry, scoped to its owner.
    ///
    /// The owner predicate is part of the statement: an existing entry owned
    /// by someone else affects zero rows and reads as "not found".
    ///
    /// # Returns
    ///
    /// Returns `true` if the entry was deleted, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        id: WishlistEntryId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM wishlists
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
