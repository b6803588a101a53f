//! Order repository for database operations.
//!
//! Staff mutations are single filtered statements; the update sets
//! `updated_at` server-side and never touches fields outside the allow-list
//! carried by [`OrderChanges`].

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use willowline_core::{Email, OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{Order, OrderChanges};

/// Database row for an order, before domain validation.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    email: String,
    status: String,
    tracking_number: Option<String>,
    carrier: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            email,
            status,
            tracking_number: self.tracking_number,
            carrier: self.carrier,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, email, status, tracking_number, carrier, notes,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// List all orders belonging to an email address, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list_by_email(&self, email: &Email) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, email, status, tracking_number, carrier, notes,
                   created_at, updated_at
            FROM orders
            WHERE email = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(email.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Apply an allow-listed change set to an order.
    ///
    /// A single `UPDATE` with `COALESCE` per field: absent fields keep their
    /// stored value, `updated_at` is always set server-side. Returns `None`
    /// if the order does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn update(
        &self,
        id: OrderId,
        changes: &OrderChanges,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = COALESCE($2, status),
                tracking_number = COALESCE($3, tracking_number),
                carrier = COALESCE($4, carrier),
                notes = COALESCE($5, notes),
                updated_at = now()
            WHERE id = $1
            RETURNING id, email, status, tracking_number, carrier, notes,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.status.map(|s| s.to_string()))
        .bind(changes.tracking_number.as_deref())
        .bind(changes.carrier.as_deref())
        .bind(changes.notes.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Delete an order by its ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
