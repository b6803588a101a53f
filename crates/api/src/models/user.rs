//! User domain types.

use chrono::{DateTime, Utc};

use willowline_core::{Email, UserId, UserRole};

/// A shop account (domain type).
///
/// Customers and staff share the table; the role decides what the session
/// may reach.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (normalized lowercase).
    pub email: Email,
    /// Role resolved from the database at login.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
