//! Shared newtype wrappers and enums.

pub mod email;
pub mod id;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId, UserId, WishlistEntryId};
pub use status::{OrderStatus, UserRole};
