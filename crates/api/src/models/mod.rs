//! Domain types, separate from database row types.

pub mod order;
pub mod session;
pub mod user;
pub mod wishlist;

pub use order::{Order, OrderChanges};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
pub use wishlist::WishlistEntry;
