//! Request pipeline pieces for the API.
//!
//! Every handler composes the same pipeline: resolve identity (auth
//! extractors) -> clear the rate limiter for the operation's tier -> run one
//! repository call -> map the result through the error taxonomy.

pub mod auth;
pub mod client_ip;
pub mod rate_limit;
pub mod session;

pub use auth::{OptionalUser, RequireStaff, RequireUser, clear_current_user, set_current_user};
pub use client_ip::ClientIp;
pub use rate_limit::{RateKey, RateLimits, RateTier};
pub use session::create_session_layer;
