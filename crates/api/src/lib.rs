//! Willowline API library.
//!
//! Backend for the Willowline cricket equipment shop: session-based
//! authentication, staff order management and customer wishlists behind a
//! uniform guard / rate-limit / repository pipeline.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
