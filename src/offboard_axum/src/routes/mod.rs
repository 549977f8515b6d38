//! Axum-specific route handlers.
//!
//! These routes use Axum's extractors to get data from requests, call the
//! framework-agnostic handlers and return their responses.

pub mod delete_user;
pub mod health;

pub use delete_user::delete_user;
pub use health::health;
