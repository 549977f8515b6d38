//! Framework-agnostic handlers.
//!
//! Framework-specific routes (Axum, ...) extract the request, call these
//! handlers and return whatever response the supplied builder produces.

pub mod delete_user;

pub use delete_user::{DeletionContext, error_response, handle_delete_user, unexpected_response};
