//! Axum integration for the offboard deletion service.
//!
//! Provides Axum adapters for the framework-agnostic handler in
//! `offboard_adapters`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  offboard_core: HTTP trait definitions   │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  offboard_axum: Axum implementations     │
//! │  - AxumRequest newtype wrapper           │
//! │  - AxumResponseBuilder                   │
//! │  - Axum route handlers                   │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use offboard_axum::routes;
//!
//! let app = Router::new()
//!     .route("/delete-user", any(routes::delete_user::<SupabaseConnector, EnvCredentialSource>))
//!     .route("/health", get(routes::health))
//!     .with_state(context);
//! ```

pub mod adapters;
pub mod routes;

// Re-export for convenience
pub use adapters::{AxumRequest, AxumResponseBuilder, response_builder};
