//! # Offboard - privileged account deletion service
//!
//! Facade crate re-exporting the public APIs of the offboard components.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! offboard = { path = "../offboard" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `UserId`, `BearerToken`, `StaffRecord`, `PrivilegePolicy`, ...
//! - **Ports**: `PlatformConnector`, `CallerScope`, `PrivilegedScope`, `CredentialSource`
//! - **Use cases**: `DeleteUserUseCase` and its cascade plan
//! - **Adapters**: `SupabaseConnector`, `InMemoryPlatform`, `EnvCredentialSource`, settings
//! - **Service**: `OffboardService` - the HTTP entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use offboard_core::*;
}

pub use offboard_core::{
    AuthUser, BearerToken, PlatformSettings, PrivilegePolicy, RowFilter, StaffRecord,
    TableSchema, UserId,
};

// ============================================================================
// Ports
// ============================================================================

pub use offboard_core::{
    CallerScope, CredentialSource, PlatformConnector, PlatformError, PrivilegedScope,
    SettingsError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use offboard_application::*;
}

pub use offboard_application::{CascadePlan, CascadeReport, DeleteUserError, DeleteUserUseCase};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Framework-agnostic handlers
    pub mod handlers {
        pub use offboard_adapters::handlers::*;
    }

    /// Platform connectors
    pub mod platform {
        pub use offboard_adapters::platform::*;
    }

    /// Credential sources
    pub mod credentials {
        pub use offboard_adapters::credentials::*;
    }

    /// Configuration
    pub mod config {
        pub use offboard_adapters::config::*;
    }
}

pub use offboard_adapters::{
    config::{AllowedOrigins, Backend, ServiceSettings},
    credentials::{EnvCredentialSource, StaticCredentialSource},
    handlers::DeletionContext,
    platform::{InMemoryPlatform, MemorySeed, SupabaseConnector},
};

// ============================================================================
// Service (Main Entry Point)
// ============================================================================

pub use offboard_service::OffboardService;

/// Axum adapters, for mounting the routes on a custom router
pub mod axum_adapters {
    pub use offboard_axum::*;
}

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use axum;
pub use http;
pub use tokio;
