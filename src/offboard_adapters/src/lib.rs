pub mod config;
pub mod credentials;
pub mod handlers;
pub mod platform;
