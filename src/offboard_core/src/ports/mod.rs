pub mod credentials;
pub mod platform;
