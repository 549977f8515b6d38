mod offboard_service;
pub mod tracing;

pub use offboard_service::OffboardService;
