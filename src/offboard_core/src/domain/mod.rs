pub mod bearer_token;
pub mod platform_settings;
pub mod staff_record;
pub mod table_schema;
pub mod user;
