pub mod cascade;
pub mod delete_user;
pub mod request_body;
