pub mod use_cases;

pub use use_cases::{
    cascade::{CascadePlan, CascadeReport, CleanupOutcome, CleanupStep},
    delete_user::{DeleteUserError, DeleteUserUseCase, DeletionRequest},
    request_body::target_user_id,
};
