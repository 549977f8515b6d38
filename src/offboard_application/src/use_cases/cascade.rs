//! Ordered deletion of everything that belongs to a target identity.
//!
//! The cascade has two parts with different failure semantics:
//! - three cleanup deletions that run in a fixed order and never abort;
//! - one revoke step (the identity deletion) whose failure is returned.

use offboard_core::{PlatformError, PrivilegedScope, RowFilter, TableSchema, UserId};

/// One best-effort row deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupStep {
    pub name: &'static str,
    pub table: String,
    pub filter: RowFilter,
}

/// What a single cleanup step did. Failures are kept, not propagated.
#[derive(Debug)]
pub struct CleanupOutcome {
    pub step: &'static str,
    pub table: String,
    pub result: Result<u64, PlatformError>,
}

#[derive(Debug, Default)]
pub struct CascadeReport {
    pub outcomes: Vec<CleanupOutcome>,
}

impl CascadeReport {
    pub fn rows_removed(&self) -> u64 {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .sum()
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &CleanupOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }
}

/// Deletion plan for one target.
#[derive(Debug, Clone)]
pub struct CascadePlan {
    target: UserId,
    cleanup: [CleanupStep; 3],
}

impl CascadePlan {
    pub fn new(schema: &TableSchema, target: UserId) -> Self {
        // Dependents first, the directory row last.
        let cleanup = [
            CleanupStep {
                name: "profile",
                table: schema.profile_table.clone(),
                filter: schema.profile_filter(&target),
            },
            CleanupStep {
                name: "device_authorizations",
                table: schema.device_table.clone(),
                filter: schema.device_filter(&target),
            },
            CleanupStep {
                name: "staff",
                table: schema.staff_table.clone(),
                filter: schema.staff_filter(&target),
            },
        ];

        Self { target, cleanup }
    }

    pub fn target(&self) -> &UserId {
        &self.target
    }

    pub fn cleanup_steps(&self) -> &[CleanupStep] {
        &self.cleanup
    }

    /// Run the cleanup deletions sequentially. Never fails.
    #[tracing::instrument(name = "CascadePlan::run_cleanup", skip_all, fields(target = %self.target))]
    pub async fn run_cleanup<S>(&self, scope: &S) -> CascadeReport
    where
        S: PrivilegedScope,
    {
        let mut report = CascadeReport::default();

        for step in &self.cleanup {
            let result = scope.delete_rows(&step.table, &step.filter).await;

            match &result {
                Ok(rows) => tracing::debug!(step = step.name, rows, "Cleanup step done"),
                Err(e) => tracing::warn!(step = step.name, error = %e, "Cleanup step failed"),
            }

            report.outcomes.push(CleanupOutcome {
                step: step.name,
                table: step.table.clone(),
                result,
            });
        }

        tracing::info!(
            rows_removed = report.rows_removed(),
            failed = report.failed_steps().count(),
            "Cleanup finished"
        );

        report
    }

    /// Delete the authentication identity. This is the step that actually
    /// revokes access, so its error is returned to the caller.
    #[tracing::instrument(name = "CascadePlan::revoke", skip_all, fields(target = %self.target))]
    pub async fn revoke<S>(&self, scope: &S) -> Result<(), PlatformError>
    where
        S: PrivilegedScope,
    {
        scope.delete_identity(&self.target).await
    }
}
