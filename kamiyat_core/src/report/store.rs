//! Repository traits the report manager persists through.
//!
//! Implementations use interior mutability so the manager can hold shared
//! references to both stores.

use uuid::Uuid;

use crate::calculations::CalculationType;
use crate::errors::EngineResult;
use crate::project::ProjectInfo;
use crate::report::model::{NewReport, QuantityReport};

/// Quantity report persistence.
pub trait ReportStore {
    /// All reports of a project
    fn list_reports(&self, project_id: &str) -> EngineResult<Vec<QuantityReport>>;

    /// Persist a new report.
    ///
    /// Fails with `EngineError::Conflict` when the project already has a
    /// report of the same calculation type.
    fn create_report(&self, report: NewReport) -> EngineResult<QuantityReport>;

    /// Remove a report. Deleting an unknown id is a persistence error.
    fn delete_report(&self, report_id: Uuid) -> EngineResult<()>;

    /// Find a report by id
    fn get_report(&self, report_id: Uuid) -> EngineResult<Option<QuantityReport>>;

    /// Set status `sent` and `sent_to_owner`
    fn mark_sent(&self, report_id: Uuid) -> EngineResult<QuantityReport>;

    /// The report of this calculation type in the project, if any
    fn find_existing(
        &self,
        project_id: &str,
        calculation_type: CalculationType,
    ) -> EngineResult<Option<QuantityReport>> {
        Ok(self
            .list_reports(project_id)?
            .into_iter()
            .find(|r| r.matches(project_id, calculation_type)))
    }
}

/// Project metadata lookup.
pub trait ProjectStore {
    /// Fails with `EngineError::Lookup` for an unknown project
    fn get_project(&self, project_id: &str) -> EngineResult<ProjectInfo>;
}
