//! # Report Manager
//!
//! Saves calculations as quantity reports while keeping at most one report per
//! (project, calculation type).
//!
//! ```text
//! save ──► existing report? ── no ──► create ──► Saved
//!                │
//!               yes ──► Conflict { existing_report_id }
//!                          │
//!        confirm_overwrite ─┴─► same project and type? ──► delete old ──► create ──► Saved
//! ```
//!
//! The existence check and the create are separate store calls. Two managers
//! racing on the same pair can both pass the check; the store's own unique
//! constraint then rejects the second create, which `save` reports as a
//! conflict.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationRecord, CalculationType};
use crate::errors::{EngineError, EngineResult};
use crate::project::EngineerInfo;
use crate::report::model::{NewReport, QuantityReport};
use crate::report::store::{ProjectStore, ReportStore};

/// What a save attempt did.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// No previous report; a new one was created
    Saved(QuantityReport),
    /// A report already exists; nothing was written
    Conflict { existing_report_id: Uuid },
}

/// Result of replacing an existing report.
#[derive(Debug, Clone, PartialEq)]
pub struct OverwriteOutcome {
    pub report: QuantityReport,
    /// Non-fatal problems, e.g. the old report could not be deleted
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Saved,
    Conflict,
    Error,
}

/// Serializable answer to a save request.
///
/// ## JSON Example
///
/// ```json
/// { "status": "conflict", "existing_report_id": "550e8400-e29b-41d4-a716-446655440000" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: SaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_report_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&EngineResult<SaveOutcome>> for SaveResponse {
    fn from(result: &EngineResult<SaveOutcome>) -> Self {
        match result {
            Ok(SaveOutcome::Saved(report)) => SaveResponse {
                status: SaveStatus::Saved,
                existing_report_id: None,
                report_id: Some(report.id),
                message: None,
            },
            Ok(SaveOutcome::Conflict { existing_report_id }) => SaveResponse {
                status: SaveStatus::Conflict,
                existing_report_id: Some(*existing_report_id),
                report_id: None,
                message: None,
            },
            Err(e) => SaveResponse {
                status: SaveStatus::Error,
                existing_report_id: None,
                report_id: None,
                message: Some(e.to_string()),
            },
        }
    }
}

/// Report lifecycle over a report store and a project store.
pub struct ReportManager<'a, R: ReportStore + ?Sized, P: ProjectStore + ?Sized> {
    reports: &'a R,
    projects: &'a P,
}

impl<'a, R: ReportStore + ?Sized, P: ProjectStore + ?Sized> ReportManager<'a, R, P> {
    pub fn new(reports: &'a R, projects: &'a P) -> Self {
        ReportManager { reports, projects }
    }

    pub fn reports(&self) -> &'a R {
        self.reports
    }

    /// Save a calculation unless the project already has a report of its type.
    pub fn save(
        &self,
        project_id: &str,
        calculation_type: CalculationType,
        record: &CalculationRecord,
        engineer: &EngineerInfo,
    ) -> EngineResult<SaveOutcome> {
        check_type(calculation_type, record)?;

        if let Some(existing) = self.reports.find_existing(project_id, calculation_type)? {
            tracing::info!(
                project_id,
                calculation_type = %calculation_type,
                existing_report_id = %existing.id,
                "report already exists"
            );
            return Ok(SaveOutcome::Conflict {
                existing_report_id: existing.id,
            });
        }

        match self.create(project_id, record, engineer) {
            Ok(report) => Ok(SaveOutcome::Saved(report)),
            Err(EngineError::Conflict {
                existing_report_id, ..
            }) => {
                tracing::info!(
                    project_id,
                    calculation_type = %calculation_type,
                    %existing_report_id,
                    "report created concurrently"
                );
                Ok(SaveOutcome::Conflict { existing_report_id })
            }
            Err(e) => Err(e),
        }
    }

    /// Replace `existing_report_id` with a new report for this calculation.
    ///
    /// The existing report must belong to the same project and calculation
    /// type. A failed delete is surfaced when the old report is still there;
    /// when it is already gone the create goes ahead and the failure becomes a
    /// warning.
    pub fn confirm_overwrite(
        &self,
        existing_report_id: Uuid,
        project_id: &str,
        calculation_type: CalculationType,
        record: &CalculationRecord,
        engineer: &EngineerInfo,
    ) -> EngineResult<OverwriteOutcome> {
        check_type(calculation_type, record)?;
        let project = self.projects.get_project(project_id)?;

        if let Some(existing) = self.reports.get_report(existing_report_id)? {
            if !existing.matches(project_id, calculation_type) {
                return Err(EngineError::input(vec![format!(
                    "existing_report_id: report {} belongs to project '{}' ({}), not '{}' ({})",
                    existing_report_id,
                    existing.project_id,
                    existing.calculation_type,
                    project_id,
                    calculation_type
                )]));
            }
        }

        let mut warnings = Vec::new();
        match self.reports.delete_report(existing_report_id) {
            Ok(()) => tracing::debug!(%existing_report_id, "previous report deleted"),
            Err(e) => {
                if self.reports.get_report(existing_report_id)?.is_some() {
                    tracing::warn!(
                        project_id,
                        calculation_type = %calculation_type,
                        %existing_report_id,
                        error = %e,
                        "previous report could not be deleted"
                    );
                    return Err(e);
                }
                tracing::warn!(
                    project_id,
                    calculation_type = %calculation_type,
                    %existing_report_id,
                    error = %e,
                    "previous report already gone"
                );
                warnings.push(format!(
                    "Previous report {} could not be deleted: {}",
                    existing_report_id, e
                ));
            }
        }

        let report = self
            .reports
            .create_report(NewReport::build(&project, engineer, record))?;
        tracing::info!(
            project_id,
            calculation_type = %calculation_type,
            report_id = %report.id,
            replaced = %existing_report_id,
            "report overwritten"
        );
        Ok(OverwriteOutcome { report, warnings })
    }

    /// Mark a report as sent to the project owner.
    pub fn send_to_owner(&self, report_id: Uuid) -> EngineResult<QuantityReport> {
        let report = self
            .reports
            .get_report(report_id)?
            .ok_or_else(|| EngineError::lookup("report", format!("report {} not found", report_id)))?;
        if report.owner_email.is_none() {
            return Err(EngineError::lookup(
                "owner email",
                format!("project '{}' has no linked owner", report.project_id),
            ));
        }
        let sent = self.reports.mark_sent(report_id)?;
        tracing::info!(report_id = %report_id, project_id = %sent.project_id, "report sent to owner");
        Ok(sent)
    }

    fn create(
        &self,
        project_id: &str,
        record: &CalculationRecord,
        engineer: &EngineerInfo,
    ) -> EngineResult<QuantityReport> {
        let project = self.projects.get_project(project_id)?;
        let report = self
            .reports
            .create_report(NewReport::build(&project, engineer, record))?;
        tracing::info!(
            project_id,
            calculation_type = %report.calculation_type,
            report_id = %report.id,
            "report saved"
        );
        Ok(report)
    }
}

fn check_type(calculation_type: CalculationType, record: &CalculationRecord) -> EngineResult<()> {
    if record.calculation_type() != calculation_type {
        return Err(EngineError::input(vec![format!(
            "calculation_type: expected '{}' but the calculation is '{}'",
            calculation_type,
            record.calculation_type()
        )]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::element::{BoxDimensions, ElementTab, ElementVolumeInput};
    use crate::calculations::ElementInput;
    use crate::project::ProjectInfo;
    use crate::report::memory::MemoryStore;
    use assert_matches::assert_matches;

    fn record(height: f64) -> CalculationRecord {
        CalculationRecord::new(ElementInput::ElementVolume(ElementVolumeInput {
            tab: ElementTab::GroundSlab,
            dimensions: BoxDimensions::new(12.0, 10.0, height),
        }))
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_project(
            ProjectInfo::new("p-1", "Villa", "Omar").with_owner_email("omar@example.com"),
        )
    }

    fn engineer() -> EngineerInfo {
        EngineerInfo::new("e-1", "Sara")
    }

    #[test]
    fn test_first_save_creates_report() {
        let store = store();
        let manager = ReportManager::new(&store, &store);
        let outcome = manager
            .save("p-1", CalculationType::ElementVolume, &record(0.15), &engineer())
            .unwrap();
        let report = match outcome {
            SaveOutcome::Saved(r) => r,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(report.project_name, "Villa");
        assert_eq!(report.engineer_name, "Sara");
        assert_eq!(report.owner_email.as_deref(), Some("omar@example.com"));
    }

    #[test]
    fn test_second_save_is_conflict() {
        let store = store();
        let manager = ReportManager::new(&store, &store);
        let first = manager
            .save("p-1", CalculationType::ElementVolume, &record(0.15), &engineer())
            .unwrap();
        let first_id = match first {
            SaveOutcome::Saved(r) => r.id,
            other => panic!("unexpected {:?}", other),
        };

        let second = manager.save("p-1", CalculationType::ElementVolume, &record(0.2), &engineer());
        assert_eq!(
            second,
            Ok(SaveOutcome::Conflict {
                existing_report_id: first_id
            })
        );
        assert_eq!(store.report_count().unwrap(), 1);

        let response = SaveResponse::from(&second);
        assert_eq!(response.status, SaveStatus::Conflict);
        assert_eq!(response.existing_report_id, Some(first_id));
    }

    #[test]
    fn test_confirm_overwrite_replaces_report() {
        let store = store();
        let manager = ReportManager::new(&store, &store);
        let first = match manager
            .save("p-1", CalculationType::ElementVolume, &record(0.15), &engineer())
            .unwrap()
        {
            SaveOutcome::Saved(r) => r,
            other => panic!("unexpected {:?}", other),
        };

        let outcome = manager
            .confirm_overwrite(first.id, "p-1", CalculationType::ElementVolume, &record(0.2), &engineer())
            .unwrap();
        assert!(outcome.warnings.is_empty());
        assert_ne!(outcome.report.id, first.id);

        let reports = store.list_reports("p-1").unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, outcome.report.id);
    }

    #[test]
    fn test_overwrite_of_vanished_report_warns_and_creates() {
        let store = store();
        let manager = ReportManager::new(&store, &store);
        let outcome = manager
            .confirm_overwrite(Uuid::new_v4(), "p-1", CalculationType::ElementVolume, &record(0.2), &engineer())
            .unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("could not be deleted"));
        assert_eq!(store.report_count().unwrap(), 1);
    }

    #[test]
    fn test_overwrite_rejects_report_of_another_project() {
        let store = store().with_project(ProjectInfo::new("p-2", "Shop", "Lina"));
        let manager = ReportManager::new(&store, &store);
        let other = match manager
            .save("p-2", CalculationType::ElementVolume, &record(0.15), &engineer())
            .unwrap()
        {
            SaveOutcome::Saved(r) => r,
            other => panic!("unexpected {:?}", other),
        };
        manager
            .save("p-1", CalculationType::ElementVolume, &record(0.15), &engineer())
            .unwrap();

        let result = manager.confirm_overwrite(
            other.id,
            "p-1",
            CalculationType::ElementVolume,
            &record(0.2),
            &engineer(),
        );
        assert_matches!(result, Err(EngineError::Input { .. }));
        assert_eq!(store.list_reports("p-2").unwrap(), vec![other]);
        assert_eq!(store.list_reports("p-1").unwrap().len(), 1);
    }

    /// Memory store whose deletes always fail
    struct StuckDeletes(MemoryStore);

    impl ReportStore for StuckDeletes {
        fn list_reports(&self, project_id: &str) -> EngineResult<Vec<QuantityReport>> {
            self.0.list_reports(project_id)
        }
        fn create_report(&self, report: NewReport) -> EngineResult<QuantityReport> {
            self.0.create_report(report)
        }
        fn delete_report(&self, _report_id: Uuid) -> EngineResult<()> {
            Err(EngineError::persistence("delete report", "disk full"))
        }
        fn get_report(&self, report_id: Uuid) -> EngineResult<Option<QuantityReport>> {
            self.0.get_report(report_id)
        }
        fn mark_sent(&self, report_id: Uuid) -> EngineResult<QuantityReport> {
            self.0.mark_sent(report_id)
        }
    }

    #[test]
    fn test_failed_delete_of_present_report_is_persistence_error() {
        let stuck = StuckDeletes(store());
        let manager = ReportManager::new(&stuck, &stuck.0);
        let first = match manager
            .save("p-1", CalculationType::ElementVolume, &record(0.15), &engineer())
            .unwrap()
        {
            SaveOutcome::Saved(r) => r,
            other => panic!("unexpected {:?}", other),
        };

        let err = manager
            .confirm_overwrite(first.id, "p-1", CalculationType::ElementVolume, &record(0.2), &engineer())
            .unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Persistence);
        assert!(err.to_string().contains("disk full"));
        assert_eq!(stuck.list_reports("p-1").unwrap(), vec![first]);
    }

    #[test]
    fn test_unknown_project_is_lookup_error() {
        let store = store();
        let manager = ReportManager::new(&store, &store);
        let result = manager.save("p-9", CalculationType::ElementVolume, &record(0.15), &engineer());
        assert_matches!(result, Err(EngineError::Lookup { .. }));
        assert_eq!(SaveResponse::from(&result).status, SaveStatus::Error);
    }

    #[test]
    fn test_type_mismatch_is_input_error() {
        let store = store();
        let manager = ReportManager::new(&store, &store);
        let result = manager.save("p-1", CalculationType::Columns, &record(0.15), &engineer());
        assert_matches!(result, Err(EngineError::Input { .. }));
        assert_eq!(store.report_count().unwrap(), 0);
    }

    #[test]
    fn test_send_to_owner() {
        let store = store();
        let manager = ReportManager::new(&store, &store);
        let report = match manager
            .save("p-1", CalculationType::ElementVolume, &record(0.15), &engineer())
            .unwrap()
        {
            SaveOutcome::Saved(r) => r,
            other => panic!("unexpected {:?}", other),
        };
        let sent = manager.send_to_owner(report.id).unwrap();
        assert!(sent.sent_to_owner);
        assert_matches!(manager.send_to_owner(Uuid::new_v4()), Err(EngineError::Lookup { .. }));
    }

    #[test]
    fn test_send_without_owner_email() {
        let store = MemoryStore::new().with_project(ProjectInfo::new("p-2", "Shop", "Lina"));
        let manager = ReportManager::new(&store, &store);
        let report = match manager
            .save("p-2", CalculationType::ElementVolume, &record(0.15), &engineer())
            .unwrap()
        {
            SaveOutcome::Saved(r) => r,
            other => panic!("unexpected {:?}", other),
        };
        let err = manager.send_to_owner(report.id).unwrap_err();
        assert_matches!(err, EngineError::Lookup { ref what, .. } if what == "owner email");
    }
}
