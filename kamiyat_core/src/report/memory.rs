//! In-memory report and project store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::project::ProjectInfo;
use crate::report::model::{NewReport, QuantityReport};
use crate::report::store::{ProjectStore, ReportStore};

#[derive(Debug, Default)]
struct MemoryState {
    projects: HashMap<String, ProjectInfo>,
    reports: Vec<QuantityReport>,
}

/// Both stores behind one mutex. Reports keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_project(self, project: ProjectInfo) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.projects.insert(project.id.clone(), project);
        }
        self
    }

    pub fn add_project(&self, project: ProjectInfo) -> EngineResult<()> {
        self.lock("add project")?
            .projects
            .insert(project.id.clone(), project);
        Ok(())
    }

    /// Total reports across all projects
    pub fn report_count(&self) -> EngineResult<usize> {
        Ok(self.lock("count reports")?.reports.len())
    }

    fn lock(&self, operation: &str) -> EngineResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| EngineError::persistence(operation, "store mutex poisoned"))
    }
}

impl ReportStore for MemoryStore {
    fn list_reports(&self, project_id: &str) -> EngineResult<Vec<QuantityReport>> {
        Ok(self
            .lock("list reports")?
            .reports
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    fn create_report(&self, report: NewReport) -> EngineResult<QuantityReport> {
        let mut state = self.lock("create report")?;
        if let Some(existing) = state
            .reports
            .iter()
            .find(|r| r.matches(&report.project_id, report.calculation_type))
        {
            return Err(EngineError::conflict(
                report.project_id,
                report.calculation_type,
                existing.id,
            ));
        }
        let created = QuantityReport::from_new(report, Utc::now());
        state.reports.push(created.clone());
        Ok(created)
    }

    fn delete_report(&self, report_id: Uuid) -> EngineResult<()> {
        let mut state = self.lock("delete report")?;
        let before = state.reports.len();
        state.reports.retain(|r| r.id != report_id);
        if state.reports.len() == before {
            return Err(EngineError::persistence(
                "delete report",
                format!("report {} not found", report_id),
            ));
        }
        Ok(())
    }

    fn get_report(&self, report_id: Uuid) -> EngineResult<Option<QuantityReport>> {
        Ok(self
            .lock("get report")?
            .reports
            .iter()
            .find(|r| r.id == report_id)
            .cloned())
    }

    fn mark_sent(&self, report_id: Uuid) -> EngineResult<QuantityReport> {
        let mut state = self.lock("mark report sent")?;
        let report = state
            .reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_else(|| {
                EngineError::persistence("mark report sent", format!("report {} not found", report_id))
            })?;
        report.mark_sent(Utc::now());
        Ok(report.clone())
    }
}

impl ProjectStore for MemoryStore {
    fn get_project(&self, project_id: &str) -> EngineResult<ProjectInfo> {
        self.lock("get project")?
            .projects
            .get(project_id)
            .cloned()
            .ok_or_else(|| EngineError::lookup("project", format!("project '{}' not found", project_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::element::{BoxDimensions, ElementTab, ElementVolumeInput};
    use crate::calculations::{CalculationRecord, CalculationType, ElementInput};
    use crate::project::EngineerInfo;
    use assert_matches::assert_matches;

    fn new_report(project_id: &str) -> NewReport {
        let project = ProjectInfo::new(project_id, "Villa", "Owner");
        let record = CalculationRecord::new(ElementInput::ElementVolume(ElementVolumeInput {
            tab: ElementTab::Roof,
            dimensions: BoxDimensions::new(10.0, 12.0, 0.2),
        }));
        NewReport::build(&project, &EngineerInfo::new("e-1", "Engineer"), &record)
    }

    #[test]
    fn test_create_and_list() {
        let store = MemoryStore::new();
        let a = store.create_report(new_report("p-1")).unwrap();
        store.create_report(new_report("p-2")).unwrap();

        let listed = store.list_reports("p-1").unwrap();
        assert_eq!(listed, vec![a.clone()]);
        assert_eq!(
            store
                .find_existing("p-1", CalculationType::ElementVolume)
                .unwrap()
                .map(|r| r.id),
            Some(a.id)
        );
        assert_eq!(store.find_existing("p-1", CalculationType::Columns).unwrap(), None);
    }

    #[test]
    fn test_unique_per_project_and_type() {
        let store = MemoryStore::new();
        let first = store.create_report(new_report("p-1")).unwrap();
        let err = store.create_report(new_report("p-1")).unwrap_err();
        assert_matches!(
            err,
            EngineError::Conflict { existing_report_id, .. } if existing_report_id == first.id
        );
        assert_eq!(store.report_count().unwrap(), 1);
    }

    #[test]
    fn test_delete_unknown_report() {
        let store = MemoryStore::new();
        let report = store.create_report(new_report("p-1")).unwrap();
        store.delete_report(report.id).unwrap();
        assert_matches!(
            store.delete_report(report.id),
            Err(EngineError::Persistence { .. })
        );
        assert_eq!(store.get_report(report.id).unwrap(), None);
    }

    #[test]
    fn test_unknown_project_is_lookup_error() {
        let store = MemoryStore::new().with_project(ProjectInfo::new("p-1", "Villa", "Owner"));
        assert_eq!(store.get_project("p-1").unwrap().name, "Villa");
        assert_matches!(store.get_project("p-9"), Err(EngineError::Lookup { .. }));
    }
}
