//! Integration tests for the quantity report lifecycle.
//!
//! Tests cover:
//! - Raw form input through validation, calculation and save
//! - One report per (project, calculation type), with conflict on the second save
//! - Overwrite after confirmation, including a delete that fails
//! - The same flow against the JSON file store

use assert_matches::assert_matches;
use tempfile::tempdir;
use uuid::Uuid;

use kamiyat_core::calculations::{compute, CalculationRecord, CalculationType, RawElementInput};
use kamiyat_core::errors::{EngineError, EngineResult};
use kamiyat_core::project::{EngineerInfo, ProjectInfo};
use kamiyat_core::reference::ReferenceTables;
use kamiyat_core::report::{
    JsonFileStore, MemoryStore, NewReport, ProjectStore, QuantityReport, ReportManager,
    ReportSession, ReportStore, SaveOutcome, SessionState,
};
use kamiyat_core::validation::validate;

const ROOF_SLAB: &str = r#"{
    "calculation_type": "roof-slab",
    "has_ribs": true,
    "area": "10",
    "thickness": "0.3",
    "slab_volume": "3",
    "rib": { "length": "0.4", "width": "0.2", "height": "0.2" }
}"#;

fn record_from(json: &str, calculation_type: CalculationType) -> anyhow::Result<CalculationRecord> {
    let raw: RawElementInput = serde_json::from_str(json)?;
    let input = validate(calculation_type, &raw, ReferenceTables::builtin()).into_result()?;
    Ok(CalculationRecord::new(input))
}

fn villa() -> ProjectInfo {
    ProjectInfo::new("villa-12", "Villa 12", "Omar Haddad").with_owner_email("omar@example.com")
}

fn engineer() -> EngineerInfo {
    EngineerInfo::new("eng-7", "Sara Nasser")
}

/// Delegates to a memory store but refuses every delete.
struct RefusingDeletes {
    inner: MemoryStore,
}

impl ReportStore for RefusingDeletes {
    fn list_reports(&self, project_id: &str) -> EngineResult<Vec<QuantityReport>> {
        self.inner.list_reports(project_id)
    }

    fn create_report(&self, report: NewReport) -> EngineResult<QuantityReport> {
        self.inner.create_report(report)
    }

    fn delete_report(&self, _report_id: Uuid) -> EngineResult<()> {
        Err(EngineError::persistence("delete report", "connection reset"))
    }

    fn get_report(&self, report_id: Uuid) -> EngineResult<Option<QuantityReport>> {
        self.inner.get_report(report_id)
    }

    fn mark_sent(&self, report_id: Uuid) -> EngineResult<QuantityReport> {
        self.inner.mark_sent(report_id)
    }
}

#[test]
fn test_raw_input_to_saved_report() -> anyhow::Result<()> {
    let store = MemoryStore::new().with_project(villa());
    let manager = ReportManager::new(&store, &store);
    let record = record_from(ROOF_SLAB, CalculationType::RoofSlab)?;

    let outcome = manager.save("villa-12", CalculationType::RoofSlab, &record, &engineer())?;
    let report = match outcome {
        SaveOutcome::Saved(report) => report,
        other => panic!("expected a saved report, got {:?}", other),
    };

    // 3 m³ slab minus 50 ribs of 0.016 m³
    let concrete = report.concrete_data.clone().unwrap();
    assert!((concrete.total_volume_m3 - 2.2).abs() < 1e-9);
    assert_eq!(concrete.trucks_needed, 5);
    assert_eq!(report.project_name, "Villa 12");
    assert_eq!(report.calculation_data.as_ref(), Some(&record));
    Ok(())
}

#[test]
fn test_second_save_conflicts_without_second_report() -> anyhow::Result<()> {
    let store = MemoryStore::new().with_project(villa());
    let manager = ReportManager::new(&store, &store);
    let record = record_from(ROOF_SLAB, CalculationType::RoofSlab)?;

    let first = manager.save("villa-12", CalculationType::RoofSlab, &record, &engineer())?;
    let second = manager.save("villa-12", CalculationType::RoofSlab, &record, &engineer())?;

    let first_id = match first {
        SaveOutcome::Saved(r) => r.id,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(
        second,
        SaveOutcome::Conflict {
            existing_report_id: first_id
        }
    );
    assert_eq!(store.list_reports("villa-12")?.len(), 1);

    // A different calculation type in the same project is independent
    let steel = record_from(
        r#"{ "calculation_type": "roof-slab-steel", "reinforcement_type": "separate",
             "roof_area": "100", "spacing": "0.2" }"#,
        CalculationType::RoofSlabSteel,
    )?;
    let third = manager.save("villa-12", CalculationType::RoofSlabSteel, &steel, &engineer())?;
    assert_matches!(third, SaveOutcome::Saved(_));
    assert_eq!(store.list_reports("villa-12")?.len(), 2);
    Ok(())
}

#[test]
fn test_session_overwrite_flow() -> anyhow::Result<()> {
    let store = MemoryStore::new().with_project(villa());
    let manager = ReportManager::new(&store, &store);
    let raw: RawElementInput = serde_json::from_str(ROOF_SLAB)?;
    let input = validate(CalculationType::RoofSlab, &raw, ReferenceTables::builtin()).into_result()?;

    let mut first = ReportSession::new("villa-12", CalculationType::RoofSlab, engineer());
    first.compute(input.clone())?;
    first.save(&manager)?;

    let mut second = ReportSession::new("villa-12", CalculationType::RoofSlab, engineer());
    second.compute(input)?;
    let existing = match second.save(&manager)? {
        SessionState::ConflictPending {
            existing_report_id, ..
        } => *existing_report_id,
        other => panic!("expected a conflict, got {:?}", other),
    };

    let warnings = second.confirm_overwrite(&manager)?;
    assert!(warnings.is_empty());
    let reports = store.list_reports("villa-12")?;
    assert_eq!(reports.len(), 1);
    assert_ne!(reports[0].id, existing);
    Ok(())
}

#[test]
fn test_failed_delete_is_surfaced_not_swallowed() -> anyhow::Result<()> {
    let store = RefusingDeletes {
        inner: MemoryStore::new().with_project(villa()),
    };
    let manager = ReportManager::new(&store, &store.inner);
    let record = record_from(ROOF_SLAB, CalculationType::RoofSlab)?;

    // Nothing to delete yet: the delete fails, the create goes ahead with a warning
    let outcome = manager.confirm_overwrite(
        Uuid::new_v4(),
        "villa-12",
        CalculationType::RoofSlab,
        &record,
        &engineer(),
    )?;
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("connection reset"));

    // The old report is still there: the delete failure comes back as is
    let err = manager
        .confirm_overwrite(
            outcome.report.id,
            "villa-12",
            CalculationType::RoofSlab,
            &record,
            &engineer(),
        )
        .unwrap_err();
    assert_matches!(err, EngineError::Persistence { ref reason, .. } if reason.contains("connection reset"));
    assert_eq!(store.list_reports("villa-12")?.len(), 1);
    Ok(())
}

#[test]
fn test_recompute_is_bit_identical() -> anyhow::Result<()> {
    let raw: RawElementInput = serde_json::from_str(ROOF_SLAB)?;
    let input = validate(CalculationType::RoofSlab, &raw, ReferenceTables::builtin()).into_result()?;
    let a = serde_json::to_vec(&compute(&input))?;
    let b = serde_json::to_vec(&compute(&input))?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn test_file_store_lifecycle() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("reports.json");
    let store = JsonFileStore::new(&path, "eng-7");
    store.add_project(villa())?;

    let manager = ReportManager::new(&store, &store);
    let record = record_from(ROOF_SLAB, CalculationType::RoofSlab)?;
    let first = match manager.save("villa-12", CalculationType::RoofSlab, &record, &engineer())? {
        SaveOutcome::Saved(r) => r,
        other => panic!("unexpected {:?}", other),
    };
    assert_matches!(
        manager.save("villa-12", CalculationType::RoofSlab, &record, &engineer())?,
        SaveOutcome::Conflict { .. }
    );

    let replaced = manager.confirm_overwrite(
        first.id,
        "villa-12",
        CalculationType::RoofSlab,
        &record,
        &engineer(),
    )?;
    let sent = manager.send_to_owner(replaced.report.id)?;
    assert!(sent.sent_to_owner);

    // A fresh handle on the same file sees the same state
    let reopened = JsonFileStore::new(&path, "someone-else");
    let reports = reopened.list_reports("villa-12")?;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, replaced.report.id);
    assert!(reports[0].sent_to_owner);
    assert_eq!(reopened.get_project("villa-12")?.name, "Villa 12");
    Ok(())
}
