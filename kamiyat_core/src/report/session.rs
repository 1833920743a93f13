//! # Report Session
//!
//! The save flow for one (project, calculation type) as the user walks
//! through it:
//!
//! ```text
//! NoReport ──compute──► Computed ──save──► Saved
//!                          ▲   │
//!                   cancel │   │ existing report
//!                          │   ▼
//!                     ConflictPending ──confirm──► Saved
//! ```
//!
//! Editing any input returns to `NoReport` from every state, so a result is
//! never saved for input it was not computed from. A failed store call leaves
//! the session where it was.

use serde::Serialize;
use uuid::Uuid;

use crate::calculations::{compute_as, CalculationRecord, CalculationType, ElementInput};
use crate::errors::{EngineError, EngineResult};
use crate::project::EngineerInfo;
use crate::report::manager::{ReportManager, SaveOutcome};
use crate::report::model::QuantityReport;
use crate::report::store::{ProjectStore, ReportStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum SessionState {
    NoReport,
    /// Result held locally, not persisted
    Computed { record: CalculationRecord },
    /// Save found an existing report; waiting for the user to decide
    ConflictPending {
        record: CalculationRecord,
        existing_report_id: Uuid,
    },
    Saved { report: QuantityReport },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::NoReport => "no-report",
            SessionState::Computed { .. } => "computed",
            SessionState::ConflictPending { .. } => "conflict-pending",
            SessionState::Saved { .. } => "saved",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportSession {
    project_id: String,
    calculation_type: CalculationType,
    engineer: EngineerInfo,
    state: SessionState,
}

impl ReportSession {
    pub fn new(
        project_id: impl Into<String>,
        calculation_type: CalculationType,
        engineer: EngineerInfo,
    ) -> Self {
        ReportSession {
            project_id: project_id.into(),
            calculation_type,
            engineer,
            state: SessionState::NoReport,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn calculation_type(&self) -> CalculationType {
        self.calculation_type
    }

    /// Run the calculator on validated input and hold the result.
    pub fn compute(&mut self, input: ElementInput) -> EngineResult<&CalculationRecord> {
        match self.state {
            SessionState::NoReport | SessionState::Computed { .. } => {}
            _ => return Err(self.invalid("compute")),
        }
        let result = compute_as(self.calculation_type, &input)?;
        self.state = SessionState::Computed {
            record: CalculationRecord { input, result },
        };
        match &self.state {
            SessionState::Computed { record } => Ok(record),
            _ => Err(self.invalid("compute")),
        }
    }

    /// Discard any result; the next save needs a fresh compute.
    pub fn input_changed(&mut self) {
        self.state = SessionState::NoReport;
    }

    pub fn save<R, P>(&mut self, manager: &ReportManager<'_, R, P>) -> EngineResult<&SessionState>
    where
        R: ReportStore + ?Sized,
        P: ProjectStore + ?Sized,
    {
        let record = match &self.state {
            SessionState::Computed { record } => record.clone(),
            _ => return Err(self.invalid("save")),
        };

        self.state = match manager.save(&self.project_id, self.calculation_type, &record, &self.engineer)? {
            SaveOutcome::Saved(report) => SessionState::Saved { report },
            SaveOutcome::Conflict { existing_report_id } => SessionState::ConflictPending {
                record,
                existing_report_id,
            },
        };
        Ok(&self.state)
    }

    /// Replace the existing report. Returns the non-fatal warnings.
    pub fn confirm_overwrite<R, P>(&mut self, manager: &ReportManager<'_, R, P>) -> EngineResult<Vec<String>>
    where
        R: ReportStore + ?Sized,
        P: ProjectStore + ?Sized,
    {
        let (record, existing_report_id) = match &self.state {
            SessionState::ConflictPending {
                record,
                existing_report_id,
            } => (record, *existing_report_id),
            _ => return Err(self.invalid("confirm overwrite")),
        };

        let outcome = manager.confirm_overwrite(
            existing_report_id,
            &self.project_id,
            self.calculation_type,
            record,
            &self.engineer,
        )?;
        self.state = SessionState::Saved {
            report: outcome.report,
        };
        Ok(outcome.warnings)
    }

    /// Keep the computed result without saving.
    pub fn cancel_overwrite(&mut self) -> EngineResult<()> {
        let record = match &self.state {
            SessionState::ConflictPending { record, .. } => record.clone(),
            _ => return Err(self.invalid("cancel overwrite")),
        };
        self.state = SessionState::Computed { record };
        Ok(())
    }

    fn invalid(&self, action: &str) -> EngineError {
        EngineError::invalid_transition(self.state.name(), action)
    }
}
