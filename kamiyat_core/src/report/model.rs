//! Quantity report records.
//!
//! A [`QuantityReport`] is the persisted form of one calculation: who made it,
//! for which project, and the derived concrete and steel figures. Stores accept
//! a [`NewReport`] and assign the id, status and timestamps themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::aggregate::{bags_approx, trucks_needed};
use crate::calculations::{BarQuantity, CalculationRecord, CalculationType};
use crate::project::{EngineerInfo, ProjectInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Saved,
    Sent,
}

/// Concrete volume with the delivery figures derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteData {
    pub total_volume_m3: f64,
    pub trucks_needed: u64,
    pub bags_approx: u64,
}

impl ConcreteData {
    pub fn from_volume(total_volume_m3: f64) -> Self {
        ConcreteData {
            total_volume_m3,
            trucks_needed: trucks_needed(total_volume_m3),
            bags_approx: bags_approx(total_volume_m3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelData {
    pub bars: Vec<BarQuantity>,
}

/// Report payload before the store has accepted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReport {
    pub project_id: String,
    pub project_name: String,
    pub engineer_id: String,
    pub engineer_name: String,
    pub owner_name: String,
    pub owner_email: Option<String>,
    pub calculation_type: CalculationType,
    pub concrete_data: Option<ConcreteData>,
    pub steel_data: Option<SteelData>,
    pub calculation_data: Option<CalculationRecord>,
}

impl NewReport {
    /// Stamp a calculation with project and engineer metadata.
    pub fn build(project: &ProjectInfo, engineer: &EngineerInfo, record: &CalculationRecord) -> Self {
        let bars = record.result.steel_bars();
        NewReport {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            engineer_id: engineer.engineer_id.clone(),
            engineer_name: engineer.engineer_name.clone(),
            owner_name: project.client_name.clone(),
            owner_email: project.linked_owner_email.clone(),
            calculation_type: record.calculation_type(),
            concrete_data: record.result.concrete_volume_m3().map(ConcreteData::from_volume),
            steel_data: if bars.is_empty() {
                None
            } else {
                Some(SteelData { bars })
            },
            calculation_data: Some(record.clone()),
        }
    }
}

/// A persisted quantity report.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "project_id": "villa-12",
///   "project_name": "Villa 12",
///   "engineer_id": "eng-7",
///   "engineer_name": "Sara Nasser",
///   "owner_name": "Omar Haddad",
///   "owner_email": "omar@example.com",
///   "calculation_type": "roof-slab",
///   "concrete_data": { "total_volume_m3": 24.0, "trucks_needed": 48, "bags_approx": 180 },
///   "steel_data": null,
///   "calculation_data": { "input": { "...": "..." }, "result": { "...": "..." } },
///   "status": "saved",
///   "sent_to_owner": false,
///   "created_at": "2025-03-01T09:30:00Z",
///   "updated_at": "2025-03-01T09:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityReport {
    pub id: Uuid,
    pub project_id: String,
    pub project_name: String,
    pub engineer_id: String,
    pub engineer_name: String,
    pub owner_name: String,
    pub owner_email: Option<String>,
    pub calculation_type: CalculationType,
    pub concrete_data: Option<ConcreteData>,
    pub steel_data: Option<SteelData>,
    pub calculation_data: Option<CalculationRecord>,
    pub status: ReportStatus,
    pub sent_to_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuantityReport {
    /// Accept a new report with a fresh id.
    pub fn from_new(new: NewReport, now: DateTime<Utc>) -> Self {
        QuantityReport {
            id: Uuid::new_v4(),
            project_id: new.project_id,
            project_name: new.project_name,
            engineer_id: new.engineer_id,
            engineer_name: new.engineer_name,
            owner_name: new.owner_name,
            owner_email: new.owner_email,
            calculation_type: new.calculation_type,
            concrete_data: new.concrete_data,
            steel_data: new.steel_data,
            calculation_data: new.calculation_data,
            status: ReportStatus::Saved,
            sent_to_owner: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches(&self, project_id: &str, calculation_type: CalculationType) -> bool {
        self.project_id == project_id && self.calculation_type == calculation_type
    }

    /// Mark the report as sent to the owner.
    pub fn mark_sent(&mut self, now: DateTime<Utc>) {
        self.status = ReportStatus::Sent;
        self.sent_to_owner = true;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::element::{BoxDimensions, ElementTab, ElementVolumeInput};
    use crate::calculations::roof_slab_steel::{RoofSlabSteelInput, SlabReinforcement};
    use crate::calculations::ElementInput;

    fn people() -> (ProjectInfo, EngineerInfo) {
        (
            ProjectInfo::new("villa-12", "Villa 12", "Omar Haddad").with_owner_email("omar@example.com"),
            EngineerInfo::new("eng-7", "Sara Nasser"),
        )
    }

    #[test]
    fn test_concrete_report_payload() {
        let (project, engineer) = people();
        let record = CalculationRecord::new(ElementInput::ElementVolume(ElementVolumeInput {
            tab: ElementTab::GroundBeams,
            dimensions: BoxDimensions::new(20.0, 0.25, 0.6),
        }));
        let new = NewReport::build(&project, &engineer, &record);

        assert_eq!(new.calculation_type, CalculationType::ElementVolume);
        assert_eq!(new.owner_name, "Omar Haddad");
        let concrete = new.concrete_data.clone().unwrap();
        assert!((concrete.total_volume_m3 - 3.0).abs() < 1e-9);
        assert_eq!(concrete.trucks_needed, 6);
        assert_eq!(concrete.bags_approx, 23);
        assert!(new.steel_data.is_none());

        let report = QuantityReport::from_new(new, Utc::now());
        assert_eq!(report.status, ReportStatus::Saved);
        assert!(!report.sent_to_owner);
        assert_eq!(report.created_at, report.updated_at);
        assert!(report.matches("villa-12", CalculationType::ElementVolume));
        assert!(!report.matches("villa-12", CalculationType::Columns));
    }

    #[test]
    fn test_steel_report_payload() {
        let (project, engineer) = people();
        let record = CalculationRecord::new(ElementInput::RoofSlabSteel(RoofSlabSteelInput {
            roof_area_m2: 100.0,
            reinforcement: SlabReinforcement::Mesh {
                mesh_length_m: 3.0,
                mesh_width_m: 2.0,
            },
        }));
        let new = NewReport::build(&project, &engineer, &record);
        assert!(new.concrete_data.is_none());
        assert_eq!(new.steel_data.unwrap().bars[0].count, 20);
    }

    #[test]
    fn test_mark_sent() {
        let (project, engineer) = people();
        let record = CalculationRecord::new(ElementInput::ElementVolume(ElementVolumeInput {
            tab: ElementTab::Roof,
            dimensions: BoxDimensions::new(1.0, 1.0, 1.0),
        }));
        let created = Utc::now();
        let mut report = QuantityReport::from_new(NewReport::build(&project, &engineer, &record), created);
        let later = created + chrono::Duration::seconds(30);
        report.mark_sent(later);
        assert_eq!(report.status, ReportStatus::Sent);
        assert!(report.sent_to_owner);
        assert_eq!(report.updated_at, later);
        assert_eq!(serde_json::to_value(report.status).unwrap(), "sent");
    }
}
