//! `save`, `reports`, `send` and `project add` commands, all against the
//! JSON file store named in the config.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use uuid::Uuid;

use kamiyat_core::calculations::CalculationType;
use kamiyat_core::errors::EngineResult;
use kamiyat_core::project::ProjectInfo;
use kamiyat_core::reference::ReferenceTables;
use kamiyat_core::report::{JsonFileStore, ReportManager, ReportStore, SaveOutcome, SaveResponse};

use crate::calc::record_from_file;
use crate::config::CliConfig;
use crate::output;
use crate::OutputFormat;

pub fn open_store(config: &CliConfig) -> JsonFileStore {
    JsonFileStore::new(&config.store_path, &config.engineer_id)
}

/// Save one calculation as the project's report for its type.
///
/// Without `overwrite` an existing report is left alone and the command
/// fails with its id. With `overwrite` the existing report is replaced.
pub fn run_save(
    path: &Path,
    project_id: &str,
    overwrite: bool,
    config: &CliConfig,
    tables: &ReferenceTables,
    format: OutputFormat,
) -> Result<()> {
    let record = record_from_file(path, tables)?;
    let calculation_type = record.calculation_type();
    let store = open_store(config);
    let manager = ReportManager::new(&store, &store);
    let engineer = config.engineer();

    let outcome = manager.save(project_id, calculation_type, &record, &engineer);
    let existing_report_id = match outcome {
        Ok(SaveOutcome::Conflict { existing_report_id }) if overwrite => existing_report_id,
        other => return finish_save(other, project_id, calculation_type, format),
    };

    info!(%existing_report_id, project_id, "replacing report");
    let replaced = manager.confirm_overwrite(existing_report_id, project_id, calculation_type, &record, &engineer)?;
    for warning in &replaced.warnings {
        warn!("{}", warning);
    }
    match format {
        OutputFormat::Json => {
            let saved: EngineResult<SaveOutcome> = Ok(SaveOutcome::Saved(replaced.report));
            println!("{}", serde_json::to_string_pretty(&SaveResponse::from(&saved))?);
        }
        OutputFormat::Human => {
            println!(
                "Replaced {} report {} with {}",
                calculation_type, existing_report_id, replaced.report.id
            );
            for warning in &replaced.warnings {
                println!("  warning: {}", warning);
            }
        }
    }
    Ok(())
}

/// Print the outcome of a plain save; a conflict is an error here.
fn finish_save(
    outcome: EngineResult<SaveOutcome>,
    project_id: &str,
    calculation_type: CalculationType,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&SaveResponse::from(&outcome))?);
    }
    match outcome? {
        SaveOutcome::Saved(report) => {
            if format == OutputFormat::Human {
                println!("Saved {} report {}", calculation_type, report.id);
            }
            Ok(())
        }
        SaveOutcome::Conflict { existing_report_id } => bail!(
            "project {} already has a {} report ({}); re-run with --overwrite to replace it",
            project_id,
            calculation_type,
            existing_report_id
        ),
    }
}

pub fn run_reports(project_id: &str, config: &CliConfig, format: OutputFormat) -> Result<()> {
    let store = open_store(config);
    let reports = store
        .list_reports(project_id)
        .with_context(|| format!("Failed to list reports in {}", store.path().display()))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Human => output::print_reports(project_id, &reports),
    }
    Ok(())
}

pub fn run_send(report_id: Uuid, config: &CliConfig, format: OutputFormat) -> Result<()> {
    let store = open_store(config);
    let manager = ReportManager::new(&store, &store);
    let report = manager.send_to_owner(report_id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => println!(
            "Sent report {} to {}",
            report.id,
            report.owner_email.as_deref().unwrap_or("the owner")
        ),
    }
    Ok(())
}

pub fn run_project_add(project: ProjectInfo, config: &CliConfig) -> Result<()> {
    let store = open_store(config);
    let id = project.id.clone();
    store
        .add_project(project)
        .with_context(|| format!("Failed to add project {}", id))?;
    println!("Project {} stored in {}", id, store.path().display());
    Ok(())
}
