//! `validate`, `compute`, `aggregate` and `reference` commands.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use kamiyat_core::calculations::aggregate::{aggregate, AggregateResult, TabVolume};
use kamiyat_core::calculations::{compute, CalculationRecord, RawElementInput};
use kamiyat_core::reference::ReferenceTables;
use kamiyat_core::validation::{validate, ValidationResult};

use crate::output;
use crate::OutputFormat;

/// Read a raw form input from a JSON file. The file's `calculation_type`
/// selects the calculator.
pub fn read_raw_input(path: &Path) -> Result<RawElementInput> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse input {}", path.display()))
}

pub fn validate_file(path: &Path, tables: &ReferenceTables) -> Result<ValidationResult> {
    let raw = read_raw_input(path)?;
    let result = validate(raw.calculation_type(), &raw, tables);
    debug!(input = %path.display(), valid = result.is_ok(), "validated input");
    Ok(result)
}

/// Validate and calculate one input file.
pub fn record_from_file(path: &Path, tables: &ReferenceTables) -> Result<CalculationRecord> {
    let input = validate_file(path, tables)?
        .into_result()
        .with_context(|| format!("Invalid input in {}", path.display()))?;
    let record = CalculationRecord::new(input);
    info!(
        input = %path.display(),
        calculation_type = %record.calculation_type(),
        "calculated"
    );
    Ok(record)
}

pub fn run_validate(path: &Path, tables: &ReferenceTables, format: OutputFormat) -> Result<()> {
    let result = validate_file(path, tables)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Human => output::print_validation(&result),
    }
    if !result.is_ok() {
        bail!("{} has {} validation error(s)", path.display(), result.errors().len());
    }
    Ok(())
}

pub fn run_compute(path: &Path, tables: &ReferenceTables, format: OutputFormat) -> Result<()> {
    let raw = read_raw_input(path)?;
    let validation = validate(raw.calculation_type(), &raw, tables);
    if !validation.is_ok() && format == OutputFormat::Human {
        output::print_validation(&validation);
    }
    let input = validation
        .into_result()
        .with_context(|| format!("Invalid input in {}", path.display()))?;

    let result = compute(&input);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Human => output::print_result(&result),
    }
    Ok(())
}

/// Sum the concrete volumes of several input files, one tab per file.
pub fn aggregate_files(paths: &[impl AsRef<Path>], tables: &ReferenceTables) -> Result<AggregateResult> {
    let mut tabs = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let record = record_from_file(path, tables)?;
        let Some(volume_m3) = record.result.concrete_volume_m3() else {
            bail!(
                "{} is a {} calculation and has no concrete volume",
                path.display(),
                record.calculation_type()
            );
        };
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| record.calculation_type().to_string());
        tabs.push(TabVolume::new(label, volume_m3));
    }
    Ok(aggregate(tabs))
}

pub fn run_aggregate(paths: &[impl AsRef<Path>], tables: &ReferenceTables, format: OutputFormat) -> Result<()> {
    let result = aggregate_files(paths, tables)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Human => output::print_aggregate(&result),
    }
    Ok(())
}

pub fn run_reference(tables: &ReferenceTables, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(tables)?),
        OutputFormat::Human => output::print_reference(tables),
    }
    Ok(())
}
