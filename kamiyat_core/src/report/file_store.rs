//! # JSON File Store
//!
//! Reports and projects kept in a single JSON file, with:
//! - **Atomic writes**: write to `.tmp`, fsync, rename over the store file
//! - **File locking**: every mutation holds an exclusive lock, so the
//!   one-report-per-type check and the insert happen under the same lock
//! - **Version validation**: refuse store files from an incompatible schema
//!
//! The lock is an OS-level lock (via fs2) on a `.lock` file next to the store,
//! which also records who holds it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kamiyat_core::project::ProjectInfo;
//! use kamiyat_core::report::file_store::JsonFileStore;
//! use kamiyat_core::report::store::ProjectStore;
//!
//! let store = JsonFileStore::new("reports.json", "eng-7");
//! store.add_project(ProjectInfo::new("villa-12", "Villa 12", "Omar Haddad"))?;
//! let project = store.get_project("villa-12")?;
//! # Ok::<(), kamiyat_core::errors::EngineError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::project::ProjectInfo;
use crate::report::model::{NewReport, QuantityReport};
use crate::report::store::{ProjectStore, ReportStore};

/// Current schema version for store files
pub const STORE_SCHEMA_VERSION: &str = "0.1.0";

/// Locks older than this are taken over
const STALE_LOCK_HOURS: i64 = 24;

/// On-disk layout of the store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFile {
    pub version: String,
    #[serde(default)]
    pub projects: Vec<ProjectInfo>,
    #[serde(default)]
    pub reports: Vec<QuantityReport>,
}

impl Default for StoreFile {
    fn default() -> Self {
        StoreFile {
            version: STORE_SCHEMA_VERSION.to_string(),
            projects: Vec::new(),
            reports: Vec::new(),
        }
    }
}

/// Who holds a store lock, as written into the `.lock` file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockHolder {
    engineer_id: String,
    machine: String,
    pid: u32,
    locked_at: DateTime<Utc>,
}

impl LockHolder {
    fn current(engineer_id: &str) -> Self {
        LockHolder {
            engineer_id: engineer_id.to_string(),
            machine: machine_name(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Dead process on this machine, or held for too long
    fn is_stale(&self) -> bool {
        #[cfg(unix)]
        {
            if self.machine == machine_name() && fs::metadata(format!("/proc/{}", self.pid)).is_err() {
                return true;
            }
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS
    }
}

fn machine_name() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Exclusive lock on a store file for one mutation, released on drop.
struct StoreLock {
    lock_path: PathBuf,
    _file: File,
}

impl StoreLock {
    /// Acquire the lock or fail with `EngineError::FileLocked`.
    fn acquire(path: &Path, engineer_id: &str) -> EngineResult<Self> {
        let lock_path = lock_path_for(path);

        if let Some(holder) = read_lock_holder(&lock_path) {
            if !holder.is_stale() {
                return Err(EngineError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", holder.engineer_id, holder.machine),
                    holder.locked_at.to_rfc3339(),
                ));
            }
            tracing::warn!(
                path = %path.display(),
                holder = %holder.engineer_id,
                "taking over stale store lock"
            );
        }

        let file = lock_file(&lock_path, &LockHolder::current(engineer_id)).map_err(|e| match e {
            LockError::Held => {
                EngineError::file_locked(path.display().to_string(), "another process", "unknown")
            }
            LockError::Io(operation, e) => io_error(operation, &lock_path, e),
        })?;

        tracing::trace!(path = %lock_path.display(), "store lock acquired");
        Ok(StoreLock {
            lock_path,
            _file: file,
        })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

enum LockError {
    Held,
    Io(&'static str, std::io::Error),
}

/// Take the OS lock, then record the holder. The file is only emptied once
/// the lock is ours, so a refused caller leaves the holder's record intact.
fn lock_file(lock_path: &Path, holder: &LockHolder) -> Result<File, LockError> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| LockError::Io("open lock", e))?;
    file.try_lock_exclusive().map_err(|_| LockError::Held)?;

    let json = serde_json::to_vec_pretty(holder).map_err(|e| LockError::Io("encode lock", e.into()))?;
    file.set_len(0).map_err(|e| LockError::Io("truncate lock", e))?;
    file.write_all(&json).map_err(|e| LockError::Io("write lock", e))?;
    file.sync_all().map_err(|e| LockError::Io("sync lock", e))?;
    Ok(file)
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn read_lock_holder(lock_path: &Path) -> Option<LockHolder> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn io_error(operation: &str, path: &Path, e: std::io::Error) -> EngineError {
    EngineError::persistence(operation, format!("{}: {}", path.display(), e))
}

/// Write the store with temp file, fsync and rename.
fn save_store(store: &StoreFile, path: &Path) -> EngineResult<()> {
    let json = serde_json::to_string_pretty(store)?;
    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file =
        File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| io_error("write temp file", &tmp_path, e))?;
    tmp_file
        .sync_all()
        .map_err(|e| io_error("sync temp file", &tmp_path, e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })?;

    tracing::debug!(
        path = %path.display(),
        reports = store.reports.len(),
        "store saved"
    );
    Ok(())
}

/// Read the store; a missing file is an empty store.
fn load_store(path: &Path) -> EngineResult<StoreFile> {
    if !path.exists() {
        return Ok(StoreFile::default());
    }

    let mut contents = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .map_err(|e| io_error("read", path, e))?;

    let store: StoreFile = serde_json::from_str(&contents).map_err(|e| EngineError::Serialization {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;
    validate_version(&store.version)?;
    Ok(store)
}

/// Major versions must match; on 0.x a newer minor is refused.
fn validate_version(file_version: &str) -> EngineResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(STORE_SCHEMA_VERSION);

    let mismatch = || EngineError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: STORE_SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0 && file_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }
    Ok(())
}

/// Report and project store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    engineer_id: String,
}

impl JsonFileStore {
    /// `engineer_id` is recorded in the lock file while mutating.
    pub fn new(path: impl Into<PathBuf>, engineer_id: impl Into<String>) -> Self {
        JsonFileStore {
            path: path.into(),
            engineer_id: engineer_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> EngineResult<StoreFile> {
        load_store(&self.path)
    }

    /// Insert or replace a project.
    pub fn add_project(&self, project: ProjectInfo) -> EngineResult<()> {
        self.update(|store| {
            store.projects.retain(|p| p.id != project.id);
            store.projects.push(project);
            Ok(())
        })
    }

    /// Load, mutate and save under the lock.
    fn update<T>(&self, f: impl FnOnce(&mut StoreFile) -> EngineResult<T>) -> EngineResult<T> {
        let _lock = StoreLock::acquire(&self.path, &self.engineer_id)?;
        let mut store = load_store(&self.path)?;
        let value = f(&mut store)?;
        save_store(&store, &self.path)?;
        Ok(value)
    }
}

impl ReportStore for JsonFileStore {
    fn list_reports(&self, project_id: &str) -> EngineResult<Vec<QuantityReport>> {
        Ok(self
            .load()?
            .reports
            .into_iter()
            .filter(|r| r.project_id == project_id)
            .collect())
    }

    fn create_report(&self, report: NewReport) -> EngineResult<QuantityReport> {
        self.update(|store| {
            if let Some(existing) = store
                .reports
                .iter()
                .find(|r| r.matches(&report.project_id, report.calculation_type))
            {
                return Err(EngineError::conflict(
                    report.project_id.clone(),
                    report.calculation_type,
                    existing.id,
                ));
            }
            let created = QuantityReport::from_new(report, Utc::now());
            store.reports.push(created.clone());
            Ok(created)
        })
    }

    fn delete_report(&self, report_id: Uuid) -> EngineResult<()> {
        self.update(|store| {
            let before = store.reports.len();
            store.reports.retain(|r| r.id != report_id);
            if store.reports.len() == before {
                return Err(EngineError::persistence(
                    "delete report",
                    format!("report {} not found", report_id),
                ));
            }
            Ok(())
        })
    }

    fn get_report(&self, report_id: Uuid) -> EngineResult<Option<QuantityReport>> {
        Ok(self.load()?.reports.into_iter().find(|r| r.id == report_id))
    }

    fn mark_sent(&self, report_id: Uuid) -> EngineResult<QuantityReport> {
        self.update(|store| {
            let report = store
                .reports
                .iter_mut()
                .find(|r| r.id == report_id)
                .ok_or_else(|| {
                    EngineError::persistence(
                        "mark report sent",
                        format!("report {} not found", report_id),
                    )
                })?;
            report.mark_sent(Utc::now());
            Ok(report.clone())
        })
    }
}

impl ProjectStore for JsonFileStore {
    fn get_project(&self, project_id: &str) -> EngineResult<ProjectInfo> {
        self.load()?
            .projects
            .into_iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| EngineError::lookup("project", format!("project '{}' not found", project_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::element::{BoxDimensions, ElementTab, ElementVolumeInput};
    use crate::calculations::{CalculationRecord, ElementInput};
    use crate::project::EngineerInfo;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn new_report(project_id: &str) -> NewReport {
        let project = ProjectInfo::new(project_id, "Villa", "Owner");
        let record = CalculationRecord::new(ElementInput::ElementVolume(ElementVolumeInput {
            tab: ElementTab::GroundSlab,
            dimensions: BoxDimensions::new(12.0, 10.0, 0.15),
        }));
        NewReport::build(&project, &EngineerInfo::new("e-1", "Engineer"), &record)
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/data/reports.json"));
        assert_eq!(lock_path, Path::new("/data/reports.json.lock"));
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("reports.json"), "e-1");
        assert!(store.list_reports("p-1").unwrap().is_empty());
    }

    #[test]
    fn test_reports_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports.json");

        let created = JsonFileStore::new(&path, "e-1")
            .create_report(new_report("p-1"))
            .unwrap();

        let reopened = JsonFileStore::new(&path, "e-2");
        let listed = reopened.list_reports("p-1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].calculation_data, created.calculation_data);
    }

    #[test]
    fn test_unique_per_project_and_type() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("reports.json"), "e-1");
        store.create_report(new_report("p-1")).unwrap();
        assert_matches!(
            store.create_report(new_report("p-1")),
            Err(EngineError::Conflict { .. })
        );
        store.create_report(new_report("p-2")).unwrap();
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_or_lock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports.json");
        let store = JsonFileStore::new(&path, "e-1");
        store.create_report(new_report("p-1")).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert!(!lock_path_for(&path).exists());
    }

    #[test]
    fn test_held_lock_blocks_mutation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports.json");
        let lock = StoreLock::acquire(&path, "someone-else").unwrap();
        let holder = read_lock_holder(&lock_path_for(&path)).unwrap();
        assert_eq!(holder.engineer_id, "someone-else");
        assert!(!holder.is_stale());

        let store = JsonFileStore::new(&path, "e-1");
        assert_matches!(
            store.create_report(new_report("p-1")),
            Err(EngineError::FileLocked { .. })
        );

        drop(lock);
        assert!(read_lock_holder(&lock_path_for(&path)).is_none());
        store.create_report(new_report("p-1")).unwrap();
    }

    #[test]
    fn test_refused_lock_keeps_holder_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports.json");
        let lock_path = lock_path_for(&path);
        let _lock = StoreLock::acquire(&path, "eng-7").unwrap();

        let refused = lock_file(&lock_path, &LockHolder::current("eng-9"));
        assert!(matches!(refused, Err(LockError::Held)));
        assert_eq!(read_lock_holder(&lock_path).unwrap().engineer_id, "eng-7");
    }

    #[test]
    fn test_delete_and_mark_sent() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("reports.json"), "e-1");
        let report = store.create_report(new_report("p-1")).unwrap();

        let sent = store.mark_sent(report.id).unwrap();
        assert!(sent.sent_to_owner);
        assert!(store.get_report(report.id).unwrap().unwrap().sent_to_owner);

        store.delete_report(report.id).unwrap();
        assert_matches!(
            store.delete_report(report.id),
            Err(EngineError::Persistence { .. })
        );
    }

    #[test]
    fn test_projects() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("reports.json"), "e-1");
        store
            .add_project(ProjectInfo::new("p-1", "Villa", "Owner"))
            .unwrap();
        store
            .add_project(ProjectInfo::new("p-1", "Villa 2", "Owner").with_owner_email("o@x.com"))
            .unwrap();
        let project = store.get_project("p-1").unwrap();
        assert_eq!(project.name, "Villa 2");
        assert_eq!(store.load().unwrap().projects.len(), 1);
        assert_matches!(store.get_project("nope"), Err(EngineError::Lookup { .. }));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(STORE_SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_newer_store_file_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports.json");
        fs::write(&path, r#"{ "version": "0.9.0", "projects": [], "reports": [] }"#).unwrap();
        assert_matches!(load_store(&path), Err(EngineError::VersionMismatch { .. }));
    }
}
