//! # Quantity Reports
//!
//! Persistence and lifecycle of quantity reports.
//!
//! - [`model`] - `QuantityReport` and its payload
//! - [`store`] - `ReportStore` / `ProjectStore` traits
//! - [`memory`] - in-memory store
//! - [`file_store`] - JSON file store with atomic saves and locking
//! - [`manager`] - save, conflict and overwrite
//! - [`session`] - the per-form state machine on top of the manager

#[cfg(not(target_arch = "wasm32"))]
pub mod file_store;
pub mod manager;
pub mod memory;
pub mod model;
pub mod session;
pub mod store;

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::JsonFileStore;
pub use manager::{OverwriteOutcome, ReportManager, SaveOutcome, SaveResponse, SaveStatus};
pub use memory::MemoryStore;
pub use model::{ConcreteData, NewReport, QuantityReport, ReportStatus, SteelData};
pub use session::{ReportSession, SessionState};
pub use store::{ProjectStore, ReportStore};
