//! # kamiyat_core - Structural Quantity Engine
//!
//! `kamiyat_core` turns element dimensions (foundations, columns, ground
//! bridges, roof slabs, roof beams) into concrete volumes and steel bar counts,
//! and keeps the resulting quantity reports at one per project and
//! calculation type. All inputs, results and errors are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Validate, then calculate**: raw form input becomes typed input only
//!   through [`validation::validate`]; calculators are pure and total
//! - **JSON-First**: every type implements Serialize/Deserialize
//! - **Rich Errors**: structured error types with codes and kinds
//!
//! ## Quick Start
//!
//! ```rust
//! use kamiyat_core::calculations::{compute, CalculationType, RawElementInput};
//! use kamiyat_core::reference::ReferenceTables;
//! use kamiyat_core::validation::validate;
//!
//! let raw: RawElementInput = serde_json::from_str(r#"{
//!     "calculation_type": "roof-slab-steel",
//!     "reinforcement_type": "mesh",
//!     "roof_area": "100",
//!     "mesh_length": "3",
//!     "mesh_width": "2"
//! }"#).unwrap();
//!
//! let input = validate(CalculationType::RoofSlabSteel, &raw, ReferenceTables::builtin())
//!     .into_result()
//!     .unwrap();
//! let result = compute(&input);
//! assert_eq!(result.steel_bars()[0].count, 20);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Calculation types, calculators and the aggregator
//! - [`validation`] - Input validation
//! - [`reference`] - Soil, building and iron bar tables with a TTL cache
//! - [`report`] - Quantity reports, stores, manager and session
//! - [`project`] - Project and engineer metadata
//! - [`raw`] - Raw form field parsing
//! - [`units`] - Metric length wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod project;
pub mod raw;
pub mod reference;
pub mod report;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute, CalculationRecord, CalculationResult, CalculationType, ElementInput, RawElementInput};
pub use errors::{EngineError, EngineResult, ErrorKind};
pub use project::{EngineerInfo, ProjectInfo};
pub use reference::{ReferenceCache, ReferenceData, ReferenceTables};
pub use report::{MemoryStore, QuantityReport, ReportManager, ReportSession, SaveOutcome};
pub use validation::{validate, ValidationResult};
