//! # Reference Data
//!
//! Lookup tables the calculators read but never change: soil types, building
//! (live-load) types and iron bar cross-sections.
//!
//! The tables normally come from a remote service. The engine only sees the
//! [`ReferenceData`] trait, and [`ReferenceTables`] itself implements it, so a
//! JSON file or the built-in defaults can stand in for the service.
//!
//! [`ReferenceCache`] keeps one snapshot for a fixed time-to-live. It is
//! refreshed or invalidated explicitly; nothing is fetched behind the
//! caller's back.
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::reference::{ReferenceCache, ReferenceTables};
//!
//! let mut cache = ReferenceCache::new(ReferenceTables::builtin().clone(), chrono::Duration::minutes(10));
//! let tables = cache.tables().unwrap();
//! let bar = tables.iron_bar(16.0).unwrap();
//! assert!((bar.cross_sectional_area_mm2 - 201.06).abs() < 0.01);
//! ```

use std::f64::consts::PI;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Diameters match within this tolerance (mm)
const DIAMETER_TOLERANCE_MM: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilType {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingType {
    pub id: u32,
    pub building_type: String,
    /// Design live load for this use (kN/m²)
    #[serde(default)]
    pub live_load_kn_m2: Option<f64>,
}

/// A reinforcing bar size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IronBar {
    pub diameter_mm: f64,
    pub cross_sectional_area_mm2: f64,
}

impl IronBar {
    /// Bar with the nominal area `π d² / 4`.
    pub fn new(diameter_mm: f64) -> Self {
        IronBar {
            diameter_mm,
            cross_sectional_area_mm2: PI * diameter_mm.powi(2) / 4.0,
        }
    }
}

/// One snapshot of every reference table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    pub soil_types: Vec<SoilType>,
    #[serde(default)]
    pub building_types: Vec<BuildingType>,
    #[serde(default)]
    pub iron_bars: Vec<IronBar>,
}

static BUILTIN: Lazy<ReferenceTables> = Lazy::new(|| {
    let soil = |id, name: &str| SoilType {
        id,
        name: name.to_string(),
    };
    let building = |id, name: &str, live| BuildingType {
        id,
        building_type: name.to_string(),
        live_load_kn_m2: Some(live),
    };

    ReferenceTables {
        soil_types: vec![
            soil(1, "صخرية (Rock)"),
            soil(2, "رملية (Sand)"),
            soil(3, "طينية (Clay)"),
            soil(4, "طميية (Silt)"),
            soil(5, "ردم (Fill)"),
        ],
        building_types: vec![
            building(1, "سكني (Residential)", 2.0),
            building(2, "إداري (Office)", 2.5),
            building(3, "تجاري (Commercial)", 4.0),
            building(4, "مدرسة (School)", 3.0),
            building(5, "صناعي (Industrial)", 5.0),
        ],
        iron_bars: [6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0, 25.0, 28.0, 32.0]
            .into_iter()
            .map(IronBar::new)
            .collect(),
    }
});

impl ReferenceTables {
    /// Built-in default tables.
    pub fn builtin() -> &'static ReferenceTables {
        &BUILTIN
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn soil_type(&self, id: u32) -> Option<&SoilType> {
        self.soil_types.iter().find(|s| s.id == id)
    }

    pub fn building_type(&self, id: u32) -> Option<&BuildingType> {
        self.building_types.iter().find(|b| b.id == id)
    }

    pub fn iron_bar(&self, diameter_mm: f64) -> Option<&IronBar> {
        self.iron_bars
            .iter()
            .find(|b| (b.diameter_mm - diameter_mm).abs() < DIAMETER_TOLERANCE_MM)
    }

    /// Name of the first empty table, if any.
    fn first_empty(&self) -> Option<&'static str> {
        if self.soil_types.is_empty() {
            Some("soil types")
        } else if self.building_types.is_empty() {
            Some("building types")
        } else if self.iron_bars.is_empty() {
            Some("iron bars")
        } else {
            None
        }
    }
}

/// Source of reference tables.
pub trait ReferenceData {
    fn soil_types(&self) -> EngineResult<Vec<SoilType>>;
    fn building_types(&self) -> EngineResult<Vec<BuildingType>>;
    fn iron_bars(&self) -> EngineResult<Vec<IronBar>>;

    /// Fetch all three tables into one snapshot.
    fn fetch_all(&self) -> EngineResult<ReferenceTables> {
        Ok(ReferenceTables {
            soil_types: self.soil_types()?,
            building_types: self.building_types()?,
            iron_bars: self.iron_bars()?,
        })
    }
}

impl ReferenceData for ReferenceTables {
    fn soil_types(&self) -> EngineResult<Vec<SoilType>> {
        Ok(self.soil_types.clone())
    }

    fn building_types(&self) -> EngineResult<Vec<BuildingType>> {
        Ok(self.building_types.clone())
    }

    fn iron_bars(&self) -> EngineResult<Vec<IronBar>> {
        Ok(self.iron_bars.clone())
    }
}

#[derive(Debug, Clone)]
struct CachedTables {
    tables: ReferenceTables,
    fetched_at: DateTime<Utc>,
}

/// Reference tables cached for a fixed time-to-live.
#[derive(Debug)]
pub struct ReferenceCache<S> {
    source: S,
    ttl: Duration,
    cached: Option<CachedTables>,
}

impl<S: ReferenceData> ReferenceCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        ReferenceCache {
            source,
            ttl,
            cached: None,
        }
    }

    /// Current tables, fetching them if the snapshot is missing or stale.
    pub fn tables(&mut self) -> EngineResult<&ReferenceTables> {
        self.tables_at(Utc::now())
    }

    pub fn tables_at(&mut self, now: DateTime<Utc>) -> EngineResult<&ReferenceTables> {
        if !self.is_fresh_at(now) {
            self.refresh_at(now)?;
        }
        self.cached
            .as_ref()
            .map(|c| &c.tables)
            .ok_or_else(|| EngineError::lookup("reference tables", "no snapshot after refresh"))
    }

    /// Fetch a new snapshot now, whatever the age of the current one.
    pub fn refresh(&mut self) -> EngineResult<()> {
        self.refresh_at(Utc::now())
    }

    /// A failed or empty fetch keeps the previous snapshot.
    pub fn refresh_at(&mut self, now: DateTime<Utc>) -> EngineResult<()> {
        let tables = self.source.fetch_all().map_err(|e| {
            tracing::warn!(error = %e, "reference data fetch failed");
            match e {
                EngineError::Lookup { .. } => e,
                other => EngineError::lookup("reference tables", other.to_string()),
            }
        })?;

        if let Some(empty) = tables.first_empty() {
            tracing::warn!(table = empty, "reference data fetch returned an empty table");
            return Err(EngineError::lookup(empty, "table is empty"));
        }

        tracing::debug!(
            soil_types = tables.soil_types.len(),
            building_types = tables.building_types.len(),
            iron_bars = tables.iron_bars.len(),
            "reference tables refreshed"
        );
        self.cached = Some(CachedTables {
            tables,
            fetched_at: now,
        });
        Ok(())
    }

    /// Drop the snapshot; the next read fetches again.
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            tracing::debug!("reference tables invalidated");
        }
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        match &self.cached {
            Some(c) => now - c.fetched_at < self.ttl,
            None => false,
        }
    }
}
