//! # Concrete Aggregation
//!
//! Combines the volumes of several concrete tabs into one order:
//!
//! - `total = Σ tab volumes`
//! - `trucks = ceil(total / 0.5)` (0.5 m³ per truck)
//! - `bags = ceil(total × 7.5)`
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::calculations::aggregate::{aggregate, TabVolume};
//!
//! let result = aggregate(vec![
//!     TabVolume::new("column-base", 1.0),
//!     TabVolume::new("ground-slab", 18.0),
//! ]);
//! assert!((result.total_volume_m3 - 19.0).abs() < 1e-9);
//! assert_eq!(result.trucks_needed, 38);
//! assert_eq!(result.bags_approx, 143);
//! ```

use serde::{Deserialize, Serialize};

/// Ready-mix truck capacity (m³)
pub const TRUCK_CAPACITY_M3: f64 = 0.5;

/// Cement bags per cubic meter of concrete
pub const BAGS_PER_M3: f64 = 7.5;

/// One labelled contribution to the total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabVolume {
    pub label: String,
    pub volume_m3: f64,
}

impl TabVolume {
    pub fn new(label: impl Into<String>, volume_m3: f64) -> Self {
        TabVolume {
            label: label.into(),
            volume_m3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub tabs: Vec<TabVolume>,
    pub total_volume_m3: f64,
    pub trucks_needed: u64,
    pub bags_approx: u64,
}

pub fn aggregate_volume(tabs: &[TabVolume]) -> f64 {
    tabs.iter().map(|t| t.volume_m3).sum()
}

pub fn trucks_needed(total_volume_m3: f64) -> u64 {
    (total_volume_m3 / TRUCK_CAPACITY_M3).ceil() as u64
}

pub fn bags_approx(total_volume_m3: f64) -> u64 {
    (total_volume_m3 * BAGS_PER_M3).ceil() as u64
}

pub fn aggregate(tabs: Vec<TabVolume>) -> AggregateResult {
    let total_volume_m3 = aggregate_volume(&tabs);
    AggregateResult {
        tabs,
        total_volume_m3,
        trucks_needed: trucks_needed(total_volume_m3),
        bags_approx: bags_approx(total_volume_m3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truck_boundaries() {
        assert_eq!(trucks_needed(0.5), 1);
        assert_eq!(trucks_needed(0.50001), 2);
        assert_eq!(trucks_needed(0.0), 0);
        assert_eq!(trucks_needed(3.2), 7);
    }

    #[test]
    fn test_bags() {
        assert_eq!(bags_approx(0.0), 0);
        assert_eq!(bags_approx(1.0), 8);
        assert_eq!(bags_approx(2.0), 15);
    }

    #[test]
    fn test_empty_aggregate() {
        let result = aggregate(Vec::new());
        assert_eq!(result.total_volume_m3, 0.0);
        assert_eq!(result.trucks_needed, 0);
        assert_eq!(result.bags_approx, 0);
    }

    #[test]
    fn test_total_is_sum_of_tabs() {
        let tabs = vec![
            TabVolume::new("column-base", 0.75),
            TabVolume::new("ground-beams", 3.0),
            TabVolume::new("ground-slab", 18.0),
            TabVolume::new("roof", 24.0),
            TabVolume::new("columns", 2.16),
            TabVolume::new("foundation-base", 12.6),
        ];
        let expected: f64 = tabs.iter().map(|t| t.volume_m3).sum();
        let result = aggregate(tabs);
        assert!((result.total_volume_m3 - expected).abs() < 1e-12);
        assert_eq!(result.tabs.len(), 6);
    }
}
