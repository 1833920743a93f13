//! # Ground Bridge Concrete Volume
//!
//! Ground bridges (tie beams between foundations) are boxes:
//! `V = length × width × height` per bridge, total = sum.

use serde::{Deserialize, Serialize};

use crate::calculations::element::{BoxDimensions, RawBoxDimensions};
use crate::validation::Violations;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundBridgesInput {
    pub bridges: Vec<BoxDimensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGroundBridgesInput {
    #[serde(default)]
    pub bridges: Vec<RawBoxDimensions>,
}

impl RawGroundBridgesInput {
    pub fn validate(&self) -> Result<GroundBridgesInput, Vec<String>> {
        let mut v = Violations::new();
        if self.bridges.is_empty() {
            v.push("bridges", "at least one ground bridge is required");
        }
        let bridges: Vec<Option<BoxDimensions>> = self
            .bridges
            .iter()
            .enumerate()
            .map(|(i, raw)| raw.check(&mut v, &format!("bridges[{}]", i)))
            .collect();

        v.finish(
            bridges
                .into_iter()
                .collect::<Option<Vec<_>>>()
                .map(|bridges| GroundBridgesInput { bridges }),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeVolume {
    pub dimensions: BoxDimensions,
    pub volume_m3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundBridgesResult {
    pub bridges: Vec<BridgeVolume>,
    pub total_volume_m3: f64,
}

pub fn calculate(input: &GroundBridgesInput) -> GroundBridgesResult {
    let bridges: Vec<BridgeVolume> = input
        .bridges
        .iter()
        .map(|d| BridgeVolume {
            dimensions: *d,
            volume_m3: d.volume_m3(),
        })
        .collect();
    let total_volume_m3 = bridges.iter().map(|b| b.volume_m3).sum();

    GroundBridgesResult {
        bridges,
        total_volume_m3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_total() {
        let input = GroundBridgesInput {
            bridges: vec![
                BoxDimensions::new(5.0, 0.25, 0.6),
                BoxDimensions::new(4.0, 0.25, 0.6),
            ],
        };
        let result = calculate(&input);
        assert!((result.bridges[0].volume_m3 - 0.75).abs() < 1e-12);
        assert!((result.bridges[1].volume_m3 - 0.6).abs() < 1e-12);
        assert!((result.total_volume_m3 - 1.35).abs() < 1e-12);
    }

    #[test]
    fn test_raw_bridges_from_json() {
        let raw: RawGroundBridgesInput = serde_json::from_str(
            r#"{ "bridges": [ { "length": "6", "width": 0.3, "height": "0.5" } ] }"#,
        )
        .unwrap();
        let input = raw.validate().unwrap();
        assert_eq!(input.bridges[0], BoxDimensions::new(6.0, 0.3, 0.5));
    }

    #[test]
    fn test_bad_bridge_is_rejected() {
        let raw: RawGroundBridgesInput = serde_json::from_str(
            r#"{ "bridges": [ { "length": "6", "width": "", "height": "0.5" } ] }"#,
        )
        .unwrap();
        assert_eq!(
            raw.validate().unwrap_err(),
            vec!["bridges[0].width: is required"]
        );
    }

    #[test]
    fn test_no_bridges() {
        assert!(RawGroundBridgesInput::default().validate().is_err());
    }
}
