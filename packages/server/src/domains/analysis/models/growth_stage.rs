use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plant growth stage the grower is optimizing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Seedling,
    Vegetation,
    Flowering,
}

/// Target environment for one stage. Fixed domain constants, quoted into the
/// system prompt as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTargets {
    pub vpd: &'static str,
    pub temperature: &'static str,
    pub humidity: &'static str,
}

impl fmt::Display for StageTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VPD: {}, temp: {}, humidity: {}",
            self.vpd, self.temperature, self.humidity
        )
    }
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 3] = [
        GrowthStage::Seedling,
        GrowthStage::Vegetation,
        GrowthStage::Flowering,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Seedling => "seedling",
            GrowthStage::Vegetation => "vegetation",
            GrowthStage::Flowering => "flowering",
        }
    }

    /// Human-facing label for the upload form.
    pub fn label(&self) -> &'static str {
        match self {
            GrowthStage::Seedling => "Seedling",
            GrowthStage::Vegetation => "Vegetation",
            GrowthStage::Flowering => "Flowering",
        }
    }

    pub fn targets(&self) -> StageTargets {
        match self {
            GrowthStage::Seedling => StageTargets {
                vpd: "0.4-0.8 kPa",
                temperature: "68-77 degrees F",
                humidity: "70-80%",
            },
            GrowthStage::Vegetation => StageTargets {
                vpd: "0.8-1.2 kPa",
                temperature: "72-82 degrees F",
                humidity: "55-70%",
            },
            GrowthStage::Flowering => StageTargets {
                vpd: "1.2-1.6 kPa",
                temperature: "68-79 degrees F",
                humidity: "40-50%",
            },
        }
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown growth stage `{0}` (expected seedling, vegetation or flowering)")]
pub struct UnknownGrowthStage(pub String);

impl FromStr for GrowthStage {
    type Err = UnknownGrowthStage;

    /// Accepts the form values; surrounding whitespace and case are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seedling" => Ok(GrowthStage::Seedling),
            "vegetation" => Ok(GrowthStage::Vegetation),
            "flowering" => Ok(GrowthStage::Flowering),
            _ => Err(UnknownGrowthStage(s.to_string())),
        }
    }
}
