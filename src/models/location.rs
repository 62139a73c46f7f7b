//! Location classification derived from a postal or ZIP code

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad climate region a postal code falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionCategory {
    Canadian,
    NorthernUs,
    SouthernUs,
    /// Nothing recognisable in the code
    OtherUs,
}

/// Setting of the school district
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistrictType {
    Rural,
    Urban,
    Suburban,
}

/// Region and district inferred from a postal code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationClassification {
    pub region: RegionCategory,
    pub district: DistrictType,
}

impl RegionCategory {
    /// Scales closure likelihood by how used to winter the region is
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            RegionCategory::Canadian => 0.7,
            RegionCategory::NorthernUs => 0.8,
            RegionCategory::SouthernUs => 1.4,
            RegionCategory::OtherUs => 1.0,
        }
    }
}

impl DistrictType {
    /// Rural districts close more readily, urban ones less
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            DistrictType::Rural => 1.3,
            DistrictType::Urban => 0.8,
            DistrictType::Suburban => 1.0,
        }
    }

    /// Lowercase identifier used by downstream collaborators
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DistrictType::Rural => "rural",
            DistrictType::Urban => "urban",
            DistrictType::Suburban => "suburban",
        }
    }
}

impl LocationClassification {
    #[must_use]
    pub fn new(region: RegionCategory, district: DistrictType) -> Self {
        Self { region, district }
    }

    /// Combined region and district multiplier
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.region.multiplier() * self.district.multiplier()
    }

    #[must_use]
    pub fn is_canadian(&self) -> bool {
        self.region == RegionCategory::Canadian
    }

    /// Default name for a code when the weather service supplied none
    #[must_use]
    pub fn default_name(&self, postal_code: &str) -> String {
        if self.is_canadian() {
            format!("Canadian Location ({postal_code})")
        } else {
            format!("US Location ({postal_code})")
        }
    }

    /// Display label, e.g. "Boston, US (Urban District)"
    #[must_use]
    pub fn label(&self, name: &str) -> String {
        format!("{name} ({} District)", self.district)
    }
}

impl Default for LocationClassification {
    fn default() -> Self {
        Self::new(RegionCategory::OtherUs, DistrictType::Suburban)
    }
}

impl fmt::Display for RegionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionCategory::Canadian => write!(f, "Canada"),
            RegionCategory::NorthernUs => write!(f, "Northern US"),
            RegionCategory::SouthernUs => write!(f, "Southern US"),
            RegionCategory::OtherUs => write!(f, "Other US"),
        }
    }
}

impl fmt::Display for DistrictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistrictType::Rural => write!(f, "Rural"),
            DistrictType::Urban => write!(f, "Urban"),
            DistrictType::Suburban => write!(f, "Suburban"),
        }
    }
}
