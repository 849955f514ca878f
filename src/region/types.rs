//! Core types for the region subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a division, district, or upazila. Each level has its
/// own id space; ids are unique within a level, not across levels.
pub type RegionId = u32;

/// Top level of the administrative hierarchy (Dhaka, Khulna, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub id: RegionId,
    pub name: String,
}

/// Second level; every district belongs to exactly one division.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    pub id: RegionId,
    pub name: String,
    pub division_id: RegionId,
}

/// Third level; coordinates are optional because not every seed entry
/// carries them. Upazilas without coordinates never win the
/// nearest-neighbor fallback but remain matchable by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upazila {
    pub id: RegionId,
    pub name: String,
    pub district_id: RegionId,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl Upazila {
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Free-text address components sent alongside coordinates. All fields
/// are optional; `state` names a division (the field keeps the name
/// clients already send).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressHints {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub upazila: Option<String>,
}

impl AddressHints {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.district.is_none() && self.upazila.is_none()
    }
}

/// Outcome of a resolution. Any subset of the three ids may be null;
/// a fully null triple means nothing matched, which is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub division_id: Option<RegionId>,
    pub district_id: Option<RegionId>,
    pub upazila_id: Option<RegionId>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.division_id.is_some() && self.district_id.is_some() && self.upazila_id.is_some()
    }
}

/// Region subsystem errors.
#[derive(Debug)]
pub enum RegionError {
    /// Latitude outside [-90, 90] or not a finite number.
    InvalidLatitude(f64),
    /// Longitude outside [-180, 180] or not a finite number.
    InvalidLongitude(f64),
    Io(String),
    Parse(String),
    /// A seed row references a parent id that does not exist, or an id
    /// appears twice within a level.
    Inconsistent(String),
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLatitude(v) => {
                write!(f, "Invalid latitude {}: must be a finite number in [-90, 90]", v)
            }
            Self::InvalidLongitude(v) => {
                write!(f, "Invalid longitude {}: must be a finite number in [-180, 180]", v)
            }
            Self::Io(msg) => write!(f, "Failed to read region data: {}", msg),
            Self::Parse(msg) => write!(f, "Failed to parse region data: {}", msg),
            Self::Inconsistent(msg) => write!(f, "Inconsistent region data: {}", msg),
        }
    }
}

impl std::error::Error for RegionError {}
