//! Measurement channels carried per pixel

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named per-pixel measurement channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanField {
    /// Range in millimeters (20 significant bits)
    #[default]
    Range,
    /// Signal intensity photon count
    Signal,
    /// Calibrated reflectivity
    Reflectivity,
    /// Ambient near-infrared photon count
    NearIr,
}

impl ChanField {
    /// All channels in storage order
    pub const ALL: [ChanField; 4] = [
        ChanField::Range,
        ChanField::Signal,
        ChanField::Reflectivity,
        ChanField::NearIr,
    ];

    /// Storage slot of this channel inside a scan
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ChanField::Range => 0,
            ChanField::Signal => 1,
            ChanField::Reflectivity => 2,
            ChanField::NearIr => 3,
        }
    }

    /// Channel name as used in configuration files
    pub fn as_str(self) -> &'static str {
        match self {
            ChanField::Range => "range",
            ChanField::Signal => "signal",
            ChanField::Reflectivity => "reflectivity",
            ChanField::NearIr => "near_ir",
        }
    }
}

impl fmt::Display for ChanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
