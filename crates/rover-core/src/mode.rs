//! Exclusive operating modes of the vehicle

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseNameError;

/// Operating mode selectable from the control panel.
///
/// At most one mode is active at a time; "no mode" is `Option::<Mode>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Keyboard driving by the operator
    #[serde(rename = "drive/manual")]
    Manual,
    /// Autonomous road following
    #[serde(rename = "drive/follow-road")]
    FollowRoad,
    /// Searching for a free parking lot
    #[serde(rename = "parking/search")]
    ParkingSearch,
    /// Parked, waiting for the formation
    #[serde(rename = "parking/standby")]
    ParkingStandby,
}

impl Mode {
    /// All modes in control panel order
    pub const ALL: [Mode; 4] = [
        Mode::Manual,
        Mode::FollowRoad,
        Mode::ParkingSearch,
        Mode::ParkingStandby,
    ];

    /// Identifier sent to the backend in `change-mode`
    pub fn wire_id(&self) -> &'static str {
        match self {
            Mode::Manual => "drive/manual",
            Mode::FollowRoad => "drive/follow-road",
            Mode::ParkingSearch => "parking/search",
            Mode::ParkingStandby => "parking/standby",
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Mode::Manual)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

impl FromStr for Mode {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.wire_id() == s)
            .ok_or_else(|| ParseNameError::new("mode", s))
    }
}
