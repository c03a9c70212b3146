//! Telemetry types as served by the vehicle backend
//!
//! Two payloads exist:
//! - `GET data` returns a full [`TelemetrySnapshot`], grouped into driver,
//!   sensor and formation sections.
//! - `GET data-interval` returns a [`TelemetryDelta`], an ordered list of
//!   `{id, value, unit}` items for the fast-changing values.
//!
//! Every snapshot field is optional. The backend is not validated; a missing
//! field is rendered as an empty value by the dashboard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete vehicle state pushed on a full refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(default)]
    pub driver: DriverState,
    #[serde(default)]
    pub sensors: SensorState,
    #[serde(default)]
    pub formation: FormationState,
}

/// Driving state of the vehicle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverState {
    /// Current velocity (km/h)
    #[serde(default)]
    pub velocity: Option<f64>,
    /// Steering angle in degrees, positive to the right
    #[serde(default, rename = "angle")]
    pub steering_angle_deg: Option<f64>,
    /// Mode reported by the backend
    #[serde(default)]
    pub mode: Option<ModeValue>,
    #[serde(default)]
    pub is_recording: Option<bool>,
}

/// Mode field as reported by the backend.
///
/// Older backends report a numeric placeholder instead of a mode id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for ModeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeValue::Text(text) => write!(f, "{}", text),
            ModeValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Proximity sensor distances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorState {
    #[serde(default)]
    pub front: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub back: Option<f64>,
}

/// Tracked peer vehicles and spacing metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormationState {
    #[serde(default)]
    pub agents: Vec<AgentInfo>,
    /// Length of the longest agent
    #[serde(default)]
    pub longest: Option<f64>,
    /// Gap kept between agents
    #[serde(default)]
    pub gap: Option<f64>,
}

/// A single peer vehicle in the formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub id: AgentId,
    #[serde(default)]
    pub length: Option<f64>,
}

/// Agent identifier; backends send either integers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::Number(n) => write!(f, "{}", n),
            AgentId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for AgentId {
    fn from(id: i64) -> Self {
        AgentId::Number(id)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        AgentId::Text(id.to_string())
    }
}

/// One changed telemetry field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaItem {
    pub id: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

impl DeltaItem {
    pub fn new(id: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value,
            unit: unit.into(),
        }
    }

    /// Text shown in the bound display, e.g. `42 km/h`
    pub fn display_text(&self) -> String {
        if self.unit.is_empty() {
            format_number(self.value)
        } else {
            format!("{} {}", format_number(self.value), self.unit)
        }
    }
}

/// Incremental telemetry pushed on each poll tick
pub type TelemetryDelta = Vec<DeltaItem>;

/// Format a number the way the display shows it: integral values without a
/// fractional part, everything else with its shortest representation.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Format an optional value, rendering an absent value as an empty string
pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}
