//! Rover Core - Wire types shared by the rover dashboard
//!
//! This crate provides the vocabulary the dashboard speaks with the vehicle backend:
//! - Telemetry snapshots and per-tick telemetry deltas
//! - The exclusive drive modes and their wire identifiers
//! - Backend commands with their relative paths and JSON bodies
//! - Navigation routes of the detail panels

pub mod command;
pub mod mode;
pub mod route;
pub mod telemetry;

use thiserror::Error;

pub use command::Command;
pub use mode::Mode;
pub use route::Route;
pub use telemetry::{
    AgentId, AgentInfo, DeltaItem, DriverState, FormationState, ModeValue, SensorState,
    TelemetryDelta, TelemetrySnapshot,
};

/// Error returned when a textual name does not match any known variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {name}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub name: String,
}

impl ParseNameError {
    pub fn new(kind: &'static str, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}
