//! Commands accepted by the vehicle backend
//!
//! Every command is a POST to a path relative to the backend base URL. The
//! body is an empty JSON object except for `change-mode`, which carries the
//! requested mode (or `null` to leave the current mode).

use serde_json::{json, Value};

use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartRecording,
    StopRecording,
    EmergencyStop,
    AccelerateForward,
    AccelerateBackward,
    SteerLeft,
    SteerRight,
    ChangeMode(Option<Mode>),
}

impl Command {
    /// Relative path of the endpoint
    pub fn path(&self) -> &'static str {
        match self {
            Command::StartRecording => "start-recording",
            Command::StopRecording => "stop-recording",
            Command::EmergencyStop => "emergency-stop",
            Command::AccelerateForward => "accelerate-forward",
            Command::AccelerateBackward => "accelerate-backward",
            Command::SteerLeft => "steer-left",
            Command::SteerRight => "steer-right",
            Command::ChangeMode(_) => "change-mode",
        }
    }

    /// JSON body sent with the command
    pub fn payload(&self) -> Value {
        match self {
            Command::ChangeMode(mode) => json!({ "mode": mode.map(|m| m.wire_id()) }),
            _ => json!({}),
        }
    }
}
