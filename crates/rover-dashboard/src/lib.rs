//! Rover Dashboard
//!
//! Telemetry display and control panel for a small autonomous vehicle. All
//! rendering goes through the [`Surface`] trait, all backend traffic through
//! [`RequestClient`], so the whole panel runs headless in tests and in the
//! operator console.

pub mod app;
pub mod config;
pub mod elements;
pub mod input;
pub mod mode;
pub mod navigation;
pub mod network;
pub mod notice;
pub mod poll;
pub mod storage;
pub mod surface;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::{Action, Dashboard, DashboardStatus, UiEvent};
pub use config::{load_config, save_default_config, Config};
pub use input::InputController;
pub use mode::{ModeBinding, ModeController, MODE_BINDINGS};
pub use navigation::{NavigationController, ACTIVE_ELEMENT_STORAGE_KEY};
pub use network::{ClientError, Continuation, HttpClient, RequestClient};
pub use notice::NoticeBoard;
pub use poll::{PollLoop, Response, DELTA_PATH, SNAPSHOT_PATH};
pub use storage::{JsonFileStorage, MemoryStorage, Storage, StorageError};
pub use surface::{MemorySurface, Mutation, Surface};
pub use view::TelemetryView;
