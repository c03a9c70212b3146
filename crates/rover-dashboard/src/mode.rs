//! Exclusive drive-mode selection
//!
//! One state value (`Option<Mode>`) plus a lookup table from each mode to the
//! affordances it lights up. Selecting a mode switches every other mode off;
//! selecting the active mode again leaves all modes off.

use rover_core::{Command, Mode};
use tracing::{info, warn};

use crate::elements::ACTIVE;
use crate::network::RequestClient;
use crate::surface::Surface;

/// Static presentation of a mode
#[derive(Debug, Clone, Copy)]
pub struct ModeBinding {
    pub mode: Mode,
    /// Card button that starts the mode
    pub button: &'static str,
    /// Progress indicator lit while the mode runs
    pub progress: &'static str,
    /// Notice shown when the mode is activated
    pub hint: Option<(&'static str, &'static str)>,
}

pub static MODE_BINDINGS: [ModeBinding; 4] = [
    ModeBinding {
        mode: Mode::Manual,
        button: "mode-manual",
        progress: "progress-manual",
        hint: Some(("Tip", "Use the W, A, S and D keys to drive the vehicle.")),
    },
    ModeBinding {
        mode: Mode::FollowRoad,
        button: "mode-follow-road",
        progress: "progress-follow-road",
        hint: None,
    },
    ModeBinding {
        mode: Mode::ParkingSearch,
        button: "mode-parking-search",
        progress: "progress-parking-search",
        hint: None,
    },
    ModeBinding {
        mode: Mode::ParkingStandby,
        button: "mode-parking-standby",
        progress: "progress-parking-standby",
        hint: None,
    },
];

pub fn binding(mode: Mode) -> Option<&'static ModeBinding> {
    MODE_BINDINGS.iter().find(|b| b.mode == mode)
}

/// Outcome of a mode button click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub previous: Option<Mode>,
    pub active: Option<Mode>,
}

#[derive(Debug, Default)]
pub struct ModeController {
    active: Option<Mode>,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<Mode> {
        self.active
    }

    pub fn is_manual(&self) -> bool {
        self.active.map(|m| m.is_manual()).unwrap_or(false)
    }

    /// Handle a click on the button of `mode`
    pub fn select(
        &mut self,
        mode: Mode,
        surface: &mut dyn Surface,
        client: &dyn RequestClient,
    ) -> ModeChange {
        let previous = self.active;
        clear_affordances(surface);

        if previous == Some(mode) {
            self.active = None;
        } else {
            match binding(mode) {
                Some(binding) => {
                    surface.set_class(binding.button, ACTIVE, true);
                    surface.set_class(binding.progress, ACTIVE, true);
                }
                None => warn!(mode = %mode, "Mode has no button binding"),
            }
            self.active = Some(mode);
        }

        client.send(Command::ChangeMode(self.active));
        info!(previous = ?previous, active = ?self.active, "Mode changed");

        ModeChange {
            previous,
            active: self.active,
        }
    }

    /// Drop the active mode after an emergency stop.
    ///
    /// Only local state changes; the backend already stopped on its own endpoint.
    pub fn force_deactivate(&mut self, surface: &mut dyn Surface) -> Option<Mode> {
        let previous = self.active.take();
        if previous.is_some() {
            clear_affordances(surface);
            info!(previous = ?previous, "Mode forcibly deactivated");
        }
        previous
    }
}

fn clear_affordances(surface: &mut dyn Surface) {
    for binding in MODE_BINDINGS.iter() {
        surface.set_class(binding.button, ACTIVE, false);
        surface.set_class(binding.progress, ACTIVE, false);
    }
}
