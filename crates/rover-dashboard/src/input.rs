//! Keyboard and button bindings of the control panel

use rover_core::{Command, Mode};
use tracing::{debug, info};

use crate::elements::{self, ACTIVE, NO_DISPLAY};
use crate::network::RequestClient;
use crate::surface::Surface;

const FORWARD_KEYS: [&str; 4] = ["w", "W", "8", "ArrowUp"];
const BACKWARD_KEYS: [&str; 4] = ["s", "S", "2", "ArrowDown"];
const LEFT_KEYS: [&str; 4] = ["a", "A", "4", "ArrowLeft"];
const RIGHT_KEYS: [&str; 4] = ["d", "D", "6", "ArrowRight"];

/// Driving commands bound to a key, at most one per axis
pub fn drive_commands(key: &str) -> Vec<Command> {
    let mut commands = Vec::with_capacity(2);

    if FORWARD_KEYS.contains(&key) {
        commands.push(Command::AccelerateForward);
    } else if BACKWARD_KEYS.contains(&key) {
        commands.push(Command::AccelerateBackward);
    }

    if LEFT_KEYS.contains(&key) {
        commands.push(Command::SteerLeft);
    } else if RIGHT_KEYS.contains(&key) {
        commands.push(Command::SteerRight);
    }

    commands
}

/// Recording and fullscreen toggles plus manual driving.
///
/// Both toggles mirror what the dashboard last asked for. Snapshots may
/// resync recording, but only if no recording command was sent since the
/// snapshot was requested (see [`InputController::recording_generation`]).
#[derive(Debug, Default)]
pub struct InputController {
    recording: bool,
    recording_generation: u64,
    fullscreen: bool,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Bumped by every locally issued recording change
    pub fn recording_generation(&self) -> u64 {
        self.recording_generation
    }

    /// Draw the initial state of the recording and fullscreen affordances
    pub fn render(&self, surface: &mut dyn Surface) {
        self.render_recording(surface);
        self.render_fullscreen(surface);
    }

    /// Handle a keydown; commands are only sent while manual driving is active
    pub fn key_down(
        &self,
        key: &str,
        active_mode: Option<Mode>,
        client: &dyn RequestClient,
    ) -> Vec<Command> {
        if active_mode != Some(Mode::Manual) {
            return Vec::new();
        }

        let commands = drive_commands(key);
        for command in &commands {
            client.send(*command);
        }
        commands
    }

    pub fn emergency_stop(&mut self, surface: &mut dyn Surface, client: &dyn RequestClient) {
        client.send(Command::EmergencyStop);
        // The backend stops recording as part of the emergency stop
        self.recording = false;
        self.recording_generation += 1;
        self.render_recording(surface);
        info!("Emergency stop sent");
    }

    /// Flip recording and notify the backend; returns the new state
    pub fn toggle_recording(&mut self, surface: &mut dyn Surface, client: &dyn RequestClient) -> bool {
        self.recording = !self.recording;
        self.recording_generation += 1;
        if self.recording {
            client.send(Command::StartRecording);
        } else {
            client.send(Command::StopRecording);
        }
        self.render_recording(surface);
        info!(recording = self.recording, "Recording toggled");
        self.recording
    }

    /// Adopt the recording state reported by the backend.
    ///
    /// `generation` is the recording generation at the time the report was
    /// requested; reports older than the last local change are ignored.
    /// Returns whether the report was adopted.
    pub fn sync_recording(
        &mut self,
        recording: bool,
        generation: u64,
        surface: &mut dyn Surface,
    ) -> bool {
        if generation != self.recording_generation {
            debug!(
                generation,
                current = self.recording_generation,
                "Ignoring outdated recording state"
            );
            return false;
        }
        if self.recording != recording {
            self.recording = recording;
            self.render_recording(surface);
        }
        true
    }

    /// Flip fullscreen presentation; returns the new state
    pub fn toggle_fullscreen(&mut self, surface: &mut dyn Surface) -> bool {
        self.fullscreen = !self.fullscreen;
        surface.set_fullscreen(self.fullscreen);
        self.render_fullscreen(surface);
        self.fullscreen
    }

    /// Host notification that fullscreen was entered or left by other means
    pub fn fullscreen_changed(&mut self, fullscreen: bool, surface: &mut dyn Surface) {
        if self.fullscreen != fullscreen {
            self.fullscreen = fullscreen;
            self.render_fullscreen(surface);
        }
    }

    fn render_recording(&self, surface: &mut dyn Surface) {
        surface.set_class(elements::BTN_START_RECORDING, NO_DISPLAY, self.recording);
        surface.set_class(elements::BTN_STOP_RECORDING, NO_DISPLAY, !self.recording);
        surface.set_class(elements::BTN_STOP_RECORDING, ACTIVE, self.recording);
    }

    fn render_fullscreen(&self, surface: &mut dyn Surface) {
        let icon = if self.fullscreen { "fullscreen_exit" } else { "fullscreen" };
        surface.set_text(elements::BTN_FULLSCREEN_ICON, icon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use crate::testing::RecordingClient;

    #[test]
    fn test_drive_commands() {
        assert_eq!(drive_commands("w"), vec![Command::AccelerateForward]);
        assert_eq!(drive_commands("ArrowDown"), vec![Command::AccelerateBackward]);
        assert_eq!(drive_commands("4"), vec![Command::SteerLeft]);
        assert_eq!(drive_commands("D"), vec![Command::SteerRight]);
        assert!(drive_commands("q").is_empty());
        assert!(drive_commands("Enter").is_empty());
    }

    #[test]
    fn test_keys_only_in_manual_mode() {
        let client = RecordingClient::new();
        let input = InputController::new();

        assert!(input.key_down("w", Some(Mode::FollowRoad), &client).is_empty());
        assert!(input.key_down("w", None, &client).is_empty());
        assert!(client.posts().is_empty());

        let sent = input.key_down("w", Some(Mode::Manual), &client);
        assert_eq!(sent, vec![Command::AccelerateForward]);
        input.key_down("ArrowLeft", Some(Mode::Manual), &client);
        input.key_down("ArrowLeft", Some(Mode::Manual), &client);
        assert_eq!(
            client.post_paths(),
            vec!["accelerate-forward", "steer-left", "steer-left"]
        );
    }

    #[test]
    fn test_recording_toggle_swaps_affordances() {
        let mut surface = MemorySurface::new();
        let client = RecordingClient::new();
        let mut input = InputController::new();
        input.render(&mut surface);
        assert!(surface.has_class(elements::BTN_STOP_RECORDING, NO_DISPLAY));
        assert!(!surface.has_class(elements::BTN_START_RECORDING, NO_DISPLAY));

        assert!(input.toggle_recording(&mut surface, &client));
        assert!(surface.has_class(elements::BTN_START_RECORDING, NO_DISPLAY));
        assert!(!surface.has_class(elements::BTN_STOP_RECORDING, NO_DISPLAY));
        assert!(surface.has_class(elements::BTN_STOP_RECORDING, ACTIVE));

        assert!(!input.toggle_recording(&mut surface, &client));
        assert!(!surface.has_class(elements::BTN_START_RECORDING, NO_DISPLAY));
        assert_eq!(client.post_paths(), vec!["start-recording", "stop-recording"]);
    }

    #[test]
    fn test_emergency_stop_resets_recording() {
        let mut surface = MemorySurface::new();
        let client = RecordingClient::new();
        let mut input = InputController::new();

        input.toggle_recording(&mut surface, &client);
        input.emergency_stop(&mut surface, &client);

        assert!(!input.is_recording());
        assert!(surface.has_class(elements::BTN_STOP_RECORDING, NO_DISPLAY));
        assert_eq!(client.post_paths(), vec!["start-recording", "emergency-stop"]);
    }

    #[test]
    fn test_sync_recording_from_backend() {
        let mut surface = MemorySurface::new();
        let mut input = InputController::new();

        assert!(input.sync_recording(true, 0, &mut surface));
        assert!(input.is_recording());
        assert!(surface.has_class(elements::BTN_START_RECORDING, NO_DISPLAY));

        surface.take_mutations();
        input.sync_recording(true, 0, &mut surface);
        assert!(surface.mutations().is_empty());
    }

    #[test]
    fn test_sync_recording_ignores_reports_older_than_toggle() {
        let mut surface = MemorySurface::new();
        let client = RecordingClient::new();
        let mut input = InputController::new();

        let requested_at = input.recording_generation();
        input.toggle_recording(&mut surface, &client);
        assert!(!input.sync_recording(false, requested_at, &mut surface));
        assert!(input.is_recording());

        input.emergency_stop(&mut surface, &client);
        let current = input.recording_generation();
        assert_eq!(current, requested_at + 2);
        assert!(input.sync_recording(true, current, &mut surface));
        assert!(input.is_recording());
    }

    #[test]
    fn test_fullscreen_toggle_and_resync() {
        let mut surface = MemorySurface::new();
        let mut input = InputController::new();

        assert!(input.toggle_fullscreen(&mut surface));
        assert!(surface.is_fullscreen());
        assert_eq!(surface.text(elements::BTN_FULLSCREEN_ICON), "fullscreen_exit");

        // Left with the escape key, not the button
        input.fullscreen_changed(false, &mut surface);
        assert!(!input.is_fullscreen());
        assert_eq!(surface.text(elements::BTN_FULLSCREEN_ICON), "fullscreen");

        assert!(input.toggle_fullscreen(&mut surface));
    }
}
