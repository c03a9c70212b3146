//! Dashboard application state and event loop

use chrono::{DateTime, Utc};
use rover_core::{Mode, ParseNameError, Route};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::{Config, PollConfig};
use crate::elements;
use crate::input::InputController;
use crate::mode::{binding, ModeController};
use crate::navigation::NavigationController;
use crate::network::RequestClient;
use crate::notice::NoticeBoard;
use crate::poll::{apply_delta, PollLoop, Response, Stream};
use crate::storage::Storage;
use crate::surface::Surface;
use crate::view::TelemetryView;

/// How often notices are checked for expiry
const NOTICE_TICK: Duration = Duration::from_millis(250);

/// Operator action, addressable by a stable name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectMode(Mode),
    Navigate(Route),
    EmergencyStop,
    ToggleRecording,
    ToggleFullscreen,
    DismissNotice(u64),
}

impl Action {
    pub const NAMES: [&'static str; 6] = [
        "select-mode",
        "navigate",
        "emergency-stop",
        "toggle-recording",
        "toggle-fullscreen",
        "dismiss-notice",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectMode(_) => "select-mode",
            Action::Navigate(_) => "navigate",
            Action::EmergencyStop => "emergency-stop",
            Action::ToggleRecording => "toggle-recording",
            Action::ToggleFullscreen => "toggle-fullscreen",
            Action::DismissNotice(_) => "dismiss-notice",
        }
    }

    /// Build an action from its name and optional argument
    pub fn parse(name: &str, arg: Option<&str>) -> Result<Self, ParseNameError> {
        let arg = arg.unwrap_or("");
        match name {
            "select-mode" => Ok(Action::SelectMode(arg.parse()?)),
            "navigate" => Ok(Action::Navigate(arg.parse()?)),
            "emergency-stop" => Ok(Action::EmergencyStop),
            "toggle-recording" => Ok(Action::ToggleRecording),
            "toggle-fullscreen" => Ok(Action::ToggleFullscreen),
            "dismiss-notice" => arg
                .parse()
                .map(Action::DismissNotice)
                .map_err(|_| ParseNameError::new("notice", arg)),
            _ => Err(ParseNameError::new("action", name)),
        }
    }
}

/// Input from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A keydown with its key name (`w`, `ArrowUp`, ...)
    KeyDown(String),
    Action(Action),
    /// Fullscreen entered or left outside the dashboard
    FullscreenChanged(bool),
}

/// Summary of the control panel state
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStatus {
    pub mode: Option<Mode>,
    pub route: Route,
    pub recording: bool,
    pub fullscreen: bool,
    pub agents: usize,
    pub last_snapshot_at: Option<DateTime<Utc>>,
}

/// The dashboard: owns the surface, the request client and every controller.
///
/// All mutation happens through `&mut self`, from one task.
pub struct Dashboard<S: Surface, K: Storage> {
    surface: S,
    client: Arc<dyn RequestClient>,
    view: TelemetryView,
    modes: ModeController,
    input: InputController,
    navigation: NavigationController<K>,
    notices: NoticeBoard,
    poll: PollLoop,
    responses: UnboundedReceiver<Response>,
    poll_config: PollConfig,
    last_snapshot_at: Option<DateTime<Utc>>,
}

impl<S: Surface, K: Storage> Dashboard<S, K> {
    pub fn new(config: &Config, mut surface: S, client: Arc<dyn RequestClient>, storage: K) -> Self {
        let (tx, responses) = mpsc::unbounded_channel();
        let navigation = NavigationController::new(storage, &mut surface);
        let input = InputController::new();
        input.render(&mut surface);

        Self {
            surface,
            client,
            view: TelemetryView::new(&config.display),
            modes: ModeController::new(),
            input,
            navigation,
            notices: NoticeBoard::new(Duration::from_secs(config.display.notice_secs)),
            poll: PollLoop::new(tx),
            responses,
            poll_config: config.poll.clone(),
            last_snapshot_at: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn view(&self) -> &TelemetryView {
        &self.view
    }

    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            mode: self.modes.active(),
            route: self.navigation.active(),
            recording: self.input.is_recording(),
            fullscreen: self.input.is_fullscreen(),
            agents: self.view.outlines().len(),
            last_snapshot_at: self.last_snapshot_at,
        }
    }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::KeyDown(key) => {
                let sent = self
                    .input
                    .key_down(&key, self.modes.active(), self.client.as_ref());
                if !sent.is_empty() {
                    debug!(key = %key, commands = ?sent, "Drive commands sent");
                }
            }
            UiEvent::Action(action) => self.dispatch(action),
            UiEvent::FullscreenChanged(fullscreen) => {
                self.input.fullscreen_changed(fullscreen, &mut self.surface)
            }
        }
    }

    fn dispatch(&mut self, action: Action) {
        debug!(action = action.name(), "Dispatching action");
        let client = self.client.as_ref();

        match action {
            Action::SelectMode(mode) => {
                let change = self.modes.select(mode, &mut self.surface, client);
                if let Some((title, body)) = change.active.and_then(binding).and_then(|b| b.hint) {
                    self.notices.show(title, body, Instant::now(), &mut self.surface);
                }
            }
            Action::Navigate(route) => {
                self.navigation.toggle(route, &mut self.surface);
                info!(route = %route, "Navigated");
            }
            Action::EmergencyStop => {
                self.input.emergency_stop(&mut self.surface, client);
                self.modes.force_deactivate(&mut self.surface);
            }
            Action::ToggleRecording => {
                self.input.toggle_recording(&mut self.surface, client);
            }
            Action::ToggleFullscreen => {
                self.input.toggle_fullscreen(&mut self.surface);
            }
            Action::DismissNotice(id) => {
                self.notices.dismiss(id, Instant::now(), &mut self.surface);
            }
        }
    }

    /// Issue one telemetry delta poll
    pub fn poll_delta(&mut self) {
        self.poll.request_delta(self.client.as_ref());
    }

    /// Issue one full snapshot refresh
    pub fn refresh_snapshot(&mut self) {
        self.poll
            .request_snapshot(self.client.as_ref(), self.input.recording_generation());
    }

    /// Apply every response that arrived so far; returns how many were applied
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(response) = self.responses.try_recv() {
            if self.apply_response(response) {
                applied += 1;
            }
        }
        applied
    }

    pub fn expire_notices(&mut self, now: Instant) {
        self.notices.expire(now, &mut self.surface);
    }

    fn apply_response(&mut self, response: Response) -> bool {
        match response {
            Response::Delta { seq, items } => {
                if !self.poll.accept(Stream::Delta, seq) {
                    return false;
                }
                apply_delta(&items, &mut self.surface);
            }
            Response::Snapshot {
                seq,
                recording_generation,
                snapshot,
            } => {
                if !self.poll.accept(Stream::Snapshot, seq) {
                    return false;
                }
                self.view.update(&snapshot, &mut self.surface);
                if let Some(recording) = snapshot.driver.is_recording {
                    self.input
                        .sync_recording(recording, recording_generation, &mut self.surface);
                }
                let now = Utc::now();
                self.surface
                    .set_text(elements::LAST_UPDATE, &now.format("%H:%M:%S").to_string());
                self.last_snapshot_at = Some(now);
            }
        }
        true
    }

    /// Drive polling, operator events and notices until `events` closes
    pub async fn run(&mut self, mut events: mpsc::Receiver<UiEvent>) {
        let mut delta_tick = tokio::time::interval(self.poll_config.delta_interval());
        let mut snapshot_tick = tokio::time::interval(self.poll_config.snapshot_interval());
        let mut notice_tick = tokio::time::interval(NOTICE_TICK);
        for tick in [&mut delta_tick, &mut snapshot_tick, &mut notice_tick] {
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        }

        info!(
            delta_ms = self.poll_config.delta_interval_ms,
            snapshot_ms = self.poll_config.snapshot_interval_ms,
            "Dashboard running"
        );

        loop {
            tokio::select! {
                _ = delta_tick.tick() => self.poll_delta(),
                _ = snapshot_tick.tick() => self.refresh_snapshot(),
                _ = notice_tick.tick() => self.expire_notices(Instant::now()),
                Some(response) = self.responses.recv() => {
                    self.apply_response(response);
                }
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
            }
        }

        info!("Dashboard stopped");
    }
}
