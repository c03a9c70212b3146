//! Periodic telemetry polling
//!
//! Two streams are polled: the fast delta (`data-interval`) and the full
//! snapshot (`data`). Requests overlap freely, so every request carries a
//! sequence number and a response is only applied if it is newer than the
//! last one applied on the same stream. Late answers to old requests are
//! dropped instead of overwriting fresher values.

use rover_core::{DeltaItem, TelemetryDelta, TelemetrySnapshot};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::elements::{self, rotate};
use crate::network::RequestClient;
use crate::surface::Surface;

pub const DELTA_PATH: &str = "data-interval";
pub const SNAPSHOT_PATH: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Delta,
    Snapshot,
}

/// Decoded poll answer waiting to be applied on the UI task
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Delta { seq: u64, items: TelemetryDelta },
    Snapshot {
        seq: u64,
        /// Recording generation when the request was issued
        recording_generation: u64,
        snapshot: TelemetrySnapshot,
    },
}

/// Where a delta item is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTarget {
    /// Element receiving `"<value> <unit>"`
    pub text: &'static str,
    /// Element rotated by the value in degrees
    pub rotate: Option<&'static str>,
}

static DISPLAY_TARGETS: [(&str, DisplayTarget); 5] = [
    ("velocity", DisplayTarget { text: elements::VELOCITY, rotate: None }),
    (
        "steering-angle",
        DisplayTarget {
            text: elements::STEERING_ANGLE,
            rotate: Some(elements::CAR_CONTAINER),
        },
    ),
    ("distance-front", DisplayTarget { text: elements::DISTANCE_TOP, rotate: None }),
    ("distance-right", DisplayTarget { text: elements::DISTANCE_RIGHT, rotate: None }),
    ("distance-back", DisplayTarget { text: elements::DISTANCE_BOTTOM, rotate: None }),
];

/// Look up the display target of a delta item id
pub fn display_target(id: &str) -> Option<DisplayTarget> {
    DISPLAY_TARGETS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, target)| *target)
}

/// Write delta items to their displays; returns how many were routed
pub fn apply_delta(items: &[DeltaItem], surface: &mut dyn Surface) -> usize {
    let mut routed = 0;
    for item in items {
        let Some(target) = display_target(&item.id) else {
            debug!(id = %item.id, "Skipping unknown telemetry item");
            continue;
        };

        if let Some(rotated) = target.rotate {
            surface.set_style(rotated, "transform", &rotate(item.value));
        }
        surface.set_text(target.text, &item.display_text());
        routed += 1;
    }
    routed
}

#[derive(Debug, Default)]
struct Sequencer {
    issued: u64,
    applied: Option<u64>,
}

impl Sequencer {
    fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn accept(&mut self, seq: u64) -> bool {
        match self.applied {
            Some(applied) if applied >= seq => false,
            _ => {
                self.applied = Some(seq);
                true
            }
        }
    }
}

/// Issues poll requests and orders their answers
#[derive(Debug)]
pub struct PollLoop {
    responses: UnboundedSender<Response>,
    delta: Sequencer,
    snapshot: Sequencer,
}

impl PollLoop {
    pub fn new(responses: UnboundedSender<Response>) -> Self {
        Self {
            responses,
            delta: Sequencer::default(),
            snapshot: Sequencer::default(),
        }
    }

    /// Fetch the telemetry delta
    pub fn request_delta(&mut self, client: &dyn RequestClient) -> u64 {
        let seq = self.delta.next();
        let responses = self.responses.clone();
        client.get(
            DELTA_PATH,
            Box::new(move |body| {
                if let Some(items) = decode_delta(body) {
                    let _ = responses.send(Response::Delta { seq, items });
                }
            }),
        );
        seq
    }

    /// Fetch the full snapshot, tagged with the caller's recording generation
    pub fn request_snapshot(
        &mut self,
        client: &dyn RequestClient,
        recording_generation: u64,
    ) -> u64 {
        let seq = self.snapshot.next();
        let responses = self.responses.clone();
        client.get(
            SNAPSHOT_PATH,
            Box::new(move |body| {
                if let Some(snapshot) = decode::<TelemetrySnapshot>(SNAPSHOT_PATH, body) {
                    let _ = responses.send(Response::Snapshot {
                        seq,
                        recording_generation,
                        snapshot,
                    });
                }
            }),
        );
        seq
    }

    /// Whether an answer is fresh enough to apply; marks it applied if so
    pub fn accept(&mut self, stream: Stream, seq: u64) -> bool {
        let fresh = match stream {
            Stream::Delta => self.delta.accept(seq),
            Stream::Snapshot => self.snapshot.accept(seq),
        };
        if !fresh {
            debug!(stream = ?stream, seq, "Dropping stale poll response");
        }
        fresh
    }
}

/// Decode a delta item by item; malformed items are skipped, not the whole delta
fn decode_delta(body: Value) -> Option<TelemetryDelta> {
    let raw = decode::<Vec<Value>>(DELTA_PATH, body)?;
    let items = raw
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<DeltaItem>(item) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(error = %e, "Skipping malformed telemetry item");
                None
            }
        })
        .collect();
    Some(items)
}

fn decode<T: DeserializeOwned>(path: &str, body: Value) -> Option<T> {
    match serde_json::from_value(body) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(path = %path, error = %e, "Ignoring malformed poll response");
            None
        }
    }
}
