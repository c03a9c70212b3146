//! Surface that traces every write before keeping it in memory

use rover_dashboard::elements;
use rover_dashboard::{MemorySurface, Surface};
use tracing::{debug, info, trace};

/// Telemetry readouts logged at debug level; everything else is trace
const READOUTS: [&str; 7] = [
    elements::VELOCITY,
    elements::STEERING_ANGLE,
    elements::DISTANCE_TOP,
    elements::DISTANCE_RIGHT,
    elements::DISTANCE_BOTTOM,
    elements::SPEEDOMETER,
    elements::LAST_UPDATE,
];

#[derive(Debug, Default)]
pub struct LogSurface {
    inner: MemorySurface,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &MemorySurface {
        &self.inner
    }
}

impl Surface for LogSurface {
    fn set_text(&mut self, id: &str, text: &str) {
        if self.inner.text(id) != text {
            if READOUTS.contains(&id) {
                debug!(element = %id, text = %text, "Readout");
            } else {
                trace!(element = %id, text = %text, "Text");
            }
        }
        self.inner.set_text(id, text);
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) {
        trace!(element = %id, property = %property, value = %value, "Style");
        self.inner.set_style(id, property, value);
    }

    fn set_class(&mut self, id: &str, class: &str, enabled: bool) {
        trace!(element = %id, class = %class, enabled, "Class");
        self.inner.set_class(id, class, enabled);
    }

    fn append_child(&mut self, parent: &str, id: &str, classes: &[&str]) {
        trace!(parent = %parent, element = %id, "Append");
        self.inner.append_child(parent, id, classes);
    }

    fn remove(&mut self, id: &str) {
        trace!(element = %id, "Remove");
        self.inner.remove(id);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        info!(fullscreen, "Fullscreen");
        self.inner.set_fullscreen(fullscreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_reach_memory() {
        let mut surface = LogSurface::new();
        surface.set_text("velocity", "12 km/h");
        surface.append_child("agents", "agent-0", &["agent"]);
        surface.set_fullscreen(true);

        let memory = surface.memory();
        assert_eq!(memory.text("velocity"), "12 km/h");
        assert_eq!(memory.children("agents"), ["agent-0".to_string()]);
        assert!(memory.is_fullscreen());
    }
}
