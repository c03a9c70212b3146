//! Rendering of full telemetry snapshots

use rover_core::telemetry::{format_number, format_optional};
use rover_core::{AgentId, AgentInfo, DriverState, FormationState, Route, SensorState, TelemetrySnapshot};

use crate::config::DisplayConfig;
use crate::elements::{self, rotate};
use crate::surface::Surface;

const WHEELS_PER_AGENT: usize = 4;

/// Cached rendering of one formation agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutline {
    pub id: AgentId,
    pub length: Option<f64>,
    /// Root element of the outline inside the agents container
    pub element: String,
}

impl AgentOutline {
    fn create(index: usize, agent: &AgentInfo, unit: &str, surface: &mut dyn Surface) -> Self {
        let element = format!("agent-{}", index);
        surface.append_child(elements::AGENTS, &element, &["agent"]);

        let body = format!("{}-body", element);
        surface.append_child(&element, &body, &["body"]);
        for wheel in 0..WHEELS_PER_AGENT {
            let class = format!("wheel-{}", wheel);
            surface.append_child(&body, &format!("{}-{}", element, class), &["wheel", class.as_str()]);
        }

        let tags = format!("{}-tags", element);
        surface.append_child(&element, &tags, &["tags"]);
        surface.append_child(&tags, &format!("{}-id", element), &["tag"]);
        surface.append_child(&tags, &format!("{}-length", element), &["tag"]);

        let mut outline = Self {
            id: agent.id.clone(),
            length: agent.length,
            element,
        };
        outline.update(agent, unit, surface);
        outline
    }

    fn update(&mut self, agent: &AgentInfo, unit: &str, surface: &mut dyn Surface) {
        self.id = agent.id.clone();
        self.length = agent.length;
        surface.set_text(&format!("{}-id", self.element), &self.id.to_string());
        let length = match self.length {
            Some(length) => format!("{}{}", format_number(length), unit),
            None => String::new(),
        };
        surface.set_text(&format!("{}-length", self.element), &length);
    }
}

/// Renders snapshots into the driver, sensor and formation panels.
///
/// Owns the outline cache of the formation view, so agent rows are only
/// created or rewritten when the authoritative list actually changed.
#[derive(Debug)]
pub struct TelemetryView {
    max_distance: f64,
    velocity_unit: String,
    distance_unit: String,
    outlines: Vec<AgentOutline>,
}

impl TelemetryView {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            max_distance: display.max_distance,
            velocity_unit: display.velocity_unit.clone(),
            distance_unit: display.distance_unit.clone(),
            outlines: Vec::new(),
        }
    }

    pub fn outlines(&self) -> &[AgentOutline] {
        &self.outlines
    }

    pub fn update(&mut self, snapshot: &TelemetrySnapshot, surface: &mut dyn Surface) {
        self.update_formation(&snapshot.formation, surface);
        self.update_driver(&snapshot.driver, surface);
        self.update_sensors(&snapshot.sensors, surface);
    }

    /// Percentage of the full bar length for a sensor distance, 0 to 100
    pub fn calc_extent(&self, distance: f64) -> f64 {
        let extent = if self.max_distance > 0.0 {
            distance / self.max_distance
        } else {
            1.0
        };
        extent.clamp(0.0, 1.0) * 100.0
    }

    fn update_driver(&self, driver: &DriverState, surface: &mut dyn Surface) {
        let route = Route::Driver;
        surface.set_text(&elements::detail(route, "velocity"), &format_optional(driver.velocity));
        surface.set_text(
            &elements::detail(route, "angle"),
            &format_optional(driver.steering_angle_deg),
        );
        let mode = driver.mode.as_ref().map(|m| m.to_string()).unwrap_or_default();
        surface.set_text(&elements::detail(route, "mode"), &mode);
        let recording = driver.is_recording.map(|r| r.to_string()).unwrap_or_default();
        surface.set_text(&elements::detail(route, "is-recording"), &recording);

        let speed = match driver.velocity {
            Some(v) => format!("{} {}", format_number(v), self.velocity_unit),
            None => String::new(),
        };
        surface.set_text(elements::SPEEDOMETER, &speed);
        if let Some(angle) = driver.steering_angle_deg {
            surface.set_style(elements::STEERING_WHEEL, "transform", &rotate(angle));
        }
    }

    fn update_sensors(&self, sensors: &SensorState, surface: &mut dyn Surface) {
        let route = Route::Sensors;
        surface.set_text(&elements::detail(route, "front"), &format_optional(sensors.front));
        surface.set_text(&elements::detail(route, "right"), &format_optional(sensors.right));
        surface.set_text(&elements::detail(route, "back"), &format_optional(sensors.back));

        let percent = |d: f64| format!("{}%", format_number(self.calc_extent(d)));
        if let Some(front) = sensors.front {
            surface.set_style(elements::SENSOR_TOP, "height", &percent(front));
        }
        if let Some(back) = sensors.back {
            surface.set_style(elements::SENSOR_BOTTOM, "height", &percent(back));
        }
        if let Some(right) = sensors.right {
            surface.set_style(elements::SENSOR_TOP, "width", &percent(right));
            surface.set_style(elements::SENSOR_BOTTOM, "width", &percent(right));
        }
    }

    fn update_formation(&mut self, formation: &FormationState, surface: &mut dyn Surface) {
        let route = Route::Formation;
        surface.set_text(&elements::detail(route, "longest"), &format_optional(formation.longest));
        surface.set_text(&elements::detail(route, "gap"), &format_optional(formation.gap));

        for (index, agent) in formation.agents.iter().enumerate() {
            match self.outlines.get_mut(index) {
                Some(outline) => {
                    if outline.id != agent.id {
                        outline.update(agent, &self.distance_unit, surface);
                    }
                }
                None => {
                    let outline = AgentOutline::create(index, agent, &self.distance_unit, surface);
                    self.outlines.push(outline);
                }
            }
        }

        // Agents that left the formation
        while self.outlines.len() > formation.agents.len() {
            if let Some(outline) = self.outlines.pop() {
                surface.remove(&outline.element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemorySurface, Mutation};
    use rover_core::ModeValue;

    fn view() -> TelemetryView {
        TelemetryView::new(&DisplayConfig::default())
    }

    fn agent(id: i64, length: f64) -> AgentInfo {
        AgentInfo {
            id: AgentId::Number(id),
            length: Some(length),
        }
    }

    fn formation(agents: Vec<AgentInfo>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            formation: FormationState {
                agents,
                longest: Some(188.0),
                gap: Some(13.0),
            },
            ..Default::default()
        }
    }

    fn agent_mutations(surface: &MemorySurface, element: &str) -> usize {
        surface
            .mutations()
            .iter()
            .filter(|m| m.target().map(|t| t.starts_with(element)).unwrap_or(false))
            .count()
    }

    #[test]
    fn test_calc_extent() {
        let view = view();
        assert_eq!(view.calc_extent(0.0), 0.0);
        assert_eq!(view.calc_extent(42.0), 42.0);
        assert_eq!(view.calc_extent(99.5), 99.5);
        assert_eq!(view.calc_extent(100.0), 100.0);
        assert_eq!(view.calc_extent(250.0), 100.0);
        assert_eq!(view.calc_extent(-3.0), 0.0);
    }

    #[test]
    fn test_driver_panel() {
        let mut view = view();
        let mut surface = MemorySurface::new();
        let snapshot = TelemetrySnapshot {
            driver: DriverState {
                velocity: Some(18.0),
                steering_angle_deg: Some(-15.0),
                mode: Some(ModeValue::Text("drive/manual".to_string())),
                is_recording: Some(true),
            },
            ..Default::default()
        };

        view.update(&snapshot, &mut surface);

        assert_eq!(surface.text("details-driver.velocity"), "18");
        assert_eq!(surface.text("details-driver.angle"), "-15");
        assert_eq!(surface.text("details-driver.mode"), "drive/manual");
        assert_eq!(surface.text("details-driver.is-recording"), "true");
        assert_eq!(surface.text(elements::SPEEDOMETER), "18 km/h");
        assert_eq!(
            surface.style(elements::STEERING_WHEEL, "transform"),
            Some("rotate(-15deg)")
        );
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let mut view = view();
        let mut surface = MemorySurface::new();
        view.update(&TelemetrySnapshot::default(), &mut surface);

        assert_eq!(surface.text("details-driver.velocity"), "");
        assert_eq!(surface.text(elements::SPEEDOMETER), "");
        assert_eq!(surface.style(elements::STEERING_WHEEL, "transform"), None);
        assert_eq!(surface.style(elements::SENSOR_TOP, "height"), None);
        assert!(surface.children(elements::AGENTS).is_empty());
    }

    #[test]
    fn test_sensor_bars() {
        let mut view = view();
        let mut surface = MemorySurface::new();
        let snapshot = TelemetrySnapshot {
            sensors: SensorState {
                front: Some(80.0),
                right: Some(23.0),
                back: Some(130.0),
            },
            ..Default::default()
        };

        view.update(&snapshot, &mut surface);

        assert_eq!(surface.text("details-sensors.back"), "130");
        assert_eq!(surface.style(elements::SENSOR_TOP, "height"), Some("80%"));
        assert_eq!(surface.style(elements::SENSOR_TOP, "width"), Some("23%"));
        assert_eq!(surface.style(elements::SENSOR_BOTTOM, "height"), Some("100%"));
        assert_eq!(surface.style(elements::SENSOR_BOTTOM, "width"), Some("23%"));
    }

    #[test]
    fn test_formation_growth_keeps_existing_outline() {
        let mut view = view();
        let mut surface = MemorySurface::new();

        view.update(&formation(vec![agent(1, 5.0)]), &mut surface);
        assert_eq!(view.outlines().len(), 1);
        assert_eq!(surface.text("agent-0-id"), "1");
        assert_eq!(surface.text("agent-0-length"), "5cm");
        surface.take_mutations();

        view.update(&formation(vec![agent(1, 5.0), agent(2, 3.0)]), &mut surface);

        assert_eq!(view.outlines().len(), 2);
        assert_eq!(agent_mutations(&surface, "agent-0"), 0);
        let appended: Vec<_> = surface
            .mutations()
            .iter()
            .filter(|m| matches!(m, Mutation::Append { parent, .. } if parent == elements::AGENTS))
            .collect();
        assert_eq!(appended.len(), 1);
        assert_eq!(surface.text("agent-1-id"), "2");
        assert_eq!(surface.text("agent-1-length"), "3cm");
        assert_eq!(surface.children("agent-1-body").len(), WHEELS_PER_AGENT);
    }

    #[test]
    fn test_formation_updates_changed_index_only() {
        let mut view = view();
        let mut surface = MemorySurface::new();

        view.update(&formation(vec![agent(1, 5.0), agent(2, 3.0)]), &mut surface);
        surface.take_mutations();

        view.update(&formation(vec![agent(9, 7.0), agent(2, 3.0)]), &mut surface);

        assert!(agent_mutations(&surface, "agent-0") > 0);
        assert_eq!(agent_mutations(&surface, "agent-1"), 0);
        assert_eq!(view.outlines()[0].id, AgentId::Number(9));
        assert_eq!(surface.text("agent-0-id"), "9");
        assert_eq!(surface.text("agent-0-length"), "7cm");
        assert_eq!(surface.children(elements::AGENTS).len(), 2);
    }

    #[test]
    fn test_formation_same_id_is_not_rewritten() {
        let mut view = view();
        let mut surface = MemorySurface::new();

        view.update(&formation(vec![agent(1, 5.0)]), &mut surface);
        surface.take_mutations();
        view.update(&formation(vec![agent(1, 6.0)]), &mut surface);

        assert_eq!(agent_mutations(&surface, "agent-0"), 0);
        assert_eq!(surface.text("agent-0-length"), "5cm");
    }

    #[test]
    fn test_formation_shrink_removes_trailing_outlines() {
        let mut view = view();
        let mut surface = MemorySurface::new();

        view.update(
            &formation(vec![agent(1, 5.0), agent(2, 3.0), agent(3, 4.0)]),
            &mut surface,
        );
        view.update(&formation(vec![agent(1, 5.0)]), &mut surface);

        assert_eq!(view.outlines().len(), 1);
        assert_eq!(surface.children(elements::AGENTS), ["agent-0".to_string()]);
        assert!(!surface.contains("agent-2-id"));
        assert_eq!(surface.text(&elements::detail(Route::Formation, "gap")), "13");
    }
}
