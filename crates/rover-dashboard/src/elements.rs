//! Element identifiers of the dashboard page

use rover_core::Route;

// Live values updated by the poll loop
pub const VELOCITY: &str = "velocity";
pub const STEERING_ANGLE: &str = "steering-angle";
pub const DISTANCE_TOP: &str = "distance-top";
pub const DISTANCE_RIGHT: &str = "distance-right";
pub const DISTANCE_BOTTOM: &str = "distance-bottom";
pub const CAR_CONTAINER: &str = "container-car";

// Snapshot visuals
pub const SPEEDOMETER: &str = "speedometer";
pub const STEERING_WHEEL: &str = "steering-wheel";
pub const SENSOR_TOP: &str = "sensor-top";
pub const SENSOR_BOTTOM: &str = "sensor-bottom";
pub const AGENTS: &str = "agents";
pub const LAST_UPDATE: &str = "last-update";

// Controls
pub const BTN_EMERGENCY_STOP: &str = "btn-emergency-stop";
pub const BTN_START_RECORDING: &str = "btn-start-recording";
pub const BTN_STOP_RECORDING: &str = "btn-stop-recording";
pub const BTN_FULLSCREEN_ICON: &str = "btn-fullscreen-icon";

// Root for transient notices
pub const BODY: &str = "body";

// Classes
pub const ACTIVE: &str = "active";
pub const NO_DISPLAY: &str = "no-display";

/// Value element of a detail row, e.g. `details-driver.velocity`
pub fn detail(route: Route, key: &str) -> String {
    format!("details-{}.{}", route, key)
}

/// Details panel of a route
pub fn details_panel(route: Route) -> String {
    format!("details-{}", route)
}

/// Main container of a route
pub fn route_container(route: Route) -> String {
    route.as_str().to_string()
}

/// Navigation button of a route
pub fn route_button(route: Route) -> String {
    format!("nav-{}", route)
}

/// CSS `transform` value rotating an element by `deg` degrees
pub fn rotate(deg: f64) -> String {
    format!("rotate({}deg)", deg)
}
