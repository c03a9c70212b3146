//! Navigation routes of the detail panels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseNameError;

/// A detail panel reachable from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Driver,
    Formation,
    Sensors,
}

impl Route {
    /// Declared routes; the first one is the fallback selection
    pub const ALL: [Route; 3] = [Route::Driver, Route::Formation, Route::Sensors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Driver => "driver",
            Route::Formation => "formation",
            Route::Sensors => "sensors",
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::ALL[0]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| ParseNameError::new("route", s))
    }
}
