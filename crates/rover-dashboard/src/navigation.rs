//! Tab-like switching between the detail panels

use rover_core::Route;
use tracing::{debug, warn};

use crate::elements::{self, ACTIVE, NO_DISPLAY};
use crate::storage::Storage;
use crate::surface::Surface;

/// Storage key of the last active route
pub const ACTIVE_ELEMENT_STORAGE_KEY: &str = "nav-active-element";

/// Shows exactly one route's container and details panel at a time and
/// remembers the choice across reloads.
#[derive(Debug)]
pub struct NavigationController<K: Storage> {
    storage: K,
    active: Route,
}

impl<K: Storage> NavigationController<K> {
    /// Restore the persisted route (or the first declared one) and show it
    pub fn new(storage: K, surface: &mut dyn Surface) -> Self {
        let active = match storage.get(ACTIVE_ELEMENT_STORAGE_KEY) {
            Some(saved) => saved.parse().unwrap_or_else(|_| {
                debug!(route = %saved, "Ignoring unknown persisted route");
                Route::default()
            }),
            None => Route::default(),
        };

        let mut navigation = Self { storage, active };
        navigation.toggle(active, surface);
        navigation
    }

    pub fn active(&self) -> Route {
        self.active
    }

    pub fn toggle(&mut self, route: Route, surface: &mut dyn Surface) {
        for other in Route::ALL {
            surface.set_class(&elements::route_button(other), ACTIVE, false);
            surface.set_class(&elements::route_container(other), NO_DISPLAY, true);
            surface.set_class(&elements::details_panel(other), NO_DISPLAY, true);
        }

        surface.set_class(&elements::route_button(route), ACTIVE, true);
        surface.set_class(&elements::route_container(route), NO_DISPLAY, false);
        surface.set_class(&elements::details_panel(route), NO_DISPLAY, false);
        self.active = route;

        if let Err(e) = self.storage.set(ACTIVE_ELEMENT_STORAGE_KEY, route.as_str()) {
            warn!(route = %route, error = %e, "Failed to persist active route");
        }
    }

    pub fn into_storage(self) -> K {
        self.storage
    }
}
