//! Map view model: center/zoom, a single marker, and its popup.
//!
//! The logical view (`center`, `zoom`) changes immediately; [`MapView::fly_to`]
//! also records a short flight so a front-end can animate toward it.

use std::time::{Duration, Instant};

use crate::data::geo::{DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::domain::GeoPoint;

const FLIGHT_DURATION: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub label: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: GeoPoint,
    pub popup: Option<Popup>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flight {
    from: GeoPoint,
    from_zoom: f64,
    started: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    center: GeoPoint,
    zoom: u8,
    marker: Marker,
    flight: Option<Flight>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            marker: Marker {
                position: DEFAULT_CENTER,
                popup: None,
            },
            flight: None,
        }
    }
}

impl MapView {
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Label of the popup if it is bound and open.
    pub fn open_popup_label(&self) -> Option<&str> {
        self.marker
            .popup
            .as_ref()
            .filter(|p| p.open)
            .map(|p| p.label.as_str())
    }

    /// Move the view to `target` at `zoom`, animating from wherever it is drawn at `now`.
    pub fn fly_to(&mut self, target: GeoPoint, zoom: u8, now: Instant) {
        let (from, from_zoom) = self.displayed(now);
        self.flight = Some(Flight {
            from,
            from_zoom,
            started: now,
        });
        self.center = target;
        self.zoom = zoom;
    }

    pub fn move_marker(&mut self, position: GeoPoint) {
        self.marker.position = position;
    }

    /// Bind (or rebind) a popup to the marker and open it.
    pub fn open_popup(&mut self, label: impl Into<String>) {
        self.marker.popup = Some(Popup {
            label: label.into(),
            open: true,
        });
    }

    /// Close the popup but keep it bound.
    pub fn close_popup(&mut self) {
        if let Some(popup) = self.marker.popup.as_mut() {
            popup.open = false;
        }
    }

    /// Center and zoom as they should be drawn at `now` (mid-flight or settled).
    pub fn displayed(&self, now: Instant) -> (GeoPoint, f64) {
        let target = (self.center, f64::from(self.zoom));
        let Some(flight) = self.flight else {
            return target;
        };

        let elapsed = now.saturating_duration_since(flight.started);
        if elapsed >= FLIGHT_DURATION {
            return target;
        }

        let t = elapsed.as_secs_f64() / FLIGHT_DURATION.as_secs_f64();
        // Ease-in-out (smoothstep).
        let u = t * t * (3.0 - 2.0 * t);
        let lerp = |a: f64, b: f64| a + (b - a) * u;
        (
            GeoPoint::new(lerp(flight.from.lat, self.center.lat), lerp(flight.from.lon, self.center.lon)),
            lerp(flight.from_zoom, f64::from(self.zoom)),
        )
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.flight
            .is_some_and(|f| now.saturating_duration_since(f.started) < FLIGHT_DURATION)
    }
}
