//! Static neighborhood → coordinate directory for Santa Clara County.

use crate::domain::GeoPoint;

/// Neighborhood shown (and selected) before any prediction.
pub const DEFAULT_NEIGHBORHOOD: &str = "Santa Clara";

/// Map center before any prediction and after a reset.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(37.3541, -121.9552);

/// Zoom level of the default (county-wide) view.
pub const DEFAULT_ZOOM: u8 = 10;

/// Zoom level used when flying to a known neighborhood.
pub const CLOSE_ZOOM: u8 = 13;

static NEIGHBORHOODS: [(&str, GeoPoint); 16] = [
    ("Campbell", GeoPoint::new(37.2872, -121.9443)),
    ("Cupertino", GeoPoint::new(37.3230, -122.0322)),
    ("Gilroy", GeoPoint::new(37.0059, -121.5683)),
    ("Los Altos", GeoPoint::new(37.3852, -122.1141)),
    ("Los Altos Hills", GeoPoint::new(37.3797, -122.1375)),
    ("Los Gatos", GeoPoint::new(37.2266, -121.9747)),
    ("Milpitas", GeoPoint::new(37.4323, -121.8996)),
    ("Monte Sereno", GeoPoint::new(37.2363, -121.9925)),
    ("Morgan Hill", GeoPoint::new(37.1305, -121.6544)),
    ("Mountain View", GeoPoint::new(37.3861, -122.0839)),
    ("Palo Alto", GeoPoint::new(37.4419, -122.1430)),
    ("San Jose", GeoPoint::new(37.3382, -121.8863)),
    ("Santa Clara", GeoPoint::new(37.3541, -121.9552)),
    ("Saratoga", GeoPoint::new(37.2638, -122.0230)),
    ("Sunnyvale", GeoPoint::new(37.3688, -122.0363)),
    ("Unincorporated Areas", GeoPoint::new(37.3337, -121.8907)),
];

/// Read-only lookup over the fixed neighborhood table.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoDirectory;

impl GeoDirectory {
    /// Coordinates for `name`, or `None` for neighborhoods the map doesn't know.
    ///
    /// Matching is exact (case-sensitive), mirroring the form's option values.
    pub fn lookup(&self, name: &str) -> Option<GeoPoint> {
        NEIGHBORHOODS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, point)| *point)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        NEIGHBORHOODS.iter().map(|(name, _)| *name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, GeoPoint)> {
        NEIGHBORHOODS.iter().copied()
    }

    pub fn len(&self) -> usize {
        NEIGHBORHOODS.len()
    }

    pub fn is_empty(&self) -> bool {
        NEIGHBORHOODS.is_empty()
    }
}
