//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - sent to the prediction endpoint as JSON
//! - decoded from its response envelope
//! - rendered by either the TUI or the plain-text report

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Room types offered by the listing form.
pub const ROOM_TYPES: [&str; 4] = ["Entire home/apt", "Private room", "Shared room", "Hotel room"];

/// Availability choices offered by the listing form (`t` = bookable, `f` = blocked).
pub const AVAILABILITY: [&str; 2] = ["t", "f"];

/// Which date source feeds the seasonal context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardMode {
    /// Use today's date (the initial mode).
    #[default]
    Auto,
    /// Use the date typed into the date-input widget.
    Manual,
}

impl DashboardMode {
    pub fn toggled(self) -> Self {
        match self {
            DashboardMode::Auto => DashboardMode::Manual,
            DashboardMode::Manual => DashboardMode::Auto,
        }
    }

    /// Caption of the toggle button while this mode is active.
    pub fn toggle_caption(self) -> &'static str {
        match self {
            DashboardMode::Auto => "Switch to Manual",
            DashboardMode::Manual => "Switch to Auto",
        }
    }
}

/// Date-derived fields sent with every query.
///
/// `day_of_week` uses a Monday-first convention (`Monday = 0 .. Sunday = 6`);
/// `is_weekend` is derived from the same date, so the two always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonalContext {
    pub month: u32,
    pub day: u32,
    pub day_of_week: u32,
    /// Sent as `1` / `0` on the wire.
    #[serde(serialize_with = "serialize_flag")]
    pub is_weekend: bool,
}

fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// The request body for `POST /predict`.
///
/// Numeric fields are always finite and non-negative (see `dashboard::form`).
/// Categorical fields are opaque strings; the prediction service validates them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingQuery {
    pub acc: f64,
    pub bed: f64,
    pub bath: f64,
    pub amenities: f64,
    pub neighborhood: String,
    pub room_type: String,
    pub available: String,
    #[serde(flatten)]
    pub seasonal: SeasonalContext,
}

/// Pricing bracket returned by the prediction service.
///
/// Only used to scale the "Tier Index" bar of the composition chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tier {
    Luxury,
    Standard,
    Other(String),
}

impl Tier {
    /// Fixed display scalar for the composition chart.
    pub fn scale(&self) -> f64 {
        match self {
            Tier::Luxury => 300.0,
            Tier::Standard => 150.0,
            Tier::Other(_) => 75.0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Tier::Luxury => "Luxury Class",
            Tier::Standard => "Standard Class",
            Tier::Other(raw) => raw,
        }
    }
}

impl From<String> for Tier {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Luxury Class" => Tier::Luxury,
            "Standard Class" => Tier::Standard,
            _ => Tier::Other(raw),
        }
    }
}

impl From<&str> for Tier {
    fn from(raw: &str) -> Self {
        Tier::from(raw.to_string())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Tier::from)
    }
}

/// Per-feature contribution magnitudes, rendered verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ImpactScores {
    #[serde(rename = "Size", deserialize_with = "number_or_string")]
    pub size: f64,
    #[serde(rename = "Beds", deserialize_with = "number_or_string")]
    pub beds: f64,
    #[serde(rename = "Baths", deserialize_with = "number_or_string")]
    pub baths: f64,
    #[serde(rename = "Amenities", deserialize_with = "number_or_string")]
    pub amenities: f64,
}

impl ImpactScores {
    pub const LABELS: [&'static str; 4] = ["Size", "Beds", "Baths", "Amenities"];

    pub fn values(&self) -> [f64; 4] {
        [self.size, self.beds, self.baths, self.amenities]
    }
}

/// A successful prediction, as decoded from the response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResult {
    #[serde(deserialize_with = "number_or_string")]
    pub price: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub range_low: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub range_high: f64,
    /// Raw model estimate before blending.
    #[serde(deserialize_with = "number_or_string")]
    pub rf: f64,
    pub tier: Tier,
    pub impact: ImpactScores,
    /// Missing and `null` both decode as no insights.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub insights: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accepts either a JSON number or a numeric string (`"123.45"`).
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(v) => Ok(v),
        NumberOrString::String(s) => s.trim().parse::<f64>().map_err(D::Error::custom),
    }
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Raw widget values of the listing form, exactly as typed/selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInputs {
    pub acc: String,
    pub bed: String,
    pub bath: String,
    pub amenities: String,
    pub neighborhood: String,
    pub room_type: String,
    pub available: String,
    /// Date-input widget value (`YYYY-MM-DD`), empty when nothing is selected.
    pub manual_date: String,
}

impl Default for FormInputs {
    fn default() -> Self {
        Self {
            acc: "2".to_string(),
            bed: "1".to_string(),
            bath: "1".to_string(),
            amenities: "15".to_string(),
            neighborhood: crate::data::geo::DEFAULT_NEIGHBORHOOD.to_string(),
            room_type: ROOM_TYPES[0].to_string(),
            available: AVAILABILITY[0].to_string(),
            manual_date: String::new(),
        }
    }
}

/// Runtime configuration for the dashboard and the one-shot `predict` command.
///
/// This is derived from CLI flags (plus environment/defaults).
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub endpoint: String,
    /// `None` waits indefinitely for the prediction service.
    pub timeout: Option<Duration>,
    /// Terminal widths below this many columns use the stacked (narrow) layout.
    pub narrow_width: u16,
    /// Delay between revealing the result panel and scrolling it into view.
    pub scroll_delay: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            narrow_width: 120,
            scroll_delay: Duration::from_millis(300),
        }
    }
}

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";
