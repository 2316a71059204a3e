//! External data: the neighborhood directory and the prediction endpoint client.

pub mod client;
pub mod geo;

pub use client::{ClientFailure, HttpPredictionClient, PredictionService, decode_envelope, interpret_response};
pub use geo::GeoDirectory;
