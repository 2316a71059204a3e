//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the wire types (`ListingQuery`, `PredictionResult`, `ImpactScores`, `Tier`)
//! - the date context (`SeasonalContext`) and its source switch (`DashboardMode`)
//! - raw form values (`FormInputs`) and runtime settings (`DashboardSettings`)

pub mod types;

pub use types::*;
