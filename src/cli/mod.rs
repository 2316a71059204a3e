//! Command-line parsing for the listing price dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! dashboard core and the terminal front-end.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AVAILABILITY, DEFAULT_ENDPOINT, ROOM_TYPES};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rd", version, about = "Rental listing price dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (the default).
    Tui(DashArgs),
    /// Price one listing and print a report.
    Predict(PredictArgs),
}

/// Options shared by every command that talks to the prediction service.
#[derive(Debug, Args, Clone)]
pub struct ServiceArgs {
    /// Prediction endpoint URL.
    #[arg(long, env = "RENTAL_DASH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Give up on a prediction request after this many seconds (default: wait indefinitely).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Append logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Default log level (overridden by RUST_LOG).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Options for the interactive dashboard.
#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Terminal widths below this many columns use the stacked layout.
    #[arg(long, default_value_t = 120)]
    pub narrow_width: u16,

    /// Delay before scrolling results into view in the stacked layout.
    #[arg(long, default_value_t = 300)]
    pub scroll_delay_ms: u64,
}

/// Listing description for a one-shot prediction.
///
/// Numeric fields are taken as text and go through the same coercion as the form.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Guests the listing accommodates.
    #[arg(long, default_value = "2", allow_hyphen_values = true)]
    pub acc: String,

    /// Bedrooms.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub bed: String,

    /// Bathrooms.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub bath: String,

    /// Number of amenities.
    #[arg(long, default_value = "15", allow_hyphen_values = true)]
    pub amenities: String,

    /// Neighborhood (e.g. "Palo Alto").
    #[arg(long, default_value = crate::data::geo::DEFAULT_NEIGHBORHOOD)]
    pub neighborhood: String,

    /// Room type.
    #[arg(long, default_value = ROOM_TYPES[0])]
    pub room_type: String,

    /// Availability flag ("t" or "f").
    #[arg(long, default_value = AVAILABILITY[0])]
    pub available: String,

    /// Price for this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    pub date: Option<String>,
}
