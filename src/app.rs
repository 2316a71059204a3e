//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - launches the dashboard, or runs a one-shot prediction

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, DashArgs, PredictArgs, ServiceArgs};
use crate::dashboard::form::build_query;
use crate::dashboard::temporal::TemporalContextResolver;
use crate::data::client::{HttpPredictionClient, PredictionService};
use crate::domain::{DashboardMode, DashboardSettings, FormInputs};
use crate::error::AppError;
use crate::telemetry::{self, LogSink};

/// Entry point for the `rd` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `rd` and `rd --endpoint ...` to behave like `rd tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    let sink = match &args.service.log_file {
        Some(path) => LogSink::File(path),
        None => LogSink::Off,
    };
    telemetry::init(sink, &args.service.log_level)?;

    let settings = settings_from_args(&args);
    tracing::info!(endpoint = %settings.endpoint, "starting dashboard");
    crate::tui::run(settings)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let sink = match &args.service.log_file {
        Some(path) => LogSink::File(path),
        None => LogSink::Stderr,
    };
    telemetry::init(sink, &args.service.log_level)?;

    let settings = DashboardSettings {
        endpoint: args.service.endpoint.clone(),
        timeout: timeout_from_args(&args.service),
        ..DashboardSettings::default()
    };
    let client = HttpPredictionClient::new(&settings)?;

    let (mode, inputs) = inputs_from_args(&args);
    let seasonal = TemporalContextResolver::system().resolve(mode, &inputs.manual_date);
    let query = build_query(&inputs, seasonal);

    let result = client.predict(&query)?;
    println!("{}", crate::report::format_prediction_report(&query, &result));
    Ok(())
}

pub fn settings_from_args(args: &DashArgs) -> DashboardSettings {
    DashboardSettings {
        endpoint: args.service.endpoint.clone(),
        timeout: timeout_from_args(&args.service),
        narrow_width: args.narrow_width,
        scroll_delay: Duration::from_millis(args.scroll_delay_ms),
    }
}

fn timeout_from_args(args: &ServiceArgs) -> Option<Duration> {
    args.timeout_secs.map(Duration::from_secs)
}

/// A `--date` switches the one-shot query to Manual mode.
fn inputs_from_args(args: &PredictArgs) -> (DashboardMode, FormInputs) {
    let mode = if args.date.is_some() {
        DashboardMode::Manual
    } else {
        DashboardMode::Auto
    };
    let inputs = FormInputs {
        acc: args.acc.clone(),
        bed: args.bed.clone(),
        bath: args.bath.clone(),
        amenities: args.amenities.clone(),
        neighborhood: args.neighborhood.clone(),
        room_type: args.room_type.clone(),
        available: args.available.clone(),
        manual_date: args.date.clone().unwrap_or_default(),
    };
    (mode, inputs)
}

/// Rewrite argv so `rd` defaults to `rd tui`.
///
/// Rules:
/// - `rd`                      -> `rd tui`
/// - `rd --endpoint URL ...`   -> `rd tui --endpoint URL ...`
/// - `rd --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "predict");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["rd"])), argv(&["rd", "tui"]));
    }

    #[test]
    fn leading_flag_is_treated_as_tui_flag() {
        assert_eq!(
            rewrite_args(argv(&["rd", "--endpoint", "http://x/predict"])),
            argv(&["rd", "tui", "--endpoint", "http://x/predict"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["rd", "predict"])), argv(&["rd", "predict"]));
        assert_eq!(rewrite_args(argv(&["rd", "--help"])), argv(&["rd", "--help"]));
    }

    #[test]
    fn predict_flags_parse_and_date_selects_manual_mode() {
        let cli = crate::cli::Cli::parse_from(argv(&[
            "rd",
            "predict",
            "--neighborhood",
            "Palo Alto",
            "--acc",
            "-4",
            "--date",
            "2024-01-07",
        ]));
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let (mode, inputs) = inputs_from_args(&args);
        assert_eq!(mode, DashboardMode::Manual);
        assert_eq!(inputs.neighborhood, "Palo Alto");
        assert_eq!(inputs.acc, "-4");
        assert_eq!(inputs.manual_date, "2024-01-07");
        assert_eq!(inputs.room_type, "Entire home/apt");
    }

    #[test]
    fn tui_settings_follow_flags() {
        let cli = crate::cli::Cli::parse_from(argv(&[
            "rd",
            "tui",
            "--timeout-secs",
            "5",
            "--narrow-width",
            "90",
        ]));
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        let settings = settings_from_args(&args);
        assert_eq!(settings.timeout, Some(Duration::from_secs(5)));
        assert_eq!(settings.narrow_width, 90);
        assert_eq!(settings.scroll_delay, Duration::from_millis(300));
    }
}
