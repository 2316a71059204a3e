//! `rental-dash` library crate.
//!
//! The binary (`rd`) is a thin wrapper around this library so that:
//!
//! - dashboard state and request sequencing are testable without a terminal
//! - the prediction client can be reused by the one-shot `predict` command
//! - the terminal front end stays a thin layer over [`dashboard`]

pub mod app;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod report;
pub mod telemetry;
pub mod tui;
