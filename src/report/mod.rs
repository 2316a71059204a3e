//! Reporting utilities: currency formatting and the plain-text prediction report.

pub mod format;

pub use format::{format_currency, format_prediction_report};
