//! Seasonal context: which date a query is priced for, and its derived fields.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};

use crate::domain::{DashboardMode, SeasonalContext};

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Format accepted by the date-input widget.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Where the pricing date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Auto mode, or Manual mode with an empty date input.
    Today(NaiveDate),
    /// Manual mode with a parseable date.
    Manual(NaiveDate),
    /// Manual mode with an unparseable date; today's date is used instead.
    ParseFallback(NaiveDate),
}

impl DateSource {
    pub fn date(self) -> NaiveDate {
        match self {
            DateSource::Today(d) | DateSource::Manual(d) | DateSource::ParseFallback(d) => d,
        }
    }
}

/// Resolves the seasonal context for the current mode and date-input value.
#[derive(Clone)]
pub struct TemporalContextResolver {
    clock: Arc<dyn Clock>,
}

impl TemporalContextResolver {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Pick the pricing date. Never fails.
    pub fn date_source(&self, mode: DashboardMode, manual_value: &str) -> DateSource {
        let today = self.clock.today();
        let trimmed = manual_value.trim();
        if mode == DashboardMode::Auto || trimmed.is_empty() {
            return DateSource::Today(today);
        }
        match NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT) {
            Ok(date) => DateSource::Manual(date),
            Err(_) => DateSource::ParseFallback(today),
        }
    }

    pub fn resolve(&self, mode: DashboardMode, manual_value: &str) -> SeasonalContext {
        let source = self.date_source(mode, manual_value);
        if let DateSource::ParseFallback(_) = source {
            tracing::debug!(value = manual_value, "unparseable manual date, using today");
        }
        seasonal_context(source.date())
    }

    /// Status label for today, shown while in Auto mode.
    pub fn auto_status_label(&self) -> String {
        status_label(self.clock.today())
    }
}

/// Derive the seasonal fields for `date`.
///
/// The native week (`Sunday = 0 .. Saturday = 6`) is remapped to Monday-first:
/// Sunday becomes 6, every other day shifts down by one.
pub fn seasonal_context(date: NaiveDate) -> SeasonalContext {
    let native = date.weekday().num_days_from_sunday();
    SeasonalContext {
        month: date.month(),
        day: date.day(),
        day_of_week: if native == 0 { 6 } else { native - 1 },
        is_weekend: is_weekend(date),
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday().num_days_from_sunday(), 0 | 6)
}

/// `"<MON> <DD> • <WEEKDAY|WEEKEND> RATE"`, e.g. `"JAN 07 • WEEKEND RATE"`.
pub fn status_label(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    let rate = if is_weekend(date) { "WEEKEND RATE" } else { "WEEKDAY RATE" };
    format!("{month} {:02} • {rate}", date.day())
}
