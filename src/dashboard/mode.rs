//! Auto/Manual date-mode switch and the widget visibility it controls.

use crate::dashboard::temporal::{DATE_INPUT_FORMAT, TemporalContextResolver};
use crate::domain::DashboardMode;

/// Visibility of the seasonal widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalVisibility {
    /// The read-only "today" status label.
    pub auto_display: bool,
    /// The date-input widget.
    pub date_input: bool,
    /// Whether the date-input widget holds keyboard focus.
    pub date_input_focused: bool,
}

impl SeasonalVisibility {
    pub const AUTO: Self = Self {
        auto_display: true,
        date_input: false,
        date_input_focused: false,
    };

    pub const MANUAL: Self = Self {
        auto_display: false,
        date_input: true,
        date_input_focused: true,
    };
}

/// Mode state owned by the dashboard session.
///
/// The mode only changes through [`ModeToggle::toggle`] and [`ModeToggle::force_auto`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeToggle {
    mode: DashboardMode,
    visibility: SeasonalVisibility,
    status_label: String,
}

impl ModeToggle {
    /// Initial state: Auto, with the status label computed for today.
    pub fn new(temporal: &TemporalContextResolver) -> Self {
        Self {
            mode: DashboardMode::Auto,
            visibility: SeasonalVisibility::AUTO,
            status_label: temporal.auto_status_label(),
        }
    }

    pub fn mode(&self) -> DashboardMode {
        self.mode
    }

    pub fn visibility(&self) -> SeasonalVisibility {
        self.visibility
    }

    pub fn status_label(&self) -> &str {
        &self.status_label
    }

    pub fn caption(&self) -> &'static str {
        self.mode.toggle_caption()
    }

    /// Flip the mode unconditionally.
    ///
    /// Entering Manual pre-fills `date_input` with today's date; entering Auto
    /// leaves it alone and recomputes the status label.
    pub fn toggle(&mut self, date_input: &mut String, temporal: &TemporalContextResolver) {
        match self.mode.toggled() {
            DashboardMode::Manual => {
                self.mode = DashboardMode::Manual;
                self.visibility = SeasonalVisibility::MANUAL;
                *date_input = temporal.today().format(DATE_INPUT_FORMAT).to_string();
            }
            DashboardMode::Auto => self.enter_auto(temporal),
        }
        tracing::debug!(mode = ?self.mode, "date mode toggled");
    }

    /// Force Auto mode (used by reset).
    pub fn force_auto(&mut self, temporal: &TemporalContextResolver) {
        self.enter_auto(temporal);
    }

    /// Drop keyboard focus from the date input (the user moved to another field).
    pub fn blur(&mut self) {
        self.visibility.date_input_focused = false;
    }

    /// Give the date input focus again; ignored while it is hidden.
    pub fn focus(&mut self) {
        if self.visibility.date_input {
            self.visibility.date_input_focused = true;
        }
    }

    fn enter_auto(&mut self, temporal: &TemporalContextResolver) {
        self.mode = DashboardMode::Auto;
        self.visibility = SeasonalVisibility::AUTO;
        self.status_label = temporal.auto_status_label();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::dashboard::temporal::{Clock, FixedClock};

    /// Clock that advances one day on every read, to observe recomputation.
    struct SteppingClock {
        base: NaiveDate,
        reads: AtomicI64,
    }

    impl Clock for SteppingClock {
        fn today(&self) -> NaiveDate {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            self.base + Days::new(n as u64)
        }
    }

    fn fixed(y: i32, m: u32, d: u32) -> TemporalContextResolver {
        TemporalContextResolver::new(Arc::new(FixedClock(NaiveDate::from_ymd_opt(y, m, d).unwrap())))
    }

    #[test]
    fn starts_in_auto_with_label() {
        let temporal = fixed(2024, 1, 6);
        let toggle = ModeToggle::new(&temporal);
        assert_eq!(toggle.mode(), DashboardMode::Auto);
        assert_eq!(toggle.visibility(), SeasonalVisibility::AUTO);
        assert_eq!(toggle.status_label(), "JAN 06 • WEEKEND RATE");
        assert_eq!(toggle.caption(), "Switch to Manual");
    }

    #[test]
    fn entering_manual_prefills_and_focuses_date_input() {
        let temporal = fixed(2024, 2, 29);
        let mut toggle = ModeToggle::new(&temporal);
        let mut date_input = String::new();

        toggle.toggle(&mut date_input, &temporal);

        assert_eq!(toggle.mode(), DashboardMode::Manual);
        assert_eq!(toggle.visibility(), SeasonalVisibility::MANUAL);
        assert!(toggle.visibility().date_input_focused);
        assert_eq!(date_input, "2024-02-29");
        assert_eq!(toggle.caption(), "Switch to Auto");
    }

    #[test]
    fn toggling_twice_restores_auto_and_recomputes_label() {
        let temporal = TemporalContextResolver::new(Arc::new(SteppingClock {
            base: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            reads: AtomicI64::new(0),
        }));
        let mut toggle = ModeToggle::new(&temporal);
        let initial_visibility = toggle.visibility();
        assert_eq!(toggle.status_label(), "JAN 01 • WEEKDAY RATE");

        let mut date_input = String::new();
        toggle.toggle(&mut date_input, &temporal);
        toggle.toggle(&mut date_input, &temporal);

        assert_eq!(toggle.mode(), DashboardMode::Auto);
        assert_eq!(toggle.visibility(), initial_visibility);
        // Read #0 on load, #1 for the manual pre-fill, #2 on re-entering Auto.
        assert_eq!(toggle.status_label(), "JAN 03 • WEEKDAY RATE");
    }

    #[test]
    fn force_auto_from_manual() {
        let temporal = fixed(2024, 1, 1);
        let mut toggle = ModeToggle::new(&temporal);
        let mut date_input = String::new();
        toggle.toggle(&mut date_input, &temporal);
        toggle.blur();
        assert!(!toggle.visibility().date_input_focused);

        toggle.focus();
        assert!(toggle.visibility().date_input_focused);

        toggle.force_auto(&temporal);
        assert_eq!(toggle.mode(), DashboardMode::Auto);
        assert_eq!(toggle.visibility(), SeasonalVisibility::AUTO);

        toggle.focus();
        assert!(!toggle.visibility().date_input_focused);
    }
}
