//! Result rendering: maps one [`PredictionResult`] onto the price panel, the map,
//! both charts, and the insight list.
//!
//! Each surface is updated independently; a result never merges with the
//! previous one, it replaces it.

use std::time::{Duration, Instant};

use crate::dashboard::chart::{Bar, BarChartSpec, BarOrientation, ChartSlot, ChartSlotId, Rgb};
use crate::dashboard::map::MapView;
use crate::data::geo::{CLOSE_ZOOM, DEFAULT_CENTER, DEFAULT_ZOOM, GeoDirectory};
use crate::domain::{DashboardSettings, ImpactScores, PredictionResult};
use crate::report::format_currency;

/// Price shown before any prediction and after a reset.
pub const EMPTY_PRICE: &str = "$0.00";

/// Price, range, breakdown, and insights as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel {
    pub price: String,
    pub range_low: String,
    pub range_high: String,
    /// Raw model estimate.
    pub estimate: String,
    pub tier: String,
    /// Insight fragments, already quoted, in the order received.
    pub insights: Vec<String>,
    pub range_visible: bool,
    pub breakdown_visible: bool,
    pub insights_visible: bool,
}

impl Default for ResultPanel {
    fn default() -> Self {
        Self {
            price: EMPTY_PRICE.to_string(),
            range_low: String::new(),
            range_high: String::new(),
            estimate: String::new(),
            tier: String::new(),
            insights: Vec::new(),
            range_visible: false,
            breakdown_visible: false,
            insights_visible: false,
        }
    }
}

/// Where the stacked (narrow) layout is scrolled to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollAnchor {
    #[default]
    Top,
    /// Result panel's top edge at the top of the viewport.
    Result,
}

/// All surfaces the renderer writes to. Owned by the dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSurfaces {
    pub panel: ResultPanel,
    pub map: MapView,
    pub composition: ChartSlot,
    pub impact: ChartSlot,
    pub scroll: ScrollAnchor,
    scroll_due: Option<Instant>,
}

impl Default for RenderSurfaces {
    fn default() -> Self {
        Self {
            panel: ResultPanel::default(),
            map: MapView::default(),
            composition: ChartSlot::new(ChartSlotId::Composition),
            impact: ChartSlot::new(ChartSlotId::Impact),
            scroll: ScrollAnchor::Top,
            scroll_due: None,
        }
    }
}

impl RenderSurfaces {
    /// Hide every result panel, recenter the map, and empty both chart slots.
    pub fn reset(&mut self, now: Instant) {
        self.panel = ResultPanel::default();
        self.map.fly_to(DEFAULT_CENTER, DEFAULT_ZOOM, now);
        self.map.move_marker(DEFAULT_CENTER);
        self.map.close_popup();
        self.composition.destroy();
        self.impact.destroy();
        self.scroll = ScrollAnchor::Top;
        self.scroll_due = None;
    }

    pub fn scroll_pending(&self) -> bool {
        self.scroll_due.is_some()
    }

    /// Fire a scheduled scroll once its delay has elapsed. Returns `true` if it fired.
    pub fn poll_scroll(&mut self, now: Instant) -> bool {
        match self.scroll_due {
            Some(due) if now >= due => {
                self.scroll_due = None;
                self.scroll = ScrollAnchor::Result;
                true
            }
            _ => false,
        }
    }
}

/// Writes prediction results to [`RenderSurfaces`].
#[derive(Debug, Clone)]
pub struct ResultRenderer {
    geo: GeoDirectory,
    narrow_width: u16,
    scroll_delay: Duration,
}

impl ResultRenderer {
    pub fn new(settings: &DashboardSettings) -> Self {
        Self {
            geo: GeoDirectory,
            narrow_width: settings.narrow_width,
            scroll_delay: settings.scroll_delay,
        }
    }

    pub fn is_narrow(&self, viewport_width: u16) -> bool {
        viewport_width < self.narrow_width
    }

    pub fn render(
        &self,
        surfaces: &mut RenderSurfaces,
        result: &PredictionResult,
        neighborhood: &str,
        viewport_width: u16,
        now: Instant,
    ) {
        render_panel(&mut surfaces.panel, result);

        match self.geo.lookup(neighborhood) {
            Some(point) => {
                surfaces.map.fly_to(point, CLOSE_ZOOM, now);
                surfaces.map.move_marker(point);
                surfaces.map.open_popup(neighborhood);
            }
            None => tracing::debug!(neighborhood, "unknown neighborhood, map left in place"),
        }

        surfaces.composition.replace(composition_chart(result));
        surfaces.impact.replace(impact_chart(&result.impact));

        // Panels just became visible; give the layout a moment before scrolling.
        if self.is_narrow(viewport_width) {
            surfaces.scroll_due = Some(now + self.scroll_delay);
        }
    }
}

fn render_panel(panel: &mut ResultPanel, result: &PredictionResult) {
    panel.price = format_currency(result.price);
    panel.range_low = format_currency(result.range_low);
    panel.range_high = format_currency(result.range_high);
    panel.estimate = format_currency(result.rf);
    panel.tier = result.tier.label().to_string();
    panel.range_visible = true;
    panel.breakdown_visible = true;

    if result.insights.is_empty() {
        panel.insights_visible = false;
        panel.insights.clear();
    } else {
        panel.insights_visible = true;
        panel.insights = result.insights.iter().map(|text| format!("\" {text} \"")).collect();
    }
}

/// Chart 1: raw estimate, tier index, final blended price.
pub fn composition_chart(result: &PredictionResult) -> BarChartSpec {
    BarChartSpec {
        orientation: BarOrientation::Vertical,
        bars: vec![
            Bar {
                label: "Asset Val",
                value: result.rf,
                color: Rgb::SLATE,
            },
            Bar {
                label: "Tier Index",
                value: result.tier.scale(),
                color: Rgb::INDIGO,
            },
            Bar {
                label: "Final Forecast",
                value: result.price,
                color: Rgb::RED,
            },
        ],
        corner_radius: 6,
        bar_thickness: None,
        show_legend: false,
        show_grid: true,
    }
}

/// Chart 2: feature impact scores, verbatim.
pub fn impact_chart(impact: &ImpactScores) -> BarChartSpec {
    BarChartSpec {
        orientation: BarOrientation::Horizontal,
        bars: ImpactScores::LABELS
            .iter()
            .zip(impact.values())
            .map(|(&label, value)| Bar {
                label,
                value,
                color: Rgb::RED,
            })
            .collect(),
        corner_radius: 8,
        bar_thickness: Some(15),
        show_legend: false,
        show_grid: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, Tier};

    fn result(tier: &str, insights: &[&str]) -> PredictionResult {
        PredictionResult {
            price: 212.4,
            range_low: 190.0,
            range_high: 1234.5,
            rf: 205.0,
            tier: Tier::from(tier),
            impact: ImpactScores {
                size: 0.42,
                beds: 0.21,
                baths: 0.12,
                amenities: 0.25,
            },
            insights: insights.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn renderer() -> ResultRenderer {
        ResultRenderer::new(&DashboardSettings::default())
    }

    #[test]
    fn panel_shows_currency_and_reveals_sections() {
        let mut surfaces = RenderSurfaces::default();
        assert!(!surfaces.panel.range_visible);

        renderer().render(&mut surfaces, &result("Standard Class", &[]), "Palo Alto", 200, Instant::now());

        let panel = &surfaces.panel;
        assert_eq!(panel.price, "$212.40");
        assert_eq!(panel.range_low, "$190.00");
        assert_eq!(panel.range_high, "$1,234.50");
        assert_eq!(panel.estimate, "$205.00");
        assert_eq!(panel.tier, "Standard Class");
        assert!(panel.range_visible && panel.breakdown_visible);
        assert!(!panel.insights_visible);
    }

    #[test]
    fn insights_are_quoted_in_order_and_hidden_when_empty() {
        let mut surfaces = RenderSurfaces::default();
        let r = renderer();
        let now = Instant::now();

        r.render(&mut surfaces, &result("x", &["Near Caltrain", "Weekend premium"]), "San Jose", 200, now);
        assert!(surfaces.panel.insights_visible);
        assert_eq!(surfaces.panel.insights, vec!["\" Near Caltrain \"", "\" Weekend premium \""]);

        r.render(&mut surfaces, &result("x", &[]), "San Jose", 200, now);
        assert!(!surfaces.panel.insights_visible);
        assert!(surfaces.panel.insights.is_empty());
    }

    #[test]
    fn known_neighborhood_flies_map_and_opens_popup() {
        let mut surfaces = RenderSurfaces::default();
        renderer().render(&mut surfaces, &result("x", &[]), "Palo Alto", 200, Instant::now());

        let palo_alto = GeoPoint::new(37.4419, -122.1430);
        assert_eq!(surfaces.map.center(), palo_alto);
        assert_eq!(surfaces.map.zoom(), CLOSE_ZOOM);
        assert_eq!(surfaces.map.marker().position, palo_alto);
        assert_eq!(surfaces.map.open_popup_label(), Some("Palo Alto"));
    }

    #[test]
    fn unknown_neighborhood_leaves_map_untouched() {
        let mut surfaces = RenderSurfaces::default();
        let r = renderer();
        let now = Instant::now();
        r.render(&mut surfaces, &result("x", &[]), "Gilroy", 200, now);
        let before = surfaces.map.clone();

        r.render(&mut surfaces, &result("x", &[]), "Atlantis", 200, now);

        assert_eq!(surfaces.map, before);
    }

    #[test]
    fn tier_bar_uses_fixed_scalar() {
        let bar = |tier: &str| composition_chart(&result(tier, &[])).bars[1].value;
        assert_eq!(bar("Luxury Class"), 300.0);
        assert_eq!(bar("Standard Class"), 150.0);
        assert_eq!(bar("Economy"), 75.0);
    }

    #[test]
    fn charts_carry_expected_bars() {
        let r = result("Luxury Class", &[]);
        let composition = composition_chart(&r);
        assert_eq!(composition.orientation, BarOrientation::Vertical);
        assert_eq!(composition.values(), vec![205.0, 300.0, 212.4]);
        assert!(!composition.show_legend);

        let impact = impact_chart(&r.impact);
        assert_eq!(impact.orientation, BarOrientation::Horizontal);
        assert_eq!(impact.values(), vec![0.42, 0.21, 0.12, 0.25]);
        assert_eq!(impact.bar_thickness, Some(15));
        assert!(!impact.show_grid);
    }

    #[test]
    fn repeated_renders_keep_one_live_chart_per_slot() {
        let mut surfaces = RenderSurfaces::default();
        let r = renderer();
        let now = Instant::now();
        r.render(&mut surfaces, &result("Luxury Class", &[]), "Campbell", 200, now);
        r.render(&mut surfaces, &result("Standard Class", &[]), "Campbell", 200, now);

        assert_eq!(surfaces.composition.live_count(), 1);
        assert_eq!(surfaces.impact.live_count(), 1);
        assert_eq!(surfaces.composition.live().unwrap().serial, 2);
        assert_eq!(surfaces.composition.live().unwrap().spec.bars[1].value, 150.0);
    }

    #[test]
    fn narrow_viewport_schedules_delayed_scroll() {
        let mut surfaces = RenderSurfaces::default();
        let r = renderer();
        let now = Instant::now();

        r.render(&mut surfaces, &result("x", &[]), "Campbell", 80, now);
        assert!(surfaces.scroll_pending());
        assert!(!surfaces.poll_scroll(now));
        assert_eq!(surfaces.scroll, ScrollAnchor::Top);

        assert!(surfaces.poll_scroll(now + Duration::from_millis(300)));
        assert_eq!(surfaces.scroll, ScrollAnchor::Result);
        assert!(!surfaces.scroll_pending());
    }

    #[test]
    fn wide_viewport_does_not_scroll() {
        let mut surfaces = RenderSurfaces::default();
        renderer().render(&mut surfaces, &result("x", &[]), "Campbell", 200, Instant::now());
        assert!(!surfaces.scroll_pending());
    }

    #[test]
    fn reset_clears_everything() {
        let mut surfaces = RenderSurfaces::default();
        let now = Instant::now();
        renderer().render(&mut surfaces, &result("x", &["a"]), "Palo Alto", 80, now);

        surfaces.reset(now);

        assert_eq!(surfaces.panel, ResultPanel::default());
        assert!(surfaces.composition.live().is_none());
        assert!(surfaces.impact.live().is_none());
        assert_eq!(surfaces.map.center(), DEFAULT_CENTER);
        assert_eq!(surfaces.map.zoom(), DEFAULT_ZOOM);
        assert_eq!(surfaces.map.marker().position, DEFAULT_CENTER);
        assert!(surfaces.map.open_popup_label().is_none());
        assert!(!surfaces.scroll_pending());
    }
}
