//! Plotters-powered bar chart widget for Ratatui.
//!
//! Plotters draws the bars (and the optional value grid); category labels,
//! bar values and rounded bar caps are written straight into the Ratatui buffer
//! afterwards, since terminal cells are too coarse for Plotters' own text layout.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
// `ratatui::style::Color` below shadows the prelude's trait of the same name.
use plotters::style::Color as _;
use plotters_ratatui_backend::{CHAR_PIXEL_SIZE, widget_fn};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::dashboard::chart::{BarChartSpec, BarOrientation, Rgb};

/// Width of the category label column for horizontal charts.
const LABEL_COLUMNS: u16 = 10;

/// Fraction of a category slot covered by a bar when no thickness is fixed.
const DEFAULT_FILL: f64 = 0.6;

/// Reference slot size (in chart-engine pixels) used to turn a fixed bar
/// thickness into a fraction of the slot.
const REFERENCE_SLOT: f64 = 40.0;

/// A render-only view over a [`BarChartSpec`].
pub struct BarChartWidget<'a> {
    pub spec: &'a BarChartSpec,
}

impl<'a> Widget for BarChartWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 24 || area.height < 5 || self.spec.bars.is_empty() {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        match self.spec.orientation {
            BarOrientation::Vertical => render_vertical(self.spec, area, buf),
            BarOrientation::Horizontal => render_horizontal(self.spec, area, buf),
        }
    }
}

fn fill_fraction(spec: &BarChartSpec) -> f64 {
    spec.bar_thickness
        .map(|t| (f64::from(t) / REFERENCE_SLOT).clamp(0.1, 0.9))
        .unwrap_or(DEFAULT_FILL)
}

fn plot_color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn cell_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

fn fmt_value(v: f64) -> String {
    if v.abs() >= 10.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn render_vertical(spec: &BarChartSpec, area: Rect, buf: &mut Buffer) {
    // Bottom row holds category labels.
    let plot = Rect {
        height: area.height - 1,
        ..area
    };
    let n = spec.bars.len();
    let y_max = spec.value_max() * 1.15;
    let half = fill_fraction(spec) / 2.0;
    let show_grid = spec.show_grid;
    let bars = spec.bars.clone();

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(0)
            .build_cartesian_2d(0.0..n as f64, 0.0..y_max)?;

        if show_grid {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .y_labels(4)
                .bold_line_style(&RGBColor(70, 70, 70))
                .axis_style(&RGBColor(120, 120, 120))
                .draw()?;
        }

        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let center = i as f64 + 0.5;
            Rectangle::new(
                [(center - half, 0.0), (center + half, bar.value.max(0.0))],
                plot_color(bar.color).filled(),
            )
        }))?;

        Ok(())
    });
    widget.render(plot, buf);

    let slot = f64::from(plot.width) / n as f64;
    for (i, bar) in spec.bars.iter().enumerate() {
        let center = plot.x + (slot * (i as f64 + 0.5)).round() as u16;

        let label = truncate(bar.label, slot.floor() as usize);
        let label_x = center.saturating_sub(label.chars().count() as u16 / 2).max(area.x);
        buf.set_string(label_x, area.y + area.height - 1, &label, Style::default().fg(Color::Gray));

        // Value just above the bar top.
        let frac = (bar.value.max(0.0) / y_max).clamp(0.0, 1.0);
        let bar_rows = (f64::from(plot.height) * frac).round() as u16;
        let value_y = (plot.y + plot.height).saturating_sub(bar_rows + 1).max(plot.y);
        let value = fmt_value(bar.value);
        let value_x = center.saturating_sub(value.chars().count() as u16 / 2).max(area.x);
        buf.set_string(value_x, value_y, &value, Style::default().fg(cell_color(bar.color)));

        if spec.corner_radius > 0 && bar_rows > 0 {
            let left = plot.x + (slot * (i as f64 + 0.5 - half)).round() as u16;
            let right = (plot.x + (slot * (i as f64 + 0.5 + half)).round() as u16).saturating_sub(1);
            if right > left {
                let top = plot.y + plot.height - bar_rows;
                let style = Style::default().fg(cell_color(bar.color));
                buf.set_string(left, top, "╭", style);
                buf.set_string(right, top, "╮", style);
            }
        }
    }
}

fn render_horizontal(spec: &BarChartSpec, area: Rect, buf: &mut Buffer) {
    // Left columns hold category labels; the rightmost columns hold values.
    let value_columns = 7;
    let plot = Rect {
        x: area.x + LABEL_COLUMNS,
        width: area.width - LABEL_COLUMNS - value_columns,
        ..area
    };
    let n = spec.bars.len();
    let x_max = spec.value_max() * 1.05;
    let half = fill_fraction(spec) / 2.0;
    let show_grid = spec.show_grid;
    let bars = spec.bars.clone();

    let widget = widget_fn(move |root| {
        // Bottom cell row holds the value axis.
        let mut chart = ChartBuilder::on(&root)
            .margin(0)
            .x_label_area_size(CHAR_PIXEL_SIZE)
            .build_cartesian_2d(0.0..x_max, 0.0..n as f64)?;

        let fmt_tick = |v: &f64| fmt_value(*v);
        let tick_style = ("sans-serif", 10).into_font().color(&RGBColor(160, 160, 160));

        // The axis is always drawn; `show_grid` only controls the gridlines.
        let mut mesh = chart.configure_mesh();
        mesh.disable_y_mesh()
            .x_labels(4)
            .x_label_formatter(&fmt_tick)
            .label_style(tick_style)
            .axis_style(&RGBColor(120, 120, 120))
            .bold_line_style(&RGBColor(70, 70, 70));
        if !show_grid {
            mesh.disable_x_mesh();
        }
        mesh.draw()?;

        // First bar at the top.
        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let center = (n - 1 - i) as f64 + 0.5;
            Rectangle::new(
                [(0.0, center - half), (bar.value.max(0.0), center + half)],
                plot_color(bar.color).filled(),
            )
        }))?;

        Ok(())
    });
    widget.render(plot, buf);

    let bar_rows = plot.height - 1;
    let slot = f64::from(bar_rows) / n as f64;
    for (i, bar) in spec.bars.iter().enumerate() {
        let row = plot.y + ((slot * (i as f64 + 0.5)).floor() as u16).min(bar_rows - 1);
        let label = truncate(bar.label, usize::from(LABEL_COLUMNS - 1));
        buf.set_string(area.x, row, &label, Style::default().fg(Color::Gray));

        let frac = (bar.value.max(0.0) / x_max).clamp(0.0, 1.0);
        let end = plot.x + (f64::from(plot.width) * frac).round() as u16;
        buf.set_string(end + 1, row, fmt_value(bar.value), Style::default().fg(cell_color(bar.color)));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::chart::Bar;

    fn spec(orientation: BarOrientation, thickness: Option<u8>) -> BarChartSpec {
        BarChartSpec {
            orientation,
            bars: vec![Bar {
                label: "Final Forecast",
                value: 120.0,
                color: Rgb::RED,
            }],
            corner_radius: 6,
            bar_thickness: thickness,
            show_legend: false,
            show_grid: false,
        }
    }

    #[test]
    fn thickness_maps_to_slot_fraction() {
        assert_eq!(fill_fraction(&spec(BarOrientation::Vertical, None)), DEFAULT_FILL);
        assert!((fill_fraction(&spec(BarOrientation::Horizontal, Some(15))) - 0.375).abs() < 1e-9);
        assert_eq!(fill_fraction(&spec(BarOrientation::Horizontal, Some(200))), 0.9);
    }

    #[test]
    fn labels_truncate_with_marker() {
        assert_eq!(truncate("Amenities", 9), "Amenities");
        assert_eq!(truncate("Final Forecast", 6), "Final.");
    }

    fn composition(corner_radius: u8) -> BarChartSpec {
        BarChartSpec {
            orientation: BarOrientation::Vertical,
            bars: vec![
                Bar {
                    label: "Asset Val",
                    value: 100.0,
                    color: Rgb::SLATE,
                },
                Bar {
                    label: "Tier Index",
                    value: 150.0,
                    color: Rgb::INDIGO,
                },
                Bar {
                    label: "Final Forecast",
                    value: 200.0,
                    color: Rgb::RED,
                },
            ],
            corner_radius,
            bar_thickness: None,
            show_legend: false,
            show_grid: true,
        }
    }

    fn rendered(spec: &BarChartSpec, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        BarChartWidget { spec }.render(area, &mut buf);
        buf
    }

    fn count_symbol(buf: &Buffer, symbol: &str) -> usize {
        buf.content.iter().filter(|cell| cell.symbol() == symbol).count()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn vertical_chart_draws_labels_under_bars() {
        let buf = rendered(&composition(6), 48, 12);
        let bottom = row_text(&buf, 11);
        assert!(bottom.contains("Asset Val"), "bottom row: {bottom:?}");
        assert!(bottom.contains("Tier Index"), "bottom row: {bottom:?}");
    }

    #[test]
    fn rounded_caps_follow_corner_radius() {
        let buf = rendered(&composition(6), 48, 12);
        assert_eq!(count_symbol(&buf, "╭"), 3);
        assert_eq!(count_symbol(&buf, "╮"), 3);

        let square = rendered(&composition(0), 48, 12);
        assert_eq!(count_symbol(&square, "╭"), 0);
    }

    #[test]
    fn horizontal_chart_labels_each_bar_above_axis_row() {
        let spec = BarChartSpec {
            orientation: BarOrientation::Horizontal,
            bars: ["Size", "Beds", "Baths", "Amenities"]
                .into_iter()
                .zip([0.4, 0.2, 0.1, 0.3])
                .map(|(label, value)| Bar {
                    label,
                    value,
                    color: Rgb::RED,
                })
                .collect(),
            corner_radius: 8,
            bar_thickness: Some(15),
            show_legend: false,
            show_grid: false,
        };
        let buf = rendered(&spec, 48, 9);
        let labels: Vec<String> = (0..8).map(|y| row_text(&buf, y)).collect();
        for label in ["Size", "Beds", "Baths", "Amenities"] {
            assert!(labels.iter().any(|row| row.starts_with(label)), "missing {label}");
        }
        // The last row belongs to the value axis.
        assert!(!row_text(&buf, 8).starts_with("Amenities"));
    }

    #[test]
    fn tiny_area_renders_hint_instead_of_chart() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        BarChartWidget {
            spec: &spec(BarOrientation::Vertical, None),
        }
        .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "C");
    }
}
