//! Terminal map: neighborhoods plotted on an equirectangular canvas.
//!
//! The visible span follows slippy-map zoom semantics (each level halves it),
//! so the county-wide default view and the close neighborhood view keep the
//! same proportions as a tiled web map.

use std::time::Instant;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Widget,
        canvas::{Canvas, Points},
    },
};

use crate::dashboard::map::MapView;
use crate::data::geo::GeoDirectory;

/// Longitude half-span at zoom 0, scaled so zoom 10 covers most of the county.
const BASE_HALF_SPAN_LON: f64 = 300.0;

/// Longitude/latitude half-spans for a (possibly fractional) zoom level.
pub fn half_spans(zoom: f64, width: u16, height: u16) -> (f64, f64) {
    let lon = BASE_HALF_SPAN_LON / 2f64.powf(zoom);
    // Terminal cells are roughly twice as tall as wide.
    let aspect = if width == 0 {
        1.0
    } else {
        f64::from(height) * 2.0 / f64::from(width)
    };
    (lon, lon * aspect)
}

pub struct MapWidget<'a> {
    pub map: &'a MapView,
    pub now: Instant,
}

impl<'a> Widget for MapWidget<'a> {
    fn render(self, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        let (center, zoom) = self.map.displayed(self.now);
        let (half_lon, half_lat) = half_spans(zoom, area.width, area.height);
        let marker = self.map.marker();
        let popup = self.map.open_popup_label().map(str::to_string);
        let title = format!("Map · zoom {:.0}", zoom);

        let canvas = Canvas::default()
            .block(Block::default().title(title).borders(Borders::ALL))
            .x_bounds([center.lon - half_lon, center.lon + half_lon])
            .y_bounds([center.lat - half_lat, center.lat + half_lat])
            .paint(move |ctx| {
                let coords: Vec<(f64, f64)> = GeoDirectory
                    .entries()
                    .map(|(_, p)| (p.lon, p.lat))
                    .collect();
                ctx.draw(&Points {
                    coords: &coords,
                    color: Color::DarkGray,
                });

                if zoom >= 11.5 {
                    for (name, p) in GeoDirectory.entries() {
                        ctx.print(
                            p.lon,
                            p.lat,
                            Span::styled(format!(" {name}"), Style::default().fg(Color::DarkGray)),
                        );
                    }
                }

                ctx.layer();
                ctx.print(
                    marker.position.lon,
                    marker.position.lat,
                    Span::styled("◆", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                );
                if let Some(label) = &popup {
                    ctx.print(
                        marker.position.lon,
                        marker.position.lat,
                        Line::from(vec![
                            Span::raw("  "),
                            Span::styled(
                                format!(" {label} "),
                                Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD),
                            ),
                        ]),
                    );
                }
            });

        canvas.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_zoom_level_halves_the_span() {
        let (lon10, _) = half_spans(10.0, 80, 40);
        let (lon13, _) = half_spans(13.0, 80, 40);
        assert!((lon10 / lon13 - 8.0).abs() < 1e-9);
    }

    #[test]
    fn default_view_covers_most_of_the_county() {
        let (lon, _) = half_spans(10.0, 80, 40);
        // Palo Alto to San Jose is about 0.26° of longitude.
        assert!(lon > 0.26 && lon < 0.5, "half span {lon}");
    }
}
