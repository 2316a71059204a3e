//! Ratatui-based terminal dashboard.
//!
//! The left column holds the listing form; the right column shows the price
//! panel, insights, the neighborhood map, and both charts. Below the narrow
//! width threshold the two columns stack and the view scrolls to the results
//! shortly after each render.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};

use crate::dashboard::chart::ChartSlot;
use crate::dashboard::render::ScrollAnchor;
use crate::dashboard::{Applied, DashboardController, TemporalContextResolver};
use crate::data::client::HttpPredictionClient;
use crate::data::geo::GeoDirectory;
use crate::domain::{DashboardMode, DashboardSettings, FormInputs, AVAILABILITY, ROOM_TYPES};
use crate::error::AppError;

mod map_canvas;
mod plotters_chart;

use map_canvas::MapWidget;
use plotters_chart::BarChartWidget;

/// Rows the form needs when stacked above the results.
const FORM_HEIGHT: u16 = 11;

/// Start the dashboard against the configured prediction endpoint.
pub fn run(settings: DashboardSettings) -> Result<(), AppError> {
    let client = HttpPredictionClient::new(&settings)?;
    let endpoint = client.endpoint().to_string();
    let controller = DashboardController::new(Arc::new(client), TemporalContextResolver::system(), &settings);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::terminal("Failed to initialize terminal", e))?;
    let width = terminal.size().map(|s| s.width).unwrap_or(settings.narrow_width);

    let mut app = App::new(controller, endpoint, width);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal("Failed to enable raw mode", e))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal("Failed to enter alternate screen", e));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Focusable form widgets, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Accommodates,
    Bedrooms,
    Bathrooms,
    Amenities,
    Neighborhood,
    RoomType,
    Available,
    Date,
}

impl Field {
    const FORM: [Field; 7] = [
        Field::Accommodates,
        Field::Bedrooms,
        Field::Bathrooms,
        Field::Amenities,
        Field::Neighborhood,
        Field::RoomType,
        Field::Available,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Accommodates => "Accommodates",
            Field::Bedrooms => "Bedrooms",
            Field::Bathrooms => "Bathrooms",
            Field::Amenities => "Amenities",
            Field::Neighborhood => "Neighborhood",
            Field::RoomType => "Room type",
            Field::Available => "Available",
            Field::Date => "Date",
        }
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Field::Accommodates | Field::Bedrooms | Field::Bathrooms | Field::Amenities | Field::Date
        )
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Field::Date => c.is_ascii_digit() || c == '-',
            _ if self.is_text() => c.is_ascii_digit() || matches!(c, '.' | '-' | '+'),
            _ => false,
        }
    }

    fn value(self, inputs: &FormInputs) -> &str {
        match self {
            Field::Accommodates => &inputs.acc,
            Field::Bedrooms => &inputs.bed,
            Field::Bathrooms => &inputs.bath,
            Field::Amenities => &inputs.amenities,
            Field::Neighborhood => &inputs.neighborhood,
            Field::RoomType => &inputs.room_type,
            Field::Available => &inputs.available,
            Field::Date => &inputs.manual_date,
        }
    }

    fn value_mut(self, inputs: &mut FormInputs) -> &mut String {
        match self {
            Field::Accommodates => &mut inputs.acc,
            Field::Bedrooms => &mut inputs.bed,
            Field::Bathrooms => &mut inputs.bath,
            Field::Amenities => &mut inputs.amenities,
            Field::Neighborhood => &mut inputs.neighborhood,
            Field::RoomType => &mut inputs.room_type,
            Field::Available => &mut inputs.available,
            Field::Date => &mut inputs.manual_date,
        }
    }
}

/// Focus order; the date input only takes part while it is shown.
fn field_order(date_visible: bool) -> Vec<Field> {
    let mut order = Field::FORM.to_vec();
    if date_visible {
        order.push(Field::Date);
    }
    order
}

fn step_field(current: Field, delta: i32, date_visible: bool) -> Field {
    let order = field_order(date_visible);
    let len = order.len() as i32;
    let idx = order.iter().position(|f| *f == current).unwrap_or(0) as i32;
    order[(idx + delta).rem_euclid(len) as usize]
}

/// Next option of a select widget. An unknown current value snaps to the first option.
fn cycle_option(options: &[&str], current: &str, delta: i32) -> String {
    if options.is_empty() {
        return current.to_string();
    }
    let len = options.len() as i32;
    let next = match options.iter().position(|o| *o == current) {
        Some(i) => (i as i32 + delta).rem_euclid(len),
        None => 0,
    };
    options[next as usize].to_string()
}

fn available_caption(value: &str) -> &'static str {
    match value {
        "t" => "yes",
        "f" => "no",
        _ => "?",
    }
}

struct App {
    controller: DashboardController,
    focus: Field,
    status: String,
    endpoint: String,
    viewport_width: u16,
    neighborhoods: Vec<&'static str>,
}

impl App {
    fn new(controller: DashboardController, endpoint: String, viewport_width: u16) -> Self {
        Self {
            controller,
            focus: Field::Accommodates,
            status: format!("Ready. Predictions from {endpoint}"),
            endpoint,
            viewport_width,
            neighborhoods: GeoDirectory.names().collect(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            let now = Instant::now();
            for applied in self.controller.poll(self.viewport_width, now) {
                self.on_applied(applied);
                needs_redraw = true;
            }
            if self.controller.tick(now) || self.controller.session().surfaces.map.is_animating(now) {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal("Terminal draw error", e))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(50)).map_err(|e| AppError::terminal("Event poll error", e))? {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal("Event read error", e))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(width, _) => {
                    self.viewport_width = width;
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn on_applied(&mut self, applied: Applied) {
        match applied {
            Applied::Rendered { seq } => {
                self.status = format!("Prediction #{seq} updated.");
            }
            Applied::Failed { seq, failure } => {
                self.status = format!("Prediction #{seq} failed: {failure}");
            }
            Applied::Stale { .. } => {}
        }
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') if ctrl => {
                self.controller.reset(Instant::now());
                self.focus = Field::Accommodates;
                self.status = "Dashboard reset.".to_string();
            }
            KeyCode::Tab => self.toggle_mode(),
            KeyCode::Enter => {
                let seq = self.controller.submit();
                self.status = format!("Requesting prediction #{seq}...");
            }
            KeyCode::Up => self.move_focus(-1),
            KeyCode::Down => self.move_focus(1),
            KeyCode::Left => self.cycle_select(-1),
            KeyCode::Right => self.cycle_select(1),
            KeyCode::PageDown => self.controller.scroll_to(ScrollAnchor::Result),
            KeyCode::PageUp => self.controller.scroll_to(ScrollAnchor::Top),
            KeyCode::Backspace if self.focus.is_text() => {
                self.focus.value_mut(self.controller.inputs_mut()).pop();
            }
            KeyCode::Char(c) if self.focus.accepts(c) => {
                self.focus.value_mut(self.controller.inputs_mut()).push(c);
            }
            _ => {}
        }
        false
    }

    fn toggle_mode(&mut self) {
        self.controller.toggle_mode();
        match self.controller.session().mode.mode() {
            DashboardMode::Manual => {
                self.focus = Field::Date;
                self.status = "Manual date: type YYYY-MM-DD.".to_string();
            }
            DashboardMode::Auto => {
                if self.focus == Field::Date {
                    self.focus = Field::Accommodates;
                }
                self.status = "Using today's date.".to_string();
            }
        }
    }

    fn move_focus(&mut self, delta: i32) {
        let date_visible = self.controller.session().mode.visibility().date_input;
        let next = step_field(self.focus, delta, date_visible);
        if self.focus == Field::Date && next != Field::Date {
            self.controller.set_date_focus(false);
        }
        if next == Field::Date {
            self.controller.set_date_focus(true);
        }
        self.focus = next;
    }

    fn cycle_select(&mut self, delta: i32) {
        let options: &[&str] = match self.focus {
            Field::Neighborhood => &self.neighborhoods,
            Field::RoomType => &ROOM_TYPES,
            Field::Available => &AVAILABILITY,
            _ => return,
        };
        let field = self.focus;
        let next = cycle_option(options, field.value(&self.controller.session().inputs), delta);
        *field.value_mut(self.controller.inputs_mut()) = next;
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        self.viewport_width = size.width;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let session = self.controller.session();
        let visibility = session.mode.visibility();

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("rd", Style::default().fg(Color::Cyan)),
            Span::raw(" — listing price forecast"),
            Span::styled(format!("  ({})", self.endpoint), Style::default().fg(Color::DarkGray)),
        ]));

        let mut mode_line: Vec<Span> = Vec::new();
        if visibility.auto_display {
            mode_line.push(Span::styled(
                session.mode.status_label().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }
        if visibility.date_input {
            let cursor = if visibility.date_input_focused { "▏" } else { "" };
            let style = if visibility.date_input_focused {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::White)
            };
            mode_line.push(Span::raw("Date: "));
            mode_line.push(Span::styled(format!("{}{cursor}", session.inputs.manual_date), style));
        }
        mode_line.push(Span::styled(
            format!(" | Tab: {}", session.mode.caption()),
            Style::default().fg(Color::Gray),
        ));
        if self.controller.is_awaiting() {
            mode_line.push(Span::styled(" | fetching...", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(mode_line));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if !self.controller.renderer().is_narrow(area.width) {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(40), Constraint::Min(0)])
                .split(area);
            self.draw_form(frame, chunks[0]);
            self.draw_results(frame, chunks[1]);
            return;
        }

        // Stacked layout: "scrolling" to the results hides the form.
        match self.controller.session().surfaces.scroll {
            ScrollAnchor::Top => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)])
                    .split(area);
                self.draw_form(frame, chunks[0]);
                self.draw_results(frame, chunks[1]);
            }
            ScrollAnchor::Result => self.draw_results(frame, area),
        }
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let session = self.controller.session();
        let order = field_order(session.mode.visibility().date_input);

        let items: Vec<ListItem> = order
            .iter()
            .map(|field| {
                let value = field.value(&session.inputs);
                let shown = match field {
                    Field::Available => format!("{value} ({})", available_caption(value)),
                    Field::Neighborhood | Field::RoomType => format!("‹ {value} ›"),
                    _ => value.to_string(),
                };
                ListItem::new(format!("{:<13} {shown}", field.label()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Listing").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(order.iter().position(|f| *f == self.focus));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(8), Constraint::Length(8)])
            .split(area);

        let panel = &self.controller.session().surfaces.panel;
        if panel.insights_visible {
            let top = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[0]);
            self.draw_price(frame, top[0]);
            self.draw_insights(frame, top[1]);
        } else {
            self.draw_price(frame, rows[0]);
        }

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);
        frame.render_widget(
            MapWidget {
                map: &self.controller.session().surfaces.map,
                now: Instant::now(),
            },
            middle[0],
        );

        let surfaces = &self.controller.session().surfaces;
        draw_chart(frame, middle[1], "Price composition", &surfaces.composition);
        draw_chart(frame, rows[2], "Feature impact", &surfaces.impact);
    }

    fn draw_price(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let panel = &self.controller.session().surfaces.panel;
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled("Nightly forecast", Style::default().fg(Color::Gray))));
        lines.push(Line::from(Span::styled(
            panel.price.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        if panel.range_visible {
            lines.push(Line::from(format!("Range {} – {}", panel.range_low, panel.range_high)));
        }
        if panel.breakdown_visible {
            lines.push(Line::from(vec![
                Span::styled("Model estimate ", Style::default().fg(Color::Gray)),
                Span::raw(panel.estimate.clone()),
                Span::styled("  Tier ", Style::default().fg(Color::Gray)),
                Span::raw(panel.tier.clone()),
            ]));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Forecast").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_insights(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let panel = &self.controller.session().surfaces.panel;
        let lines: Vec<Line> = panel
            .insights
            .iter()
            .map(|text| Line::from(Span::styled(text.clone(), Style::default().add_modifier(Modifier::ITALIC))))
            .collect();
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Insights").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ field  ←/→ choose  Enter predict  Tab date mode  ^R reset  PgUp/PgDn scroll  q quit";
        let status_style = if self.controller.session().last_failure.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, status_style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, slot: &ChartSlot) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    match slot.live() {
        Some(instance) => frame.render_widget(BarChartWidget { spec: &instance.spec }, inner),
        None => {
            let msg = Paragraph::new("Submit a listing to see this chart.").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(msg, inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wraps_and_skips_hidden_date_input() {
        assert_eq!(step_field(Field::Available, 1, false), Field::Accommodates);
        assert_eq!(step_field(Field::Available, 1, true), Field::Date);
        assert_eq!(step_field(Field::Accommodates, -1, true), Field::Date);
        // Focus left on the date input after it was hidden restarts from the top.
        assert_eq!(step_field(Field::Date, 1, false), Field::Bedrooms);
    }

    #[test]
    fn selects_cycle_through_options() {
        assert_eq!(cycle_option(&ROOM_TYPES, "Entire home/apt", 1), "Private room");
        assert_eq!(cycle_option(&ROOM_TYPES, "Entire home/apt", -1), "Hotel room");
        assert_eq!(cycle_option(&AVAILABILITY, "f", 1), "t");
        assert_eq!(cycle_option(&AVAILABILITY, "maybe", 1), "t");
    }

    #[test]
    fn numeric_fields_filter_keystrokes() {
        assert!(Field::Bathrooms.accepts('.'));
        assert!(Field::Accommodates.accepts('-'));
        assert!(!Field::Accommodates.accepts('x'));
        assert!(Field::Date.accepts('7'));
        assert!(!Field::Date.accepts('.'));
        assert!(!Field::RoomType.accepts('a'));
    }
}
