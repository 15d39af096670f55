// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based depth viewer
//!
//! Renders the depth frame with Unicode half-block characters (two pixel rows
//! per terminal cell). Drag with the left mouse button to select a region;
//! calibration and snapshots are bound to single keys.

use crate::backends::DepthSource;
use crate::config::Config;
use crate::depth::{DepthFrame, RegionOfInterest, RoiBounds};
use crate::session::{CalibrationTarget, Measurement, Session};
use crate::storage;
use crate::visualization::DepthColorizer;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Gauge, Paragraph, Widget},
};
use std::io::{self, stdout};
use std::time::Duration;
use tracing::{error, info};

/// Run the terminal viewer until the user quits
pub fn run(
    source: Box<dyn DepthSource>,
    config: &Config,
    initial_roi: Option<RegionOfInterest>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, source, config, initial_roi);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut source: Box<dyn DepthSource>,
    config: &Config,
    initial_roi: Option<RegionOfInterest>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(source = source.name(), "Starting terminal viewer");

    let mut session = Session::new(config);
    if let Some(hfov) = source.hfov_degrees() {
        session.calculator.set_hfov_deg(hfov);
    }
    if let Some(roi) = initial_roi {
        session.selector.set(roi);
    }

    let base_colorizer = DepthColorizer::new(session.calculator.range(), config.grayscale);
    let mut status_message = build_status_message();
    let mut show_help = false;
    let mut viewport: Option<Viewport> = None;

    loop {
        let frame = source.next_frame()?;
        let colorizer = base_colorizer.fit_to_frame(&frame);
        let measurement = session.measure(&frame);

        terminal.draw(|f| {
            let area = f.area();
            let [main_area, status_area] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
            let [view_area, panel_area] =
                Layout::horizontal([Constraint::Min(10), Constraint::Length(30)]).areas(main_area);

            let vp = Viewport::fit(view_area, frame.width, frame.height);
            let view = DepthView {
                frame: &frame,
                colorizer: &colorizer,
                viewport: vp,
                roi: session
                    .selector
                    .roi()
                    .map(|r| r.resolve(frame.width, frame.height, session.calculator.delta())),
                pending: session
                    .selector
                    .pending()
                    .map(|r| r.resolve(frame.width, frame.height, 0)),
            };
            f.render_widget(view, view_area);
            viewport = Some(vp);

            render_panel(f, panel_area, measurement.as_ref());

            f.render_widget(
                Paragraph::new(status_message.as_str()).style(Style::default().fg(Color::Gray)),
                status_area,
            );
        })?;

        if !event::poll(Duration::from_millis(
            crate::constants::timing::INPUT_POLL_MS,
        ))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('c') => {
                        session.selector.clear();
                        status_message = "ROI cleared".to_string();
                    }
                    KeyCode::Char('g') => {
                        status_message =
                            calibrate(&mut session, &frame, CalibrationTarget::Ground);
                    }
                    KeyCode::Char('f') => {
                        status_message = calibrate(&mut session, &frame, CalibrationTarget::Full);
                    }
                    KeyCode::Char('r') => {
                        session.analyzer.reset();
                        status_message = "Calibration reset".to_string();
                    }
                    KeyCode::Char('s') => {
                        let dir = storage::snapshot_directory(&config.save_folder);
                        status_message = match storage::save_snapshot(
                            &dir,
                            source.name(),
                            &frame,
                            &colorizer,
                            measurement.as_ref(),
                        ) {
                            Ok(paths) => format!("Saved: {}", paths.image.display()),
                            Err(e) => {
                                error!("Failed to save snapshot: {}", e);
                                format!("Error: {}", e)
                            }
                        };
                    }
                    KeyCode::Char('h') => {
                        show_help = !show_help;
                        status_message = if show_help {
                            build_help_message()
                        } else {
                            build_status_message()
                        };
                    }
                    _ => {}
                }
            }
            Event::Mouse(mouse) => {
                let Some(vp) = viewport else { continue };
                let (x, y) = vp.cell_to_pixel(mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) if vp.contains(mouse.column, mouse.row) => {
                        session.selector.press(x, y)
                    }
                    MouseEventKind::Drag(MouseButton::Left) => session.selector.drag(x, y),
                    MouseEventKind::Up(MouseButton::Left) if session.selector.is_drawing() => {
                        session.selector.release(x, y);
                        if let Some(roi) = session.selector.roi() {
                            info!(%roi, "ROI selected");
                            status_message = format!("ROI {}", roi);
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn calibrate(session: &mut Session, frame: &DepthFrame, target: CalibrationTarget) -> String {
    let label = match target {
        CalibrationTarget::Ground => "Empty box distance",
        CalibrationTarget::Full => "Full box depth",
    };
    match session.calibrate(frame, target) {
        Ok(Some(depth)) => format!("{} calibrated: {:.0}mm", label, depth),
        Ok(None) => "Draw a ROI first".to_string(),
        Err(e) => format!("Error: {}", e),
    }
}

fn build_status_message() -> String {
    "drag: ROI | 'g' empty | 'f' full | 'c' clear | 's' save | 'h' help | 'q' quit".to_string()
}

fn build_help_message() -> String {
    "g: Calibrate empty box | f: Calibrate full box | r: Reset calibration | c: Clear ROI | s: Snapshot | q/Ctrl+C: Quit"
        .to_string()
}

fn render_panel(f: &mut ratatui::Frame, area: Rect, measurement: Option<&Measurement>) {
    let [text_area, gauge_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(area);

    let lines: Vec<Line> = match measurement {
        Some(m) => m.report_lines().into_iter().map(Line::from).collect(),
        None => vec![
            Line::from("1. Drag to draw ROI"),
            Line::from("2. 'g' calibrate empty box"),
            Line::from("3. 'f' calibrate full box"),
            Line::from("4. 'c' clear ROI"),
            Line::from("5. 'q' quit"),
        ],
    };
    f.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Spatials")),
        text_area,
    );

    if let Some(fullness) = measurement.and_then(|m| m.fullness) {
        let gauge = Gauge::default()
            .block(Block::bordered().title("Fill"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio((fullness as f64 / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.1}%", fullness));
        f.render_widget(gauge, gauge_area);
    }
}

/// Placement of a frame inside a terminal area
///
/// Each cell shows two vertically stacked pixels, so a frame row pair maps to
/// one terminal row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: u16,
    pub y: u16,
    /// Columns used
    pub cols: u16,
    /// Rows used
    pub rows: u16,
    /// Frame pixels per column
    pub x_scale: f64,
    /// Frame pixels per half-row
    pub y_scale: f64,
    frame_width: u32,
    frame_height: u32,
}

impl Viewport {
    /// Fit a frame into `area` keeping its aspect ratio, centered
    pub fn fit(area: Rect, frame_width: u32, frame_height: u32) -> Self {
        let frame_aspect = frame_width.max(1) as f64 / frame_height.max(1) as f64;
        let term_width = area.width as f64;
        let term_height = (area.height as f64) * 2.0;

        let (cols, rows) = if term_height == 0.0 || term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            ((term_height * frame_aspect) as u16, area.height)
        } else {
            // Terminal is taller - fit to width
            (area.width, (term_width / frame_aspect / 2.0) as u16)
        };
        let cols = cols.max(1);
        let rows = rows.max(1);

        Self {
            x: area.x + area.width.saturating_sub(cols) / 2,
            y: area.y + area.height.saturating_sub(rows) / 2,
            cols,
            rows,
            x_scale: frame_width as f64 / cols as f64,
            y_scale: frame_height as f64 / (rows as f64 * 2.0),
            frame_width,
            frame_height,
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x + self.cols && row >= self.y && row < self.y + self.rows
    }

    /// Frame pixel under a cell, clamped to the frame
    pub fn cell_to_pixel(&self, col: u16, row: u16) -> (i32, i32) {
        let cx = (col as f64 - self.x as f64 + 0.5) * self.x_scale;
        let cy = ((row as f64 - self.y as f64) * 2.0 + 1.0) * self.y_scale;
        (
            cx.clamp(0.0, self.frame_width.saturating_sub(1) as f64) as i32,
            cy.clamp(0.0, self.frame_height.saturating_sub(1) as f64) as i32,
        )
    }

    /// Cell showing a frame pixel
    pub fn pixel_to_cell(&self, px: u32, py: u32) -> (u16, u16) {
        let col = ((px as f64 / self.x_scale) as u16).min(self.cols.saturating_sub(1));
        let row = ((py as f64 / (self.y_scale * 2.0)) as u16).min(self.rows.saturating_sub(1));
        (self.x + col, self.y + row)
    }
}

/// Depth frame with region overlays
struct DepthView<'a> {
    frame: &'a DepthFrame,
    colorizer: &'a DepthColorizer,
    viewport: Viewport,
    roi: Option<RoiBounds>,
    pending: Option<RoiBounds>,
}

impl Widget for DepthView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let vp = self.viewport;
        let max_x = self.frame.width.saturating_sub(1);
        let max_y = self.frame.height.saturating_sub(1);

        for ty in 0..vp.rows {
            for tx in 0..vp.cols {
                let term_x = vp.x + tx;
                let term_y = vp.y + ty;
                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = ((tx as f64 * vp.x_scale) as u32).min(max_x);
                let src_y_top = ((ty as f64 * 2.0 * vp.y_scale) as u32).min(max_y);
                let src_y_bottom = (((ty as f64 * 2.0 + 1.0) * vp.y_scale) as u32).min(max_y);

                let top = self.sample(src_x, src_y_top);
                let bottom = self.sample(src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(top);
                    cell.set_bg(bottom);
                }
            }
        }

        if let Some(bounds) = self.roi {
            draw_outline(buf, area, &vp, &bounds, Color::Green);
        }
        if let Some(bounds) = self.pending {
            draw_outline(buf, area, &vp, &bounds, Color::Yellow);
        }
    }
}

impl DepthView<'_> {
    fn sample(&self, x: u32, y: u32) -> Color {
        let [r, g, b] = self.colorizer.color(self.frame.get(x, y).unwrap_or(0));
        Color::Rgb(r, g, b)
    }
}

fn draw_outline(buf: &mut Buffer, area: Rect, vp: &Viewport, bounds: &RoiBounds, color: Color) {
    if bounds.area() == 0 {
        return;
    }
    let (c0, r0) = vp.pixel_to_cell(bounds.xmin, bounds.ymin);
    let (c1, r1) = vp.pixel_to_cell(bounds.xmax - 1, bounds.ymax - 1);

    for row in r0..=r1 {
        for col in c0..=c1 {
            let on_edge = row == r0 || row == r1 || col == c0 || col == c1;
            if !on_edge || !area.contains((col, row).into()) {
                continue;
            }
            if let Some(cell) = buf.cell_mut((col, row)) {
                cell.set_char('█');
                cell.set_fg(color);
            }
        }
    }
}
