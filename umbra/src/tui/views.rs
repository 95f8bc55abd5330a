//! TUI views and rendering
//!
//! Views read a [`Snapshot`] and never mutate state, so every paint reflects
//! whatever the last key or frame wrote.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{Block, Borders, Clear, LineGauge, Paragraph, Wrap};

use super::state::AppState;
use crate::eclipse::visuals::MOON_RADIUS;
use crate::eclipse::{PHASES, Visuals};
use crate::showcase::Snapshot;

/// Vertical half-extent of the sky, in sun radii
const SKY_HALF_HEIGHT: f64 = 1.8;

/// Sampling step for the sun disk, in sun radii
const DISK_STEP: f64 = 0.02;

/// Corona rings drawn at full glow
const MAX_RINGS: usize = 8;

const DAY_SKY: (u8, u8, u8) = (70, 130, 200);
const NIGHT_SKY: (u8, u8, u8) = (6, 8, 22);

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    let snapshot = state.showcase.snapshot();
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Sky
            Constraint::Length(3), // Phase track
            Constraint::Length(3), // Scrubber
            Constraint::Length(6), // Caption
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(&snapshot, frame, chunks[0]);
    render_sky(&snapshot.visuals, frame, chunks[1]);
    render_phase_track(&snapshot, frame, chunks[2]);
    render_scrubber(&snapshot, frame, chunks[3]);
    render_caption(state, &snapshot, frame, chunks[4]);
    render_footer(frame, chunks[5]);

    if state.is_help() {
        render_help_overlay(frame, area);
    }
}

/// Render the header bar
fn render_header(snapshot: &Snapshot<'_>, frame: &mut Frame, area: Rect) {
    let (play_symbol, play_text, play_color) = if snapshot.playing {
        ("▶", "playing", Color::Green)
    } else {
        ("⏸", "paused", Color::Yellow)
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled("Umbra ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(snapshot.phase.label(), Style::default().fg(Color::Yellow)),
        Span::raw(" │ "),
        Span::styled(format!("{} {}", play_symbol, play_text), Style::default().fg(play_color)),
        Span::raw(" │ "),
        Span::styled(
            format!("speed ×{:.2}", snapshot.multiplier),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("coverage {:>3.0}%", snapshot.visuals.coverage * 100.0),
            Style::default().fg(Color::Blue),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Eclipse "));

    frame.render_widget(header, area);
}

/// Render the sun, moon and corona
fn render_sky(visuals: &Visuals, frame: &mut Frame, area: Rect) {
    let [x_bounds, y_bounds] = sky_bounds(area);
    let sky = sky_color(visuals.sky_light);
    let sun = sun_points(visuals);
    let rings = corona_rings(visuals);
    let corona = corona_color(visuals.glow_intensity);
    let moon_x = -visuals.shadow_offset;
    let show_moon = visuals.is_near;

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL))
        .marker(Marker::Braille)
        .background_color(sky)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            for radius in &rings {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: *radius,
                    color: corona,
                });
            }
            ctx.draw(&Points {
                coords: &sun,
                color: Color::Rgb(255, 214, 90),
            });
            if show_moon {
                ctx.draw(&Circle {
                    x: moon_x,
                    y: 0.0,
                    radius: MOON_RADIUS,
                    color: Color::Rgb(40, 40, 48),
                });
            }
        });

    frame.render_widget(canvas, area);
}

/// Render the six phase labels with the active one highlighted
fn render_phase_track(snapshot: &Snapshot<'_>, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(PHASES.len() * 2);
    for phase in PHASES {
        let style = if phase == snapshot.phase {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} {} ", phase.index() + 1, phase.label()), style));
        spans.push(Span::raw(" "));
    }

    let track = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title(" Phases "));
    frame.render_widget(track, area);
}

/// Render the progress scrubber
fn render_scrubber(snapshot: &Snapshot<'_>, frame: &mut Frame, area: Rect) {
    let gauge = LineGauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .filled_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .unfilled_style(Style::default().fg(Color::DarkGray))
        .ratio(snapshot.progress.value().clamp(0.0, 1.0))
        .label(format!("{} ", snapshot.progress));

    frame.render_widget(gauge, area);
}

/// Render the caption for the current phase
fn render_caption(state: &AppState, snapshot: &Snapshot<'_>, frame: &mut Frame, area: Rect) {
    let caption = snapshot.caption;
    let lines = vec![
        Line::from(Span::styled(
            caption.sentence.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            caption.moods().join(" · "),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
        )),
        Line::from(Span::styled(
            caption.reflection.as_str(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let title = format!(" {} · {} ", snapshot.phase.label(), state.narrative_label());
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Render the footer bar
fn render_footer(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" space", key),
        Span::raw(" Play/Pause "),
        Span::styled(" ←→", key),
        Span::raw(" Scrub "),
        Span::styled(" 1-6", key),
        Span::raw(" Phase "),
        Span::styled(" ?", key),
        Span::raw(" Help "),
        Span::styled(" q", key),
        Span::raw(" Quit "),
    ]));

    frame.render_widget(footer, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let key = Style::default().fg(Color::Cyan);
    let row = |keys: &'static str, action: &'static str| {
        Line::from(vec![Span::styled(format!("{:<14}", keys), key), Span::raw(action)])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
        row("space, p", "Play / pause"),
        row("r", "Restart from the beginning"),
        row("←/→", "Scrub by 0.001 (pauses)"),
        row("shift+←/→", "Scrub by 0.01"),
        row("h/l", "Scrub by 0.01"),
        row("Home/End", "Jump to start / end"),
        row("1-6", "Jump to a phase (pauses)"),
        Line::from(""),
        row("?, F1", "Toggle help"),
        row("q, Esc", "Quit"),
        row("Ctrl+c", "Force quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Canvas bounds that keep circles round
///
/// Terminal cells are roughly twice as tall as they are wide.
fn sky_bounds(area: Rect) -> [[f64; 2]; 2] {
    let width = area.width.max(1) as f64;
    let height = area.height.max(1) as f64;
    let half_width = SKY_HALF_HEIGHT * width / (2.0 * height);
    [[-half_width, half_width], [-SKY_HALF_HEIGHT, SKY_HALF_HEIGHT]]
}

/// Sky colour: daylight blue dimming toward night as coverage grows
fn sky_color(sky_light: f64) -> Color {
    let t = sky_light.clamp(0.0, 1.0);
    let mix = |night: u8, day: u8| (night as f64 + (day as f64 - night as f64) * t).round() as u8;
    Color::Rgb(
        mix(NIGHT_SKY.0, DAY_SKY.0),
        mix(NIGHT_SKY.1, DAY_SKY.1),
        mix(NIGHT_SKY.2, DAY_SKY.2),
    )
}

/// Pearly white at full glow, fading into a warm haze
fn corona_color(glow: f64) -> Color {
    let t = glow.clamp(0.0, 1.0);
    let channel = |low: f64, high: f64| (low + (high - low) * t).round() as u8;
    Color::Rgb(channel(150.0, 245.0), channel(130.0, 245.0), channel(110.0, 255.0))
}

/// Sample points of the sun disk not hidden by the moon
fn sun_points(visuals: &Visuals) -> Vec<(f64, f64)> {
    let moon_x = -visuals.shadow_offset;
    let steps = (2.0 / DISK_STEP).ceil() as i32;
    let mut points = Vec::new();
    for i in 0..=steps {
        let x = -1.0 + i as f64 * DISK_STEP;
        for j in 0..=steps {
            let y = -1.0 + j as f64 * DISK_STEP;
            if x * x + y * y > 1.0 {
                continue;
            }
            let dx = x - moon_x;
            if dx * dx + y * y <= MOON_RADIUS * MOON_RADIUS {
                continue;
            }
            points.push((x, y));
        }
    }
    points
}

/// Corona ring radii; empty while the corona is invisible
///
/// Ring count follows corona opacity and the outer edge follows blur radius.
fn corona_rings(visuals: &Visuals) -> Vec<f64> {
    let count = (visuals.corona_opacity * MAX_RINGS as f64).round() as usize;
    if count == 0 {
        return Vec::new();
    }
    let extent = visuals.blur_radius / 20.0;
    (1..=count)
        .map(|k| MOON_RADIUS + extent * k as f64 / MAX_RINGS as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eclipse::{Phase, Progress};
    use crate::narrative::builtin_entry;
    use crate::tui::state::InteractionMode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(state, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_render_shows_phase_and_caption() {
        let state = AppState::default();
        let screen = draw(&state);
        assert!(screen.contains("Before"));
        assert!(screen.contains("An ordinary afternoon"));
        assert!(screen.contains("playing"));
        assert!(screen.contains("built-in"));
    }

    #[test]
    fn test_render_reflects_jump_immediately() {
        let mut state = AppState::default();
        state.showcase.driver_mut().jump(Phase::Totality);
        let screen = draw(&state);
        let first_words: String = builtin_entry(Phase::Totality).sentence.chars().take(20).collect();
        assert!(screen.contains(&first_words));
        assert!(screen.contains("paused"));
    }

    #[test]
    fn test_help_overlay() {
        let mut state = AppState::default();
        state.interaction_mode = InteractionMode::Help;
        assert!(draw(&state).contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_sun_fully_hidden_at_midpoint() {
        let visuals = Visuals::from_progress(Progress::MIDPOINT);
        assert!(sun_points(&visuals).is_empty());

        let visuals = Visuals::from_progress(Progress::START);
        assert!(!sun_points(&visuals).is_empty());
    }

    #[test]
    fn test_corona_only_near_totality() {
        assert!(corona_rings(&Visuals::from_progress(Progress::START)).is_empty());

        let rings = corona_rings(&Visuals::from_progress(Progress::MIDPOINT));
        assert_eq!(rings.len(), MAX_RINGS);
        assert!(rings.windows(2).all(|w| w[0] < w[1]));
        assert!(rings[0] > MOON_RADIUS);
    }

    #[test]
    fn test_sky_color_endpoints() {
        assert_eq!(sky_color(1.0), Color::Rgb(DAY_SKY.0, DAY_SKY.1, DAY_SKY.2));
        assert_eq!(sky_color(0.0), Color::Rgb(NIGHT_SKY.0, NIGHT_SKY.1, NIGHT_SKY.2));
    }

    #[test]
    fn test_sky_bounds_keep_aspect() {
        let [x, y] = sky_bounds(Rect::new(0, 0, 80, 20));
        assert_eq!(y, [-SKY_HALF_HEIGHT, SKY_HALF_HEIGHT]);
        assert!((x[1] - SKY_HALF_HEIGHT * 2.0).abs() < 1e-12);
    }
}
