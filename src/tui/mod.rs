mod export;
mod help;
mod state;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline, Tabs},
    Terminal,
};

use crate::format;
use crate::model::{DisplayState, SessionConfig};
use state::UiState;

/// Run the interactive session loop. The timer is only ever touched from
/// here: key dispatch mutates it, the redraw tick reads it.
pub fn run(cfg: SessionConfig) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut ui = UiState::default();
    if cfg.start_on_launch {
        ui.timer.start();
        ui.started_once = true;
    }

    let tick_rate = cfg.tick_interval;
    let mut last_tick = Instant::now();

    let res = loop {
        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &ui, &cfg)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match (k.modifiers, k.code) {
                    (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        break Ok(());
                    }
                    (_, KeyCode::Char(' ')) => {
                        ui.timer.toggle();
                        ui.started_once = true;
                    }
                    (_, KeyCode::Esc) => {
                        ui.timer.reset();
                        ui.started_once = false;
                        ui.last_exported_path = None;
                        ui.info = String::new();
                    }
                    (_, KeyCode::Char('s')) => {
                        if ui.tab == 0 {
                            export::save_and_show_path(&mut ui, &cfg);
                        }
                    }
                    (_, KeyCode::Char('e')) => {
                        if ui.tab == 0 {
                            export::export_json_and_show_path(&mut ui, &cfg);
                        }
                    }
                    (_, KeyCode::Char('y')) => {
                        if let Some(path) = ui.last_exported_path.clone() {
                            match export::copy_to_clipboard(&path) {
                                Ok(()) => ui.info = format!("Copied to clipboard: {path}"),
                                Err(e) => ui.info = format!("Clipboard copy failed: {e:#}"),
                            }
                        } else {
                            ui.info = "Nothing exported yet. Save a session first (s/e).".into();
                        }
                    }
                    (_, KeyCode::Tab) => {
                        ui.tab = (ui.tab + 1) % 2;
                    }
                    (_, KeyCode::Char('?')) => {
                        ui.tab = 1;
                    }
                    (_, KeyCode::Char(c)) if c.is_ascii_digit() => {
                        // Key-to-tag mapping is a UI concern; the timer only
                        // ever sees the digit.
                        match ui.timer.record_lap(c as u8 - b'0') {
                            Ok(Some(lap)) => {
                                ui.info = format!(
                                    "Lap [{}] {} (total {})",
                                    lap.tag,
                                    format::format_clock(lap.lap_seconds).unwrap_or_default(),
                                    format::format_clock(lap.total_seconds).unwrap_or_default()
                                );
                            }
                            // Stopped: recording requires a running timer.
                            Ok(None) => {}
                            Err(e) => ui.info = format!("Lap rejected: {e}"),
                        }
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn draw(area: Rect, f: &mut ratatui::Frame, ui: &UiState, cfg: &SessionConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Session"), Line::from("Help")])
        .select(ui.tab)
        .block(Block::default().borders(Borders::ALL).title("lap-timer-cli"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match ui.tab {
        0 => draw_session(chunks[1], f, ui, cfg),
        _ => help::draw_help(chunks[1], f),
    }
}

fn draw_session(area: Rect, f: &mut ratatui::Frame, ui: &UiState, cfg: &SessionConfig) {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4), // clock + status line
                Constraint::Min(0),    // lap feed + side column
                Constraint::Length(5), // session status row
            ]
            .as_ref(),
        )
        .split(area);

    draw_clock(main[0], f, ui);

    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(main[1]);

    draw_laps(mid[0], f, ui, cfg);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)].as_ref())
        .split(mid[1]);
    draw_lap_pace(side[0], f, ui);
    draw_shortcuts(side[1], f);

    draw_status(main[2], f, ui, cfg);
}

fn clock_style(ui: &UiState) -> Style {
    match ui.timer.display_state() {
        DisplayState::Running => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        DisplayState::Stopped if ui.started_once => {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        }
        DisplayState::Stopped => Style::default().add_modifier(Modifier::BOLD),
    }
}

fn status_text(ui: &UiState) -> &'static str {
    match ui.timer.display_state() {
        DisplayState::Running => "Running - Press Space to Stop",
        DisplayState::Stopped if ui.started_once => "Stopped - Press Space to Resume",
        DisplayState::Stopped => "Press Space to Start",
    }
}

fn draw_clock(area: Rect, f: &mut ratatui::Frame, ui: &UiState) {
    let clock = format::format_clock(ui.timer.current_elapsed()).unwrap_or_default();
    let p = Paragraph::new(vec![
        Line::from(Span::styled(clock, clock_style(ui))),
        Line::from(Span::styled(
            status_text(ui),
            Style::default().fg(Color::Gray),
        )),
    ])
    .centered()
    .block(Block::default().borders(Borders::ALL).title("Timer"));
    f.render_widget(p, area);
}

fn draw_laps(area: Rect, f: &mut ratatui::Frame, ui: &UiState, cfg: &SessionConfig) {
    let laps = ui.timer.laps();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Laps ({})", laps.len()));

    if laps.is_empty() {
        let empty = Paragraph::new("No laps recorded yet. Press 0-9 while the timer runs.")
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    // Keep the newest laps visible; older ones scroll off the top.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = laps.len().saturating_sub(visible);
    let lines: Vec<Line> = laps
        .iter()
        .skip(skip)
        .map(|lap| {
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", lap.tag),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(format::format_clock(lap.lap_seconds).unwrap_or_default()),
                Span::styled(
                    format!(
                        " (Total: {})",
                        format::format_clock(lap.total_seconds).unwrap_or_default()
                    ),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!(
                        " - {}",
                        format::format_time_of_day(lap.timestamp.to_offset(cfg.utc_offset))
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_lap_pace(area: Rect, f: &mut ratatui::Frame, ui: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Lap Pace");
    let series: Vec<u64> = ui
        .timer
        .laps()
        .iter()
        .map(|lap| (lap.lap_seconds * 100.0) as u64)
        .collect();

    if series.len() >= 2 {
        f.render_widget(
            Sparkline::default()
                .block(block)
                .data(&series)
                .style(Style::default().fg(Color::Cyan)),
            area,
        );
    } else {
        f.render_widget(
            Paragraph::new("Two laps needed for a pace trend.").block(block),
            area,
        );
    }
}

fn draw_shortcuts(area: Rect, f: &mut ratatui::Frame) {
    let lines = vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled("space", Style::default().fg(Color::Magenta)),
            Span::raw("  Start/Stop"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("0-9", Style::default().fg(Color::Magenta)),
            Span::raw("    Record lap"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("esc", Style::default().fg(Color::Magenta)),
            Span::raw("    Reset"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("s", Style::default().fg(Color::Magenta)),
            Span::raw("      Save CSV"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("e", Style::default().fg(Color::Magenta)),
            Span::raw("      Export JSON"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("?", Style::default().fg(Color::Magenta)),
            Span::raw("      Help"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw("      Quit"),
        ]),
    ];

    let shortcuts = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Keyboard Shortcuts"),
    );
    f.render_widget(shortcuts, area);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, ui: &UiState, cfg: &SessionConfig) {
    let state_span = match ui.timer.display_state() {
        DisplayState::Running => Span::styled("RUNNING", Style::default().fg(Color::Green)),
        DisplayState::Stopped => Span::styled("STOPPED", Style::default().fg(Color::Red)),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Session: ", Style::default().fg(Color::Gray)),
            Span::raw(
                cfg.session_name
                    .as_deref()
                    .unwrap_or("(named at save time)"),
            ),
            Span::raw("   "),
            Span::styled("Laps: ", Style::default().fg(Color::Gray)),
            Span::raw(ui.timer.laps().len().to_string()),
            Span::raw("   "),
            Span::styled("State: ", Style::default().fg(Color::Gray)),
            state_span,
        ]),
        Line::from(vec![
            Span::styled("Output: ", Style::default().fg(Color::Gray)),
            Span::raw(export::export_dir(cfg).display().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Info: ", Style::default().fg(Color::Gray)),
            Span::raw(ui.info.clone()),
        ]),
    ];

    let status =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}
