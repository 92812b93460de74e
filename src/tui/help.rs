use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        keybind("Space", "Start / stop the timer"),
        keybind("0-9", "Record a lap tagged with that digit"),
        keybind("Esc", "Reset the session (clears all laps)"),
        keybind("s", "Save session CSV to the output directory"),
        keybind("e", "Export session JSON alongside the CSV"),
        keybind("y", "Copy the last exported path to the clipboard"),
        keybind("Tab", "Switch tabs"),
        keybind("?", "Show this help"),
        keybind("q / Ctrl-C", "Quit"),
        Line::from(""),
        Line::from("The lap tag is the digit you pressed, not a counter;"),
        Line::from("press the same digit as often as you like."),
        Line::from(""),
        Line::from("Saving with zero laps writes the metadata block only."),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}

fn keybind(key: &str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{key:<12}"), Style::default().fg(Color::Magenta)),
        Span::raw(action),
    ])
}
