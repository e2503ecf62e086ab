use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use super::{AppLayout, ACCENT, BORDER, HEADER_BACKGROUND, LABEL, PANEL_BACKGROUND};
use crate::app::App;

pub const TITLE: &str = "Arena Targeting";

/// Label on the start control: a fresh player starts, a returning one plays again
pub fn start_label(score: u32) -> &'static str {
    if score > 0 {
        "Play Again"
    } else {
        "Start Game"
    }
}

pub fn render_header(app: &App, layout: &AppLayout, buf: &mut Buffer) {
    Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(BORDER))
        .style(Style::default().bg(HEADER_BACKGROUND))
        .render(layout.header, buf);

    Paragraph::new(Span::styled(
        TITLE,
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(layout.title, buf);

    render_device(app, layout.device, buf);
    render_stats(app, layout.stats, buf);
    render_control(app, layout.button, buf);
}

fn render_device(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let device = &app.device;

    let lines = vec![
        Line::from(vec![
            Span::styled("Device: ", bold),
            Span::raw(device.device_label()),
        ]),
        Line::from(vec![
            Span::styled("Screen: ", bold),
            Span::raw(format!("{} × {}", device.screen_width, device.screen_height)),
        ]),
        Line::from(vec![
            Span::styled("Touch: ", bold),
            Span::raw(device.touch_label()),
        ]),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER))
                .style(Style::default().bg(PANEL_BACKGROUND)),
        )
        .render(area, buf);
}

fn render_stats(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let stats = [
        ("Score", session.score().to_string()),
        ("Time", format!("{}s", session.time_remaining())),
        ("Accuracy", format!("{}%", session.accuracy_percent())),
    ];

    for ((label, value), column) in stats.into_iter().zip(columns.iter()) {
        Paragraph::new(vec![
            Line::from(Span::styled(label, Style::default().fg(LABEL))),
            Line::from(Span::styled(
                value,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .render(*column, buf);
    }
}

fn render_control(app: &App, area: Rect, buf: &mut Buffer) {
    if app.session.is_active() {
        Paragraph::new(Span::styled(
            "tap the target  ·  (esc)ape",
            Style::default().fg(LABEL).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
        return;
    }

    Paragraph::new(Span::styled(
        start_label(app.session.score()),
        Style::default()
            .fg(HEADER_BACKGROUND)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT))
            .style(Style::default().bg(ACCENT)),
    )
    .render(area, buf);
}
