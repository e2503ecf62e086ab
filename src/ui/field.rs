use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::{ACCENT, HEADER_BACKGROUND, HIT, LABEL, TARGET};
use crate::app::App;
use crate::arena::{Target, TargetSize};
use crate::session::Hit;

pub const TARGET_GLYPH: &str = "🎯";
const NARROW_TARGET_GLYPH: &str = "◎";
const HIT_MARKER: &str = "✓";

const OVERLAY_WIDTH: u16 = 34;
const OVERLAY_HEIGHT: u16 = 10;

pub fn render_arena(app: &App, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let session = &app.session;
    render_trail(session.recent_hits(), area, buf);

    if let Some(target) = session.target() {
        render_target(target, session.config.target_size, area, buf);
    }
}

/// Rectangle of a target inside the arena, clipped to the arena
fn target_rect(target: &Target, size: TargetSize, area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(target.x),
        area.y.saturating_add(target.y),
        size.width,
        size.height,
    )
    .intersection(area)
}

fn render_target(target: &Target, size: TargetSize, area: Rect, buf: &mut Buffer) {
    let rect = target_rect(target, size, area);
    if rect.is_empty() {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(TARGET).add_modifier(Modifier::BOLD));
    let inner = block.inner(rect);
    block.render(rect, buf);

    let glyph = if inner.width as usize >= TARGET_GLYPH.width() {
        TARGET_GLYPH
    } else {
        NARROW_TARGET_GLYPH
    };

    if !inner.is_empty() {
        let row = inner.y + inner.height / 2;
        let col = inner.x + inner.width.saturating_sub(glyph.width() as u16) / 2;
        buf.set_stringn(col, row, glyph, inner.width as usize, Style::default().fg(TARGET));
    }
}

/// Older hits fade out; the newest markers are brightest.
fn marker_style(age: usize) -> Style {
    let style = Style::default().fg(HIT);
    match age {
        0..=2 => style.add_modifier(Modifier::BOLD),
        3..=6 => style,
        _ => style.add_modifier(Modifier::DIM),
    }
}

fn render_trail(hits: &[Hit], area: Rect, buf: &mut Buffer) {
    for (age, hit) in hits.iter().rev().enumerate() {
        if hit.x >= area.width || hit.y >= area.height {
            continue;
        }
        buf.set_string(area.x + hit.x, area.y + hit.y, HIT_MARKER, marker_style(age));
    }
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub fn render_game_over(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let rect = centered(OVERLAY_WIDTH, OVERLAY_HEIGHT, area);
    if rect.is_empty() {
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled("Game Over!", bold)),
        Line::from(Span::styled(
            format!("Final Score: {}", session.score()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Targets Hit: {}", session.hits().len())),
    ];

    if let Some(avg) = session.average_reaction_ms() {
        let spread = session
            .reaction_std_dev_ms()
            .map(|sd| format!(" ± {:.0}", sd))
            .unwrap_or_default();
        lines.push(Line::from(format!("Reaction: {:.0}{} ms", avg, spread)));
    }
    if let Some((lo, hi)) = session.reaction_range_ms() {
        lines.push(Line::from(format!("Range: {}–{} ms", lo, hi)));
    }

    if app.new_best {
        lines.push(Line::from(Span::styled(
            "New best!",
            Style::default().fg(HIT).add_modifier(Modifier::BOLD),
        )));
    } else if let Some(best) = app.best_score {
        lines.push(Line::from(format!("Best: {}", best)));
    }

    if !app.recent.is_empty() {
        let scores = app
            .recent
            .iter()
            .map(|r| r.score.to_string())
            .collect::<Vec<_>>()
            .join(" · ");
        lines.push(Line::from(Span::styled(
            format!("Recent: {}", scores),
            Style::default().fg(LABEL),
        )));
    }

    Clear.render(rect, buf);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT))
                .style(Style::default().bg(HEADER_BACKGROUND)),
        )
        .render(rect, buf);
}

pub fn render_idle_hint(area: Rect, buf: &mut Buffer) {
    let rect = centered(area.width, 1, area);
    if rect.is_empty() {
        return;
    }

    Paragraph::new(Span::styled(
        "click Start Game or press Enter",
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(rect, buf);
}
