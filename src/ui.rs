pub mod field;
pub mod hud;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Widget},
};

use crate::app::App;

pub const BACKGROUND: Color = Color::Rgb(10, 14, 39);
pub const HEADER_BACKGROUND: Color = Color::Rgb(26, 31, 58);
pub const PANEL_BACKGROUND: Color = Color::Rgb(15, 20, 32);
pub const BORDER: Color = Color::Rgb(42, 63, 95);
pub const ACCENT: Color = Color::Rgb(79, 195, 247);
pub const LABEL: Color = Color::Rgb(136, 136, 136);
pub const HIT: Color = Color::Rgb(76, 175, 80);
pub const TARGET: Color = Color::Rgb(255, 107, 107);

const TITLE_HEIGHT: u16 = 1;
const DEVICE_HEIGHT: u16 = 5;
const STATS_HEIGHT: u16 = 2;
const BUTTON_HEIGHT: u16 = 3;
/// title + device box + stats + start control + bottom border
pub const HEADER_HEIGHT: u16 = TITLE_HEIGHT + DEVICE_HEIGHT + STATS_HEIGHT + BUTTON_HEIGHT + 1;

/// Screen regions, recomputed on every resize. Presses are routed by
/// comparing their cell against these rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppLayout {
    pub header: Rect,
    pub title: Rect,
    pub device: Rect,
    pub stats: Rect,
    pub button: Rect,
    pub arena: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
            .split(area);

        let header = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(1)
            .constraints([
                Constraint::Length(TITLE_HEIGHT),
                Constraint::Length(DEVICE_HEIGHT),
                Constraint::Length(STATS_HEIGHT),
                Constraint::Length(BUTTON_HEIGHT),
                Constraint::Min(0),
            ])
            .split(outer[0]);

        Self {
            header: outer[0],
            title: header[0],
            device: header[1],
            stats: header[2],
            button: header[3],
            arena: outer[1],
        }
    }

    /// Arena-relative cell for an absolute terminal cell, if inside the arena
    pub fn to_arena(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        contains(self.arena, column, row).then(|| (column - self.arena.x, row - self.arena.y))
    }

    pub fn on_button(&self, column: u16, row: u16) -> bool {
        contains(self.button, column, row)
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .style(Style::default().bg(BACKGROUND).fg(Color::White))
            .render(area, buf);

        let layout = AppLayout::compute(area);
        hud::render_header(self, &layout, buf);
        field::render_arena(self, layout.arena, buf);
    }
}
