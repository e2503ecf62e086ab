use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use std::time::Instant;

use crate::{
    arena::Arena,
    countdown::Countdown,
    device::DeviceInfo,
    error::Result,
    history::HistoryDb,
    runtime::ArenaEvent,
    session::{GameSession, SessionConfig, SessionSummary},
    ui::AppLayout,
};

/// Finished rounds shown on the results overlay
pub const RECENT_ROUNDS: usize = 5;

/// Ties terminal events to the game session, its countdown and the
/// result history.
#[derive(Debug)]
pub struct App {
    pub session: GameSession,
    pub countdown: Countdown,
    pub device: DeviceInfo,
    pub history: Option<HistoryDb>,
    pub best_score: Option<u32>,
    pub recent: Vec<SessionSummary>,
    pub new_best: bool,
    pub layout: AppLayout,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: SessionConfig,
        device: DeviceInfo,
        history: Option<HistoryDb>,
        area: Rect,
    ) -> Self {
        let layout = AppLayout::compute(area);
        let arena = Arena::new(layout.arena.width, layout.arena.height);
        let (history, best_score, recent) = match history {
            Some(db) => match load_history(&db, config.round_secs) {
                Ok((best, recent)) => (Some(db), best, recent),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read history; continuing without it");
                    (None, None, Vec::new())
                }
            },
            None => (None, None, Vec::new()),
        };

        Self {
            session: GameSession::new(config, arena),
            countdown: Countdown::default(),
            device,
            history,
            best_score,
            recent,
            new_best: false,
            layout,
            should_quit: false,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.new_best = false;
        self.session.start();
        self.countdown.arm(now);
    }

    /// Stop the countdown so nothing fires into a torn-down session
    pub fn shutdown(&mut self) {
        self.countdown.cancel();
        self.should_quit = true;
    }

    /// Apply one runtime event. Returns true when the screen needs a redraw.
    pub fn handle(&mut self, event: ArenaEvent, now: Instant) -> bool {
        let mut dirty = self.poll_countdown(now);

        dirty |= match event {
            ArenaEvent::Tick => false,
            ArenaEvent::Resize(w, h) => {
                self.resize(Rect::new(0, 0, w, h));
                true
            }
            ArenaEvent::Press { column, row } => self.on_press(column, row, now),
            ArenaEvent::Key(key) => self.on_key(key, now),
        };

        dirty
    }

    fn poll_countdown(&mut self, now: Instant) -> bool {
        if !self.session.is_active() {
            self.countdown.cancel();
            return false;
        }

        let mut fired = false;
        while self.countdown.poll(now) {
            fired = true;
            if self.session.tick() {
                self.countdown.cancel();
                self.finish_session();
                break;
            }
        }
        fired
    }

    fn finish_session(&mut self) {
        let Some(summary) = self.session.summary() else {
            return;
        };

        let previous_best = self.best_score;
        self.new_best = summary.score > 0 && summary.score > previous_best.unwrap_or(0);
        if self.new_best {
            self.best_score = Some(summary.score);
        }

        if let Some(db) = &self.history {
            match db.record(&summary).and_then(|_| db.recent(RECENT_ROUNDS)) {
                Ok(recent) => self.recent = recent,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to record session; continuing without history");
                    self.history = None;
                }
            }
        }
    }

    fn on_press(&mut self, column: u16, row: u16, now: Instant) -> bool {
        if !self.session.is_active() {
            if self.layout.on_button(column, row) {
                self.start(now);
                return true;
            }
            return false;
        }

        let Some((x, y)) = self.layout.to_arena(column, row) else {
            return false;
        };

        match self.session.target() {
            Some(t) if t.contains(x, y, self.session.config.target_size) => {
                self.session.register_hit(x, y)
            }
            _ => false,
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');

        match key.code {
            _ if ctrl_c => {
                self.shutdown();
                false
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.shutdown();
                false
            }
            KeyCode::Enter | KeyCode::Char(' ') if !self.session.is_active() => {
                self.start(now);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, area: Rect) {
        self.layout = AppLayout::compute(area);
        self.session
            .resize(Arena::new(self.layout.arena.width, self.layout.arena.height));
    }

    #[cfg(test)]
    pub(crate) fn for_tests(width: u16, height: u16) -> Self {
        let device = DeviceInfo::from_env(|_| None, width, height, true);
        Self::new(
            SessionConfig::default(),
            device,
            None,
            Rect::new(0, 0, width, height),
        )
    }
}

fn load_history(db: &HistoryDb, round_secs: u32) -> Result<(Option<u32>, Vec<SessionSummary>)> {
    Ok((db.best_score(round_secs)?, db.recent(RECENT_ROUNDS)?))
}
