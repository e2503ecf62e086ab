use ratatui::Frame;

use crate::{
    app::App,
    session::Phase,
    ui::{field, AppLayout},
};

/// A UI Screen boundary: the shared header/arena widget plus a per-phase layer
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Before the first round: only the start control is live
pub struct IdleScreen;

impl Screen for IdleScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
        let layout = AppLayout::compute(f.area());
        field::render_idle_hint(layout.arena, f.buffer_mut());
    }
}

/// Round in progress: header stats and the live target
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Round over: results overlay, shown once something was scored
pub struct GameOverScreen;

impl Screen for GameOverScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
        if app.session.score() > 0 {
            let layout = AppLayout::compute(f.area());
            field::render_game_over(app, layout.arena, f.buffer_mut());
        }
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle => Box::new(IdleScreen),
        Phase::Active => Box::new(PlayingScreen),
        Phase::Ended => Box::new(GameOverScreen),
    }
}

/// Draw the whole frame for the app's current phase
pub fn draw(app: &App, f: &mut Frame) {
    current_screen(app.session.phase()).render(app, f);
}
