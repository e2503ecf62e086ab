use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEventKind};

pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaEvent {
    Key(KeyEvent),
    /// Primary-button press or touch at an absolute terminal cell
    Press { column: u16, row: u16 },
    Resize(u16, u16),
    Tick,
}

impl ArenaEvent {
    /// Maps a crossterm event to the subset the game reacts to
    pub fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(key) => Some(ArenaEvent::Key(key)),
            CtEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(ArenaEvent::Press {
                    column: mouse.column,
                    row: mouse.row,
                }),
                _ => None,
            },
            CtEvent::Resize(w, h) => Some(ArenaEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Source of terminal events (keyboard, pointer, resize)
pub trait ArenaEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<ArenaEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<ArenaEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(ev) = ArenaEvent::from_crossterm(ev) {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ArenaEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<ArenaEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<ArenaEvent>) -> Self {
        Self { rx }
    }
}

impl ArenaEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ArenaEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: ArenaEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: ArenaEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> ArenaEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                ArenaEvent::Tick
            }
        }
    }
}
