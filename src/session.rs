use chrono::{DateTime, Local};
use itertools::{Itertools, MinMaxResult};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::time::{Duration, SystemTime};

use crate::arena::{Arena, Target, TargetSize};
use crate::util::{mean, ratio, std_dev};

pub const DEFAULT_ROUND_SECS: u32 = 30;
/// Number of most recent hits shown in the arena trail
pub const VISIBLE_HITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub round_secs: u32,
    pub target_size: TargetSize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_secs: DEFAULT_ROUND_SECS,
            target_size: TargetSize::default(),
        }
    }
}

/// A recorded press on the target, in absolute arena coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub x: u16,
    pub y: u16,
    pub timestamp: SystemTime,
    /// time between the target appearing and this press
    pub reaction: Duration,
}

/// Result of an ended session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub finished_at: DateTime<Local>,
    pub round_secs: u32,
    pub score: u32,
    pub hits: u32,
    pub accuracy: u32,
    pub avg_reaction_ms: Option<f64>,
}

/// One play-through: score, countdown, active target and hit history.
///
/// `Idle -> Active -> Ended -> Active`. Every operation is total; calls that
/// make no sense for the current phase are ignored.
#[derive(Debug)]
pub struct GameSession<R: Rng = ThreadRng> {
    pub config: SessionConfig,
    arena: Arena,
    phase: Phase,
    score: u32,
    time_remaining: u32,
    target: Option<Target>,
    hits: Vec<Hit>,
    ended_at: Option<SystemTime>,
    rng: R,
}

impl GameSession<ThreadRng> {
    pub fn new(config: SessionConfig, arena: Arena) -> Self {
        Self::with_rng(config, arena, rand::thread_rng())
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(config: SessionConfig, arena: Arena, rng: R) -> Self {
        Self {
            time_remaining: config.round_secs,
            config,
            arena,
            phase: Phase::Idle,
            score: 0,
            target: None,
            hits: Vec::new(),
            ended_at: None,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn start(&mut self) {
        self.start_at(SystemTime::now());
    }

    pub fn start_at(&mut self, now: SystemTime) {
        self.score = 0;
        self.time_remaining = self.config.round_secs;
        self.hits.clear();
        self.ended_at = None;
        self.phase = Phase::Active;
        self.place_target_at(now);

        tracing::info!(
            round_secs = self.config.round_secs,
            arena_width = self.arena.width,
            arena_height = self.arena.height,
            "session started"
        );
    }

    /// One countdown step. Returns true when this tick ended the session.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return false;
        }

        self.phase = Phase::Ended;
        self.target = None;
        self.ended_at = Some(SystemTime::now());

        tracing::info!(
            score = self.score,
            hits = self.hits.len(),
            accuracy = self.accuracy_percent(),
            "session ended"
        );
        true
    }

    pub fn place_target(&mut self) {
        self.place_target_at(SystemTime::now());
    }

    fn place_target_at(&mut self, now: SystemTime) {
        let (x, y) = self.arena.place(self.config.target_size, &mut self.rng);
        self.target = Some(Target {
            x,
            y,
            spawned_at: now,
        });
    }

    pub fn register_hit(&mut self, x: u16, y: u16) -> bool {
        self.register_hit_at(x, y, SystemTime::now())
    }

    /// Counts a press on the current target. Any press while active scores;
    /// whether it landed on the target is decided by the caller.
    pub fn register_hit_at(&mut self, x: u16, y: u16, now: SystemTime) -> bool {
        if self.phase != Phase::Active {
            return false;
        }

        let reaction = self
            .target
            .and_then(|t| now.duration_since(t.spawned_at).ok())
            .unwrap_or_default();

        self.score += 1;
        self.hits.push(Hit {
            x,
            y,
            timestamp: now,
            reaction,
        });
        tracing::debug!(x, y, reaction_ms = reaction.as_millis() as u64, "hit");

        self.place_target_at(now);
        true
    }

    /// Fraction of registered presses that scored; 0 with no hits.
    pub fn accuracy(&self) -> f64 {
        ratio(self.score as usize, self.hits.len())
    }

    pub fn accuracy_percent(&self) -> u32 {
        (self.accuracy() * 100.0).round() as u32
    }

    /// The last `VISIBLE_HITS` hits, oldest first
    pub fn recent_hits(&self) -> &[Hit] {
        let start = self.hits.len().saturating_sub(VISIBLE_HITS);
        &self.hits[start..]
    }

    /// The viewport changed size. A target that no longer fits is moved.
    pub fn resize(&mut self, arena: Arena) {
        self.arena = arena;

        let size = self.config.target_size;
        let out_of_bounds = self
            .target
            .map(|t| !arena.fits(t.x, t.y, size))
            .unwrap_or(false);

        if self.phase == Phase::Active && out_of_bounds {
            tracing::debug!(width = arena.width, height = arena.height, "target re-placed");
            let spawned_at = self
                .target
                .map(|t| t.spawned_at)
                .unwrap_or_else(SystemTime::now);
            self.place_target_at(spawned_at);
        }
    }

    pub fn reaction_times_ms(&self) -> Vec<f64> {
        self.hits
            .iter()
            .map(|h| h.reaction.as_micros() as f64 / 1000.0)
            .collect()
    }

    pub fn average_reaction_ms(&self) -> Option<f64> {
        mean(&self.reaction_times_ms())
    }

    pub fn reaction_std_dev_ms(&self) -> Option<f64> {
        std_dev(&self.reaction_times_ms())
    }

    /// Fastest and slowest reaction in milliseconds
    pub fn reaction_range_ms(&self) -> Option<(u64, u64)> {
        match self.hits.iter().map(|h| h.reaction.as_millis() as u64).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some((v, v)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        }
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        if self.phase != Phase::Ended {
            return None;
        }

        Some(SessionSummary {
            finished_at: self
                .ended_at
                .map(DateTime::<Local>::from)
                .unwrap_or_else(Local::now),
            round_secs: self.config.round_secs,
            score: self.score,
            hits: self.hits.len() as u32,
            accuracy: self.accuracy_percent(),
            avg_reaction_ms: self.average_reaction_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> GameSession<StdRng> {
        GameSession::with_rng(
            SessionConfig::default(),
            Arena::new(80, 20),
            StdRng::seed_from_u64(3),
        )
    }

    fn run_out(s: &mut GameSession<StdRng>) {
        for _ in 0..s.config.round_secs {
            s.tick();
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session();

        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.score(), 0);
        assert_eq!(s.time_remaining(), 30);
        assert!(s.target().is_none());
        assert!(s.hits().is_empty());
        assert!(s.summary().is_none());
    }

    #[test]
    fn test_start_activates_and_places_target() {
        let mut s = session();
        s.start();

        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.time_remaining(), 30);
        let t = s.target().expect("target placed on start");
        assert!(t.x <= 72 && t.y <= 17);
    }

    #[test]
    fn test_tick_ignored_unless_active() {
        let mut s = session();

        assert!(!s.tick());
        assert_eq!(s.time_remaining(), 30);
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn test_thirty_ticks_end_the_session() {
        let mut s = session();
        s.start();

        for i in 1..30 {
            assert!(!s.tick());
            assert_eq!(s.time_remaining(), 30 - i);
            assert!(s.is_active());
        }

        assert!(s.tick());
        assert_eq!(s.time_remaining(), 0);
        assert_eq!(s.phase(), Phase::Ended);
        assert!(s.target().is_none());

        // further ticks change nothing
        assert!(!s.tick());
        assert_eq!(s.time_remaining(), 0);
    }

    #[test]
    fn test_register_hit_scores_and_moves_target() {
        let mut s = session();
        let t0 = SystemTime::now();
        s.start_at(t0);

        let later = t0 + Duration::from_millis(350);
        assert!(s.register_hit_at(10, 4, later));

        assert_eq!(s.score(), 1);
        assert_eq!(s.hits().len(), 1);
        assert_eq!(s.hits()[0].x, 10);
        assert_eq!(s.hits()[0].y, 4);
        assert_eq!(s.hits()[0].reaction, Duration::from_millis(350));
        assert_eq!(s.target().unwrap().spawned_at, later);
    }

    #[test]
    fn test_register_hit_ignored_unless_active() {
        let mut s = session();
        assert!(!s.register_hit(1, 1));

        s.start();
        run_out(&mut s);
        assert!(!s.register_hit(1, 1));

        assert_eq!(s.score(), 0);
        assert!(s.hits().is_empty());
    }

    #[test]
    fn test_accuracy_without_hits_is_zero() {
        let mut s = session();
        s.start();
        run_out(&mut s);

        assert_eq!(s.accuracy(), 0.0);
        assert_eq!(s.accuracy_percent(), 0);
    }

    #[test]
    fn test_three_hits_full_accuracy() {
        let mut s = session();
        s.start();
        for i in 0..3 {
            s.register_hit(i, i);
        }
        run_out(&mut s);

        assert_eq!(s.score(), 3);
        assert_eq!(s.hits().len(), 3);
        assert_eq!(s.accuracy_percent(), 100);
    }

    #[test]
    fn test_restart_clears_previous_session() {
        let mut s = session();
        s.start();
        s.register_hit(1, 1);
        s.register_hit(2, 2);
        run_out(&mut s);
        assert_eq!(s.phase(), Phase::Ended);

        s.start();

        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.score(), 0);
        assert_eq!(s.time_remaining(), 30);
        assert!(s.hits().is_empty());
    }

    #[test]
    fn test_recent_hits_window() {
        let mut s = session();
        s.start();
        for i in 0..15 {
            s.register_hit(i, 0);
        }

        let recent = s.recent_hits();
        assert_eq!(recent.len(), VISIBLE_HITS);
        assert_eq!(recent[0].x, 5);
        assert_eq!(recent[9].x, 14);
        // underlying history is never trimmed
        assert_eq!(s.hits().len(), 15);
    }

    #[test]
    fn test_targets_always_in_bounds() {
        let mut s = session();
        s.start();
        for _ in 0..500 {
            s.register_hit(0, 0);
            let t = s.target().unwrap();
            assert!(t.x <= 80 - s.config.target_size.width);
            assert!(t.y <= 20 - s.config.target_size.height);
        }
    }

    #[test]
    fn test_resize_moves_target_that_no_longer_fits() {
        let mut s = session();
        s.start();
        s.resize(Arena::new(10, 4));

        let t = s.target().unwrap();
        assert!(t.x <= 2);
        assert!(t.y <= 1);
        assert_eq!(s.arena(), Arena::new(10, 4));
    }

    #[test]
    fn test_reaction_statistics() {
        let mut s = session();
        let t0 = SystemTime::now();
        s.start_at(t0);
        s.register_hit_at(0, 0, t0 + Duration::from_millis(200));
        s.register_hit_at(0, 0, t0 + Duration::from_millis(600));

        assert_eq!(s.average_reaction_ms(), Some(300.0));
        assert_eq!(s.reaction_std_dev_ms(), Some(100.0));
        assert_eq!(s.reaction_range_ms(), Some((200, 400)));
    }

    #[test]
    fn test_reaction_statistics_empty() {
        let s = session();

        assert_eq!(s.average_reaction_ms(), None);
        assert_eq!(s.reaction_range_ms(), None);
    }

    #[test]
    fn test_summary_after_end() {
        let mut s = session();
        s.start();
        s.register_hit(3, 3);
        assert!(s.summary().is_none());
        run_out(&mut s);

        let summary = s.summary().unwrap();
        assert_eq!(summary.score, 1);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.accuracy, 100);
        assert_eq!(summary.round_secs, 30);
        assert!(summary.avg_reaction_ms.is_some());
    }

    #[test]
    fn test_short_round() {
        let mut s = GameSession::with_rng(
            SessionConfig {
                round_secs: 2,
                ..SessionConfig::default()
            },
            Arena::new(40, 10),
            StdRng::seed_from_u64(0),
        );
        s.start();

        assert!(!s.tick());
        assert!(s.tick());
        assert_eq!(s.phase(), Phase::Ended);
    }
}
