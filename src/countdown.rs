use std::time::{Duration, Instant};

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Cancellable repeating deadline driving the session countdown.
///
/// The event loop wakes at a finer tick rate and asks `poll` whether the
/// next countdown step is due.
#[derive(Debug, Clone)]
pub struct Countdown {
    period: Duration,
    next_fire: Option<Instant>,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_fire: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_fire = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_fire = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Fires at most once per call. When due, the next deadline is one
    /// period after the previous one so the cadence does not drift with
    /// the polling rate.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_fire {
            Some(deadline) if now >= deadline => {
                self.next_fire = Some(deadline + self.period);
                true
            }
            _ => false,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(COUNTDOWN_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_never_fires() {
        let mut c = Countdown::default();
        let now = Instant::now();

        assert!(!c.is_armed());
        assert!(!c.poll(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_fires_once_per_period() {
        let mut c = Countdown::default();
        let t0 = Instant::now();
        c.arm(t0);

        assert!(!c.poll(t0 + Duration::from_millis(900)));
        assert!(c.poll(t0 + Duration::from_millis(1000)));
        assert!(!c.poll(t0 + Duration::from_millis(1100)));
        assert!(c.poll(t0 + Duration::from_millis(2050)));
    }

    #[test]
    fn test_catches_up_one_step_per_poll() {
        let mut c = Countdown::default();
        let t0 = Instant::now();
        c.arm(t0);

        let late = t0 + Duration::from_millis(3500);
        assert!(c.poll(late));
        assert!(c.poll(late));
        assert!(c.poll(late));
        assert!(!c.poll(late));
    }

    #[test]
    fn test_cancel_stops_firing() {
        let mut c = Countdown::default();
        let t0 = Instant::now();
        c.arm(t0);
        c.cancel();

        assert!(!c.is_armed());
        assert!(!c.poll(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_rearm_resets_deadline() {
        let mut c = Countdown::new(Duration::from_millis(100));
        let t0 = Instant::now();
        c.arm(t0);
        c.arm(t0 + Duration::from_millis(90));

        assert!(!c.poll(t0 + Duration::from_millis(150)));
        assert!(c.poll(t0 + Duration::from_millis(190)));
    }
}
