use std::time::{Duration, SystemTime};

use arena_tap::arena::{Arena, TargetSize};
use arena_tap::session::{GameSession, Phase, SessionConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn session(seed: u64) -> GameSession<StdRng> {
    GameSession::with_rng(
        SessionConfig::default(),
        Arena::new(120, 36),
        StdRng::seed_from_u64(seed),
    )
}

fn expire(s: &mut GameSession<StdRng>) {
    for _ in 0..30 {
        s.tick();
    }
}

#[test]
fn three_hits_then_expiry() {
    let mut s = session(1);
    s.start();
    for _ in 0..3 {
        let t = *s.target().unwrap();
        s.register_hit(t.x, t.y);
    }
    expire(&mut s);

    assert_eq!(s.phase(), Phase::Ended);
    assert_eq!(s.score(), 3);
    assert_eq!(s.hits().len(), 3);
    assert_eq!(s.accuracy_percent(), 100);
}

#[test]
fn no_hits_then_expiry() {
    let mut s = session(2);
    s.start();
    expire(&mut s);

    assert_eq!(s.phase(), Phase::Ended);
    assert_eq!(s.accuracy(), 0.0);
    assert_eq!(s.accuracy_percent(), 0);
}

#[test]
fn score_tracks_hits_and_ignores_presses_after_expiry() {
    for seed in 0..20u64 {
        let mut s = session(seed);
        s.start();
        let mut accepted = 0;
        for i in 0..seed {
            if s.register_hit(i as u16, 0) {
                accepted += 1;
            }
            s.tick();
        }
        assert_eq!(accepted, seed as usize);

        // keep ticking and pressing past the end of the round
        for i in 0..40u16 {
            let before = s.hits().len();
            let ended = s.phase() == Phase::Ended;
            let counted = s.register_hit(i, i);
            s.tick();

            if ended {
                assert!(!counted);
                assert_eq!(s.hits().len(), before);
            }
            assert_eq!(s.score() as usize, s.hits().len());
        }

        assert_eq!(s.phase(), Phase::Ended);
        assert_eq!(s.time_remaining(), 0);
        // one press per remaining second was counted, none after
        assert_eq!(s.hits().len(), 30);
        assert_eq!(s.score() as usize, s.hits().len());
    }
}

#[test]
fn time_reaches_zero_exactly_once() {
    let mut s = session(3);
    s.start();

    let mut zero_seen = 0;
    for _ in 0..40 {
        let was_active = s.is_active();
        s.tick();
        if was_active && s.time_remaining() == 0 {
            zero_seen += 1;
        }
    }

    assert_eq!(zero_seen, 1);
    assert_eq!(s.phase(), Phase::Ended);
}

#[test]
fn restart_discards_previous_round() {
    let mut s = session(4);
    s.start();
    for _ in 0..7 {
        s.register_hit(1, 1);
    }
    expire(&mut s);
    assert_eq!(s.score(), 7);

    s.start();

    assert_eq!(s.phase(), Phase::Active);
    assert_eq!(s.score(), 0);
    assert_eq!(s.time_remaining(), 30);
    assert!(s.hits().is_empty());
    assert!(s.target().is_some());
}

#[test]
fn placement_within_bounds_for_odd_sizes() {
    let size = TargetSize {
        width: 11,
        height: 5,
    };
    let mut s = GameSession::with_rng(
        SessionConfig {
            round_secs: 30,
            target_size: size,
        },
        Arena::new(13, 6),
        StdRng::seed_from_u64(9),
    );
    s.start();

    for _ in 0..200 {
        let t = *s.target().unwrap();
        assert!(t.x <= 2);
        assert!(t.y <= 1);
        s.register_hit(t.x, t.y);
    }
}

#[test]
fn reaction_times_follow_target_spawns() {
    let mut s = session(5);
    let t0 = SystemTime::now();
    s.start_at(t0);

    s.register_hit_at(0, 0, t0 + Duration::from_millis(500));
    s.register_hit_at(0, 0, t0 + Duration::from_millis(800));

    let reactions: Vec<u128> = s.hits().iter().map(|h| h.reaction.as_millis()).collect();
    assert_eq!(reactions, vec![500, 300]);
    assert_eq!(s.average_reaction_ms(), Some(400.0));
}
