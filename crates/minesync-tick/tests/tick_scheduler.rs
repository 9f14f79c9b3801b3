//! Integration tests for the fixed-period tick scheduler.
//!
//! Uses paused tokio time: `sleep_until` resolves as soon as the runtime
//! is otherwise idle, so every test runs instantly and deterministically.

use std::time::Duration;

use minesync_tick::{LatestWins, TickConfig, TickScheduler};
use tokio::time::Instant;

// =========================================================================
// Helpers
// =========================================================================

const POSITION_PERIOD: Duration = Duration::from_millis(16);

fn position_config() -> TickConfig {
    TickConfig::with_period(POSITION_PERIOD)
}

// =========================================================================
// TickConfig
// =========================================================================

#[test]
fn test_with_period_has_no_jitter() {
    let cfg = TickConfig::with_period(Duration::from_secs(30));
    assert_eq!(cfg.period, Duration::from_secs(30));
    assert!(cfg.initial_jitter.is_zero());
}

#[test]
fn test_zero_period_is_clamped() {
    let cfg = TickConfig::with_period(Duration::ZERO).validated();
    assert_eq!(cfg.period, TickConfig::MIN_PERIOD);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_initial_state() {
    let s = TickScheduler::new(position_config());
    assert_eq!(s.tick_count(), 0);
    assert_eq!(s.period(), POSITION_PERIOD);
}

// =========================================================================
// Tick firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_first_tick_fires_after_one_period() {
    let start = Instant::now();
    let mut s = TickScheduler::new(position_config());

    assert_eq!(s.wait_for_tick().await, 1);
    assert_eq!(Instant::now() - start, POSITION_PERIOD);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_increment_monotonically() {
    let start = Instant::now();
    let mut s = TickScheduler::new(position_config());

    for expected in 1..=5 {
        assert_eq!(s.wait_for_tick().await, expected);
    }
    assert_eq!(s.tick_count(), 5);
    assert_eq!(Instant::now() - start, POSITION_PERIOD * 5);
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_period() {
    let start = Instant::now();
    let mut s = TickScheduler::with_period(Duration::from_secs(30));

    s.wait_for_tick().await;
    s.wait_for_tick().await;
    assert_eq!(Instant::now() - start, Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_jitter_only_delays_first_tick() {
    let start = Instant::now();
    let mut s = TickScheduler::new(TickConfig {
        initial_jitter: Duration::from_millis(10),
        ..position_config()
    });

    s.wait_for_tick().await;
    let first = Instant::now() - start;
    assert!(first >= POSITION_PERIOD);
    assert!(first < POSITION_PERIOD + Duration::from_millis(10));

    let before = Instant::now();
    s.wait_for_tick().await;
    assert_eq!(Instant::now() - before, POSITION_PERIOD);
}

// =========================================================================
// Late ticks
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_late_tick_reschedules_from_now() {
    let mut s = TickScheduler::with_period(Duration::from_millis(10));
    s.wait_for_tick().await;

    // Block for three and a half periods past the next deadline.
    tokio::time::advance(Duration::from_millis(45)).await;

    // The missed deadlines collapse into one tick.
    assert_eq!(s.wait_for_tick().await, 2);

    let before = Instant::now();
    assert_eq!(s.wait_for_tick().await, 3);
    assert_eq!(Instant::now() - before, Duration::from_millis(10));
}

// =========================================================================
// Coalescing with a scheduler
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_latest_wins_collapses_moves_between_ticks() {
    let mut s = TickScheduler::new(position_config());
    let mut pending = LatestWins::new();
    let mut sent = Vec::new();

    pending.push((1, 1));
    pending.push((5, 7));
    s.wait_for_tick().await;
    if let Some(pos) = pending.take() {
        sent.push(pos);
    }

    // Nothing moved during the second period.
    s.wait_for_tick().await;
    if let Some(pos) = pending.take() {
        sent.push(pos);
    }

    assert_eq!(sent, vec![(5, 7)]);
    assert!(!pending.is_pending());
}
