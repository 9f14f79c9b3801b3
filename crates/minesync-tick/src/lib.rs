//! Fixed-period tick scheduler for minesync.
//!
//! The client runs two independent periodic loops for its whole lifetime:
//! a fast one that flushes the local cursor position and a slow liveness
//! heartbeat. Both are a [`TickScheduler`]; the position loop pairs it with
//! a [`LatestWins`] slot so bursts of pointer movement collapse into at most
//! one message per tick.
//!
//! # Integration
//!
//! Schedulers are meant to sit inside the client's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         frame = conn.recv() => { /* dispatch */ }
//!         _ = position_ticks.wait_for_tick() => {
//!             if let Some((x, y)) = pending.take() { /* send pos */ }
//!         }
//!         _ = heartbeat_ticks.wait_for_tick() => { /* send <3 */ }
//!     }
//! }
//! ```
//!
//! There is no pause or cancel: a scheduler ticks until it is dropped.

mod coalesce;

pub use coalesce::LatestWins;

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for one scheduler.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Time between ticks.
    pub period: Duration,
    /// Upper bound of a random delay added to the *first* tick only.
    /// Zero disables jitter.
    pub initial_jitter: Duration,
}

impl TickConfig {
    /// Shortest period a scheduler accepts.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// A config with the given period and no jitter.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            initial_jitter: Duration::ZERO,
        }
    }

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.period < Self::MIN_PERIOD {
            warn!(
                period_us = self.period.as_micros() as u64,
                "tick period below minimum, clamping"
            );
            self.period = Self::MIN_PERIOD;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-period tick scheduler.
///
/// A tick that fires late does not try to catch up: the next deadline is
/// one period after the late tick.
pub struct TickScheduler {
    period: Duration,
    tick_count: u64,
    /// When the next tick should fire.
    next_tick: Instant,
}

impl TickScheduler {
    /// Creates a scheduler whose first tick fires one period (plus jitter)
    /// from now.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();

        let jitter = if config.initial_jitter.is_zero() {
            Duration::ZERO
        } else {
            let max_us = config.initial_jitter.as_micros() as u64;
            Duration::from_micros(rand::rng().random_range(0..max_us.max(1)))
        };

        debug!(
            period_ms = config.period.as_secs_f64() * 1000.0,
            jitter_ms = jitter.as_secs_f64() * 1000.0,
            "tick scheduler created"
        );

        Self {
            period: config.period,
            tick_count: 0,
            next_tick: Instant::now() + config.period + jitter,
        }
    }

    /// Creates a scheduler with the given period and no jitter.
    pub fn with_period(period: Duration) -> Self {
        Self::new(TickConfig::with_period(period))
    }

    /// Waits until the next tick is due and returns its number (from 1).
    ///
    /// Cancel-safe: dropping the future (as `tokio::select!` does when
    /// another branch wins) leaves the deadline untouched.
    pub async fn wait_for_tick(&mut self) -> u64 {
        time::sleep_until(self.next_tick).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(self.next_tick);
        if late_by >= self.period {
            warn!(
                tick = self.tick_count,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "tick fired late, rescheduling from now"
            );
        }
        self.next_tick = now + self.period;

        trace!(tick = self.tick_count, "tick fired");
        self.tick_count
    }

    /// Number of ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.period
    }
}
