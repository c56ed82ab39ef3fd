//! Fixed-rate tick scheduling.
//!
//! The host only calls us when it repaints, which is neither regular nor
//! guaranteed to be 60 Hz. [`FixedRateTicker`] turns those irregular wake-ups
//! into a whole number of fixed simulation steps, so trajectories depend on
//! the configured rate rather than on the display.
//!
//! There is exactly one ticker per app. Restarting the simulation never creates
//! a second one, and once [`FixedRateTicker::cancel`] is called it never fires
//! again.

use std::time::{Duration, Instant};

use crate::error::SimError;

/// Most ticks handed out for a single wake-up; older backlog is dropped.
pub const DEFAULT_MAX_CATCH_UP: u32 = 4;

/// Length of one tick at `fps`. Rates too slow for a `Duration` are rejected.
pub fn tick_period(fps: f32) -> Result<Duration, SimError> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(SimError::InvalidFrameRate(fps));
    }
    Duration::try_from_secs_f64(1.0 / fps as f64).map_err(|_| SimError::InvalidFrameRate(fps))
}

#[derive(Debug)]
pub struct FixedRateTicker {
    /// Length of one tick.
    period: Duration,
    /// Time owed but not yet turned into ticks.
    accumulator: Duration,
    /// When `advance` last ran; `None` until armed.
    last: Option<Instant>,
    max_catch_up: u32,
    /// Total ticks handed out.
    ticks: u64,
    paused: bool,
    cancelled: bool,
}

impl FixedRateTicker {
    pub fn new(fps: f32) -> Result<Self, SimError> {
        Ok(Self {
            period: tick_period(fps)?,
            accumulator: Duration::ZERO,
            last: None,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
            ticks: 0,
            paused: false,
            cancelled: false,
        })
    }

    pub fn with_max_catch_up(mut self, max: u32) -> Self {
        self.max_catch_up = max.max(1);
        self
    }

    /// Returns how many ticks are due at `now`. The first call only arms the clock.
    pub fn advance(&mut self, now: Instant) -> u32 {
        if self.cancelled {
            return 0;
        }
        let Some(last) = self.last.replace(now) else {
            return 0;
        };
        if self.paused {
            return 0;
        }

        self.accumulator += now.saturating_duration_since(last);

        let mut due = 0;
        while self.accumulator >= self.period && due < self.max_catch_up {
            self.accumulator -= self.period;
            due += 1;
        }
        if self.accumulator >= self.period {
            log::debug!(
                "dropping {:.1} ms of tick backlog",
                self.accumulator.as_secs_f64() * 1000.0
            );
            self.accumulator = Duration::ZERO;
        }

        self.ticks += due as u64;
        due
    }

    /// How long until the next tick is due, for scheduling a repaint.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        let since = self.last.map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.period.saturating_sub(self.accumulator + since)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes without replaying the time spent paused.
    pub fn resume(&mut self) {
        self.paused = false;
        self.accumulator = Duration::ZERO;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stops the ticker for good.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            log::debug!("ticker cancelled after {} ticks", self.ticks);
        }
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
