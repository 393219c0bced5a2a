//! Round countdown clock.
//!
//! The engine does not schedule anything itself: the owner arranges for
//! [`TimerEngine::tick`] to be called once per [`TICK_PERIOD`]. Every start,
//! reset and stop bumps a generation counter, and ticks carry the
//! [`TickToken`] of the period they were scheduled for, so a tick that was
//! already queued when the period got cancelled is ignored.

use std::time::Duration;

use crate::config::TICK_PERIOD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
}

/// Identifies one running period of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

impl TickToken {
    pub fn as_raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still running; whole ticks left.
    Running(u32),
    /// Reached zero on this tick. Delivered once per running period.
    Expired,
    /// Token from a cancelled period, or the clock is not running.
    Ignored,
}

#[derive(Debug)]
pub struct TimerEngine {
    state: TimerState,
    remaining_ticks: u32,
    generation: u64,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            remaining_ticks: 0,
            generation: 0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Starts a new running period of `initial`, cancelling any current one.
    pub fn start(&mut self, initial: Duration) -> TickToken {
        self.generation += 1;
        self.remaining_ticks = ticks_in(initial);
        self.state = if self.remaining_ticks == 0 {
            TimerState::Expired
        } else {
            TimerState::Running
        };
        log::debug!(
            "timer started: {} ticks (gen {})",
            self.remaining_ticks,
            self.generation
        );
        TickToken(self.generation)
    }

    /// Restarts the clock at full duration for the next round.
    pub fn reset(&mut self, initial: Duration) -> TickToken {
        self.start(initial)
    }

    pub fn stop(&mut self) {
        self.generation += 1;
        self.state = TimerState::Idle;
    }

    pub fn tick(&mut self, token: TickToken) -> Tick {
        if token.0 != self.generation || self.state != TimerState::Running {
            return Tick::Ignored;
        }
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            self.state = TimerState::Expired;
            Tick::Expired
        } else {
            Tick::Running(self.remaining_ticks)
        }
    }

    pub fn remaining(&self) -> Duration {
        TICK_PERIOD * self.remaining_ticks
    }

    /// Remaining time with one decimal, as shown on screen ("2.0").
    pub fn remaining_label(&self) -> String {
        format!("{:.1}", self.remaining().as_secs_f64())
    }
}

/// Whole ticks covering `duration`; a partial tick counts as one.
fn ticks_in(duration: Duration) -> u32 {
    let ticks = duration.as_millis().div_ceil(TICK_PERIOD.as_millis());
    u32::try_from(ticks).unwrap_or(u32::MAX)
}
