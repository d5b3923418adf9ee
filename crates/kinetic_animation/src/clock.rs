//! Time sources
//!
//! Animators never read wall-clock time directly. They sample a
//! [`TimeSource`] once per frame, which reports time as fractional ticks on
//! two streams:
//!
//! - **screen** ticks always advance (UI animations keep running while the
//!   host is paused)
//! - **world** ticks stop while the host is paused
//!
//! Both streams must be monotonically non-decreasing.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Which tick stream an animator follows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Clock {
    /// Always-advancing UI time
    #[default]
    Screen,
    /// Pausable world time
    World,
}

/// Source of frame timestamps, in fractional ticks
pub trait TimeSource {
    /// Ticks elapsed on the always-advancing stream
    fn screen_ticks(&self) -> f32;

    /// Ticks elapsed on the pausable stream
    fn world_ticks(&self) -> f32 {
        self.screen_ticks()
    }

    /// Sample the requested stream
    fn ticks(&self, clock: Clock) -> f32 {
        match clock {
            Clock::Screen => self.screen_ticks(),
            Clock::World => self.world_ticks(),
        }
    }
}

// ============================================================================
// Manual Clock
// ============================================================================

#[derive(Clone, Copy, Debug, Default)]
struct ManualState {
    screen: f32,
    world: f32,
    paused: bool,
}

/// A clock advanced explicitly by the host's tick loop
///
/// Clones share the same underlying time, so the host can keep one copy to
/// drive while animators read from another.
///
/// ```rust
/// use kinetic_animation::{ManualClock, TimeSource};
///
/// let clock = ManualClock::new();
/// clock.advance(2.5);
/// clock.set_paused(true);
/// clock.advance(1.0);
/// assert_eq!(clock.screen_ticks(), 3.5);
/// assert_eq!(clock.world_ticks(), 2.5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    state: Rc<Cell<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both streams by `ticks` (world time only while unpaused)
    pub fn advance(&self, ticks: f32) {
        let mut state = self.state.get();
        let ticks = ticks.max(0.0);
        state.screen += ticks;
        if !state.paused {
            state.world += ticks;
        }
        self.state.set(state);
    }

    /// Pause or resume the world stream
    pub fn set_paused(&self, paused: bool) {
        let mut state = self.state.get();
        state.paused = paused;
        self.state.set(state);
    }

    pub fn is_paused(&self) -> bool {
        self.state.get().paused
    }
}

impl TimeSource for ManualClock {
    fn screen_ticks(&self) -> f32 {
        self.state.get().screen
    }

    fn world_ticks(&self) -> f32 {
        self.state.get().world
    }
}

// ============================================================================
// System Clock
// ============================================================================

/// A wall-clock time source measured in ticks since creation
///
/// World time excludes every interval spent between [`pause`](Self::pause)
/// and [`resume`](Self::resume).
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
    ticks_per_second: f32,
    paused_at: Cell<Option<Instant>>,
    paused_total: Cell<Duration>,
}

impl SystemClock {
    /// Default tick rate
    pub const DEFAULT_TICK_RATE: f32 = 20.0;

    pub fn new() -> Self {
        Self::with_tick_rate(Self::DEFAULT_TICK_RATE)
    }

    pub fn with_tick_rate(ticks_per_second: f32) -> Self {
        Self {
            origin: Instant::now(),
            ticks_per_second,
            paused_at: Cell::new(None),
            paused_total: Cell::new(Duration::ZERO),
        }
    }

    pub fn tick_rate(&self) -> f32 {
        self.ticks_per_second
    }

    pub fn pause(&self) {
        if self.paused_at.get().is_none() {
            self.paused_at.set(Some(Instant::now()));
        }
    }

    pub fn resume(&self) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total.set(self.paused_total.get() + at.elapsed());
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.get().is_some()
    }

    fn to_ticks(&self, duration: Duration) -> f32 {
        duration.as_secs_f32() * self.ticks_per_second
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn screen_ticks(&self) -> f32 {
        self.to_ticks(self.origin.elapsed())
    }

    fn world_ticks(&self) -> f32 {
        let current_pause = self
            .paused_at
            .get()
            .map(|at| at.elapsed())
            .unwrap_or(Duration::ZERO);
        let paused = self.paused_total.get() + current_pause;
        self.to_ticks(self.origin.elapsed().saturating_sub(paused))
    }
}
