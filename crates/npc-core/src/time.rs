//! Simulation time model.
//!
//! Time advances in whole `Tick`s.  `SimClock` maps ticks to simulated
//! seconds with a fixed step:
//!
//!   elapsed_secs = tick * tick_duration_secs
//!
//! Subsystems receive the step as `dt: f32` seconds and keep their own
//! timers (cooldowns, dwell, memory) in seconds, so the same tuning works at
//! any tick rate.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds one tick represents.
    pub tick_duration_secs: f32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_secs: f32) -> Self {
        Self { tick_duration_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Step length handed to every subsystem update.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.tick_duration_secs
    }

    /// Elapsed simulated seconds since tick 0.  `f64` so long runs keep
    /// sub-millisecond resolution for event timestamps.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_duration_secs as f64
    }

    /// How many ticks span `secs` seconds (rounds up).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if self.tick_duration_secs <= 0.0 {
            return 0;
        }
        (secs / self.tick_duration_secs).max(0.0).ceil() as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds per tick.  Default: 0.05 (20 Hz).
    pub tick_duration_secs: f32,

    /// Total ticks to simulate with `Sim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Call `on_snapshot` every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Seconds a dead agent stays in the arena before removal.
    pub despawn_delay_secs: f32,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs: 0.05,
            total_ticks: 1_200,
            seed: 0,
            num_threads: None,
            output_interval_ticks: 20,
            despawn_delay_secs: 3.0,
        }
    }
}
