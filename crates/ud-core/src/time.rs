//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing, real-valued `Tick`.  Agents live on a
//! recurring *week*: every obligation is expressed as a `(day, hour)` pair
//! and mapped onto the tick line by a [`TickConverter`]:
//!
//! ```text
//! tick = ((day - 1) * 24 + hour)  mod 168   × ticks_per_hour
//! ```
//!
//! The inverse recovers `(day, hour)` from any tick by reducing modulo the
//! week length, so the mapping is a bijection modulo `ticks_per_week`.
//!
//! The default resolution is one tick per simulated hour
//! ([`TickConverter::HOURLY`], [`TICKS_PER_WEEK`] = 168).  Ticks are `f64`
//! because obligations routinely fall on sub-hour boundaries (a class at
//! 09:30, an arrival shifted 12 minutes early).

use std::cmp::Ordering;
use std::fmt;

use crate::{CoreError, CoreResult, SimRng};

pub const HOURS_PER_DAY: f64 = 24.0;
pub const DAYS_PER_WEEK: u8 = 7;
const HOURS_PER_WEEK: f64 = HOURS_PER_DAY * DAYS_PER_WEEK as f64;

/// Ticks in one week at the default one-tick-per-hour resolution.
pub const TICKS_PER_WEEK: f64 = HOURS_PER_WEEK;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick.
///
/// Only `PartialOrd` is derived (it wraps an `f64`); use [`Tick::total_cmp`]
/// where a total order is required, e.g. inside priority queues.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub f64);

impl Tick {
    pub const ZERO: Tick = Tick(0.0);

    /// Ticks elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Tick) -> f64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn total_cmp(&self, other: &Tick) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: f64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: Tick) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{:.2}", self.0)
    }
}

// ── DayTime ──────────────────────────────────────────────────────────────────

/// A position within the week: `day ∈ [1, 7]`, `hour ∈ [0, 24)`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayTime {
    pub day:  u8,
    pub hour: f64,
}

impl DayTime {
    /// Build a normalized `DayTime`; out-of-range days and hours wrap.
    pub fn new(day: i32, hour: f64) -> Self {
        let week_hours = wrap_week_hours((day as f64 - 1.0) * HOURS_PER_DAY + hour);
        Self::from_week_hours(week_hours)
    }

    /// Hours elapsed since Monday 00:00 (day 1, hour 0).
    #[inline]
    pub fn week_hours(&self) -> f64 {
        (self.day as f64 - 1.0) * HOURS_PER_DAY + self.hour
    }

    fn from_week_hours(week_hours: f64) -> Self {
        // `min` guards values just under 168 whose quotient rounds up to 7.
        let day_index = (week_hours / HOURS_PER_DAY).floor().min((DAYS_PER_WEEK - 1) as f64);
        let hour = week_hours - day_index * HOURS_PER_DAY;
        DayTime { day: day_index as u8 + 1, hour }
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_minutes = (self.hour * 60.0).round() as u32;
        write!(f, "day {} {:02}:{:02}", self.day, total_minutes / 60, total_minutes % 60)
    }
}

/// Reduce an hour count into `[0, 168)`.
fn wrap_week_hours(hours: f64) -> f64 {
    let wrapped = hours.rem_euclid(HOURS_PER_WEEK);
    // rem_euclid of a tiny negative value can round up to exactly the modulus.
    if wrapped >= HOURS_PER_WEEK { 0.0 } else { wrapped }
}

// ── TickConverter ────────────────────────────────────────────────────────────

/// Bidirectional mapping between ticks and `(day, hour)` pairs.
///
/// Never fails: out-of-range inputs are normalized, not rejected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickConverter {
    ticks_per_hour: f64,
}

impl TickConverter {
    /// One tick per simulated hour.
    pub const HOURLY: TickConverter = TickConverter { ticks_per_hour: 1.0 };

    /// # Panics
    ///
    /// Panics in debug mode if `ticks_per_hour` is not strictly positive.
    pub fn new(ticks_per_hour: f64) -> Self {
        debug_assert!(ticks_per_hour > 0.0, "ticks_per_hour must be > 0");
        Self { ticks_per_hour }
    }

    #[inline]
    pub fn ticks_per_hour(&self) -> f64 {
        self.ticks_per_hour
    }

    /// Length of one week in ticks, the period of every recurring obligation.
    #[inline]
    pub fn ticks_per_week(&self) -> f64 {
        HOURS_PER_WEEK * self.ticks_per_hour
    }

    #[inline]
    pub fn hours_to_ticks(&self, hours: f64) -> f64 {
        hours * self.ticks_per_hour
    }

    #[inline]
    pub fn ticks_to_hours(&self, ticks: f64) -> f64 {
        ticks / self.ticks_per_hour
    }

    /// Tick within the first week for `(day, hour)`.
    ///
    /// A negative `hour` falls into the previous day (wrapping from Monday to
    /// Sunday); `hour >= 24` rolls into the next one.
    pub fn day_time_to_ticks(&self, day: i32, hour: f64) -> Tick {
        let week_hours = wrap_week_hours((day as f64 - 1.0) * HOURS_PER_DAY + hour);
        Tick(week_hours * self.ticks_per_hour)
    }

    /// `(day, hour)` of any tick, reduced modulo the week.
    pub fn ticks_to_day_time(&self, tick: Tick) -> DayTime {
        DayTime::from_week_hours(wrap_week_hours(tick.0 / self.ticks_per_hour))
    }
}

impl Default for TickConverter {
    fn default() -> Self {
        Self::HOURLY
    }
}

// ── HourRange ────────────────────────────────────────────────────────────────

/// A closed interval of clock hours used by the timing distributions.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HourRange {
    pub min: f64,
    pub max: f64,
}

impl HourRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Uniform sample in `[min, max]`.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level settings shared by every crate.
///
/// Typically embedded in the application's TOML file (see `ud-sim`).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Number of simulated weeks.
    pub weeks: u32,

    /// Tick resolution.  Default: 1 tick per simulated hour.
    pub ticks_per_hour: f64,
}

impl SimConfig {
    /// The tick at which the simulation ends (inclusive upper bound for
    /// event firing).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.weeks as f64 * self.converter().ticks_per_week())
    }

    pub fn converter(&self) -> TickConverter {
        TickConverter::new(self.ticks_per_hour)
    }

    /// Rejects a non-positive or non-finite resolution and an empty run.
    pub fn validate(&self) -> CoreResult<()> {
        let tph = self.ticks_per_hour;
        if !(tph.is_finite() && tph > 0.0) {
            return Err(CoreError::Config(format!("ticks_per_hour must be > 0, got {tph}")));
        }
        if self.weeks == 0 {
            return Err(CoreError::Config("weeks must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42, weeks: 1, ticks_per_hour: 1.0 }
    }
}
