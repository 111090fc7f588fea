//! Timing policies: when agents arrive, leave, and break for lunch.
//!
//! The movement core never hard-codes a distribution.  It asks an injected
//! [`TimingPolicy`] for every clock time it needs, so tests can substitute
//! fixed values and studies can swap in calibrated distributions.

use ud_core::{HourRange, SimRng};
use ud_schedule::{lunch_gaps, Schedule};

use crate::{BehaviorError, BehaviorResult};

/// A lunch break: start hour and duration in hours.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LunchWindow {
    pub start:    f64,
    pub duration: f64,
}

impl LunchWindow {
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Source of every randomized clock time used when planning a week.
///
/// All hours are clock hours of the day the caller asks about; draws go
/// through the run's shared [`SimRng`] so a fixed seed reproduces the plan.
pub trait TimingPolicy {
    /// How long before a class starts the student walks to it.
    fn arrival_shift(&self, rng: &mut SimRng) -> f64;

    /// Upper bound of [`arrival_shift`](Self::arrival_shift): the latest a
    /// student may reach campus is this long before the first class.
    fn arrival_margin(&self) -> f64;

    fn student_arrival(&self, rng: &mut SimRng) -> f64;

    fn student_departure(&self, rng: &mut SimRng) -> f64;

    /// A lunch break that fits between the student's classes on `day`, or
    /// `None` when the day leaves no room for one.
    fn student_lunch(&self, schedule: &Schedule, day: u8, rng: &mut SimRng) -> Option<LunchWindow>;

    fn staff_work_start(&self, rng: &mut SimRng) -> f64;

    fn staff_work_end(&self, rng: &mut SimRng) -> f64;

    fn staff_lunch(&self, rng: &mut SimRng) -> LunchWindow;
}

// ── TimingConfig ──────────────────────────────────────────────────────────────

/// Uniform hour ranges sampled by [`RandomTiming`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    pub arrival_shift:     HourRange,
    pub student_arrival:   HourRange,
    pub student_departure: HourRange,
    /// Part of the day in which students look for a lunch gap.
    pub lunch_window:      HourRange,
    pub lunch_duration:    HourRange,
    pub staff_work_start:  HourRange,
    pub staff_work_end:    HourRange,
    pub staff_lunch_start: HourRange,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            arrival_shift:     HourRange::new(0.0, 0.25),
            student_arrival:   HourRange::new(7.0, 10.0),
            student_departure: HourRange::new(15.0, 20.0),
            lunch_window:      HourRange::new(11.0, 15.0),
            lunch_duration:    HourRange::new(0.5, 1.0),
            staff_work_start:  HourRange::new(6.0, 8.0),
            staff_work_end:    HourRange::new(16.0, 18.0),
            staff_lunch_start: HourRange::new(12.0, 13.5),
        }
    }
}

impl TimingConfig {
    /// Reject inverted or non-finite ranges and negative durations.
    pub fn validate(&self) -> BehaviorResult<()> {
        let ranges = [
            ("arrival_shift", self.arrival_shift),
            ("student_arrival", self.student_arrival),
            ("student_departure", self.student_departure),
            ("lunch_window", self.lunch_window),
            ("lunch_duration", self.lunch_duration),
            ("staff_work_start", self.staff_work_start),
            ("staff_work_end", self.staff_work_end),
            ("staff_lunch_start", self.staff_lunch_start),
        ];
        for (name, range) in ranges {
            if !range.is_valid() {
                return Err(BehaviorError::Config(format!(
                    "timing.{name}: invalid range [{}, {}]",
                    range.min, range.max
                )));
            }
        }
        if self.arrival_shift.min < 0.0 || self.lunch_duration.min < 0.0 {
            return Err(BehaviorError::Config(
                "timing: arrival shift and lunch duration must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

// ── RandomTiming ──────────────────────────────────────────────────────────────

/// Default [`TimingPolicy`]: uniform draws from a [`TimingConfig`].
#[derive(Clone, Debug, Default)]
pub struct RandomTiming {
    config: TimingConfig,
}

impl RandomTiming {
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }
}

impl TimingPolicy for RandomTiming {
    fn arrival_shift(&self, rng: &mut SimRng) -> f64 {
        self.config.arrival_shift.sample(rng)
    }

    fn arrival_margin(&self) -> f64 {
        self.config.arrival_shift.max
    }

    fn student_arrival(&self, rng: &mut SimRng) -> f64 {
        self.config.student_arrival.sample(rng)
    }

    fn student_departure(&self, rng: &mut SimRng) -> f64 {
        self.config.student_departure.sample(rng)
    }

    /// Draw a duration, then a start inside a random gap long enough to hold it.
    fn student_lunch(&self, schedule: &Schedule, day: u8, rng: &mut SimRng) -> Option<LunchWindow> {
        let duration = self.config.lunch_duration.sample(rng);
        let fitting: Vec<HourRange> = lunch_gaps(schedule, day, self.config.lunch_window)
            .into_iter()
            .filter(|gap| gap.span() >= duration)
            .collect();
        let gap = rng.choose(&fitting)?;
        let start = HourRange::new(gap.min, gap.max - duration).sample(rng);
        Some(LunchWindow { start, duration })
    }

    fn staff_work_start(&self, rng: &mut SimRng) -> f64 {
        self.config.staff_work_start.sample(rng)
    }

    fn staff_work_end(&self, rng: &mut SimRng) -> f64 {
        self.config.staff_work_end.sample(rng)
    }

    fn staff_lunch(&self, rng: &mut SimRng) -> LunchWindow {
        let start = self.config.staff_lunch_start.sample(rng);
        let duration = self.config.lunch_duration.sample(rng);
        LunchWindow { start, duration }
    }
}
