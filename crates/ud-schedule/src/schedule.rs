//! `Schedule` - a student's weekly academic plan.
//!
//! A schedule is the ordered list of groups the student enrolled in.  The
//! groups are shared (`Arc`) with every other student in them; the schedule
//! never mutates them.  All queries are derived on demand from the groups'
//! activities, walking them in enrollment order so ties resolve stably.

use std::collections::BTreeSet;
use std::sync::Arc;

use ud_core::{DAYS_PER_WEEK, HOURS_PER_DAY};

use crate::{AcademicActivity, Group};

// ── NextActivity ──────────────────────────────────────────────────────────────

/// Result of [`Schedule::next_academic_activity`].
#[derive(Copy, Clone, Debug)]
pub struct NextActivity<'a> {
    pub activity:   &'a AcademicActivity,
    /// 0 when the activity is later on the queried day.
    pub days_ahead: u8,
}

impl NextActivity<'_> {
    #[inline]
    pub fn is_today(&self) -> bool {
        self.days_ahead == 0
    }

    /// Hours from `hour` on the queried day until the activity starts.
    #[inline]
    pub fn hours_until(&self, hour: f64) -> f64 {
        self.days_ahead as f64 * HOURS_PER_DAY + self.activity.start_time() - hour
    }
}

// ── Schedule ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Schedule {
    groups: Vec<Arc<Group>>,
}

impl Schedule {
    pub fn new(groups: Vec<Arc<Group>>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Arc<Group>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.activities().next().is_none()
    }

    /// Every enrolled activity, in enrollment order.
    pub fn activities(&self) -> impl Iterator<Item = &AcademicActivity> + '_ {
        self.groups.iter().flat_map(|g| g.academic_activities())
    }

    pub fn activities_in_day(&self, day: u8) -> impl Iterator<Item = &AcademicActivity> + '_ {
        self.activities().filter(move |a| a.day() == day)
    }

    /// Days with at least one activity, ascending.
    pub fn campus_days(&self) -> Vec<u8> {
        self.activities()
            .map(|a| a.day())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The next activity after `(day, hour)`.
    ///
    /// Looks first for the earliest activity on `day` starting strictly after
    /// `hour`, then at the following campus days, wrapping past Sunday but
    /// never back to `day` itself.  `None` when nothing is left (e.g. a
    /// single-day schedule whose last session already started).
    pub fn next_academic_activity(&self, day: u8, hour: f64) -> Option<NextActivity<'_>> {
        debug_assert!((1..=DAYS_PER_WEEK).contains(&day), "day must be in 1..=7");

        let later_today = earliest_start(self.activities_in_day(day).filter(|a| a.start_time() > hour));
        if let Some(activity) = later_today {
            return Some(NextActivity { activity, days_ahead: 0 });
        }

        (1..DAYS_PER_WEEK).find_map(|offset| {
            let next_day = (day - 1 + offset) % DAYS_PER_WEEK + 1;
            earliest_start(self.activities_in_day(next_day))
                .map(|activity| NextActivity { activity, days_ahead: offset })
        })
    }

    /// Activity with the smallest start time on `day`; `None` off campus days.
    pub fn first_academic_activity_in_day(&self, day: u8) -> Option<&AcademicActivity> {
        earliest_start(self.activities_in_day(day))
    }

    /// Activity with the largest end time on `day`; `None` off campus days.
    pub fn last_academic_activity_in_day(&self, day: u8) -> Option<&AcademicActivity> {
        self.activities_in_day(day)
            .max_by(|a, b| a.end_time().total_cmp(&b.end_time()))
    }
}

/// `min_by` keeps the first of equal elements, which preserves enrollment
/// order on ties.
fn earliest_start<'a>(
    activities: impl Iterator<Item = &'a AcademicActivity>,
) -> Option<&'a AcademicActivity> {
    activities.min_by(|a, b| a.start_time().total_cmp(&b.start_time()))
}
