//! Schedule-construction heuristics.
//!
//! - [`random_enrollment`] - draws a clash-free set of groups for one
//!   student, respecting group capacity.
//! - [`lunch_gaps`] - free intervals of a day inside a lunch window, used
//!   by timing policies to place a lunch break between classes.

use ud_core::{HourRange, SimRng};

use crate::{AcademicActivity, Group, Schedule};

/// Enroll one student in up to `target` groups.
///
/// Groups are visited in random order.  A group is skipped when it is full
/// (capacity exhaustion is an expected outcome, not an error) or when one of
/// its sessions overlaps a session of a group already chosen.  Returns the
/// indices of the groups enrolled, in enrollment order; the result may hold
/// fewer than `target` entries when the roster runs out of candidates.
pub fn random_enrollment(groups: &mut [Group], rng: &mut SimRng, target: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    rng.shuffle(&mut order);

    let mut chosen: Vec<usize> = Vec::with_capacity(target);
    for idx in order {
        if chosen.len() >= target {
            break;
        }
        let candidate = &groups[idx];
        if candidate.is_full() {
            continue;
        }
        let clashes = chosen.iter().any(|&c| {
            sessions_clash(groups[c].academic_activities(), candidate.academic_activities())
        });
        if clashes {
            continue;
        }
        if groups[idx].enroll() {
            chosen.push(idx);
        }
    }
    chosen
}

fn sessions_clash(a: &[AcademicActivity], b: &[AcademicActivity]) -> bool {
    a.iter().any(|x| b.iter().any(|y| x.overlaps(y)))
}

/// Free intervals of `day` within `window` that no activity covers.
///
/// Intervals are returned in chronological order and have positive length.
pub fn lunch_gaps(schedule: &Schedule, day: u8, window: HourRange) -> Vec<HourRange> {
    let mut sessions: Vec<&AcademicActivity> = schedule.activities_in_day(day).collect();
    sessions.sort_by(|a, b| a.start_time().total_cmp(&b.start_time()));

    let mut gaps = Vec::new();
    let mut cursor = window.min;
    for session in sessions {
        if cursor >= window.max {
            break;
        }
        let gap_end = session.start_time().min(window.max);
        if gap_end > cursor {
            gaps.push(HourRange::new(cursor, gap_end));
        }
        cursor = cursor.max(session.end_time());
    }
    if cursor < window.max {
        gaps.push(HourRange::new(cursor, window.max));
    }
    gaps
}
