//! CSV group-roster loader.
//!
//! # CSV format
//!
//! One row per academic activity.  All rows for the same group must share
//! the same `capacity` value.
//!
//! ```csv
//! group_id,capacity,day,start_time,end_time,facility_id,room
//! MATH-101-A,40,1,9,11,ML,ML-201
//! MATH-101-A,40,3,9,11,ML,ML-201
//! PHYS-110-B,35,2,14,16,AU,AU-104
//! ```
//!
//! `day` is 1 (Monday) … 7 (Sunday); times are clock hours and may be
//! fractional (`9.5` = 09:30).
//!
//! Groups are returned in the order their first row appears, which fixes the
//! roster order (and therefore enrollment tie-breaks) independently of any
//! hashing.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ud_core::FacilityId;

use crate::{AcademicActivity, Group, ScheduleError};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RosterRecord {
    group_id:    String,
    capacity:    u32,
    day:         u8,
    start_time:  f64,
    end_time:    f64,
    facility_id: String,
    room:        String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the group roster from a CSV file.
pub fn load_groups_csv(path: &Path) -> Result<Vec<Group>, ScheduleError> {
    let file = std::fs::File::open(path)
        .map_err(ScheduleError::Io)?;
    load_groups_reader(file)
}

/// Like [`load_groups_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded rosters.
pub fn load_groups_reader<R: Read>(reader: R) -> Result<Vec<Group>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut groups: Vec<Group> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    for result in csv_reader.deserialize::<RosterRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        validate_row(&row)?;

        let idx = match index_of.get(&row.group_id) {
            Some(&idx) => {
                let expected = groups[idx].capacity();
                if expected != row.capacity {
                    return Err(ScheduleError::CapacityMismatch {
                        group: row.group_id,
                        expected,
                        got: row.capacity,
                    });
                }
                idx
            }
            None => {
                groups.push(Group::new(row.group_id.clone(), row.capacity));
                index_of.insert(row.group_id.clone(), groups.len() - 1);
                groups.len() - 1
            }
        };

        groups[idx].add_academic_activity(AcademicActivity::new(
            row.day,
            row.start_time,
            row.end_time,
            FacilityId::from(row.facility_id),
            row.room,
        ));
    }

    Ok(groups)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn validate_row(row: &RosterRecord) -> Result<(), ScheduleError> {
    if !(1..=7).contains(&row.day) {
        return Err(ScheduleError::Parse(format!(
            "group {:?}: day {} is outside 1..=7",
            row.group_id, row.day
        )));
    }
    let in_day = |h: f64| (0.0..=24.0).contains(&h);
    if !in_day(row.start_time) || !in_day(row.end_time) || row.start_time > row.end_time {
        return Err(ScheduleError::Parse(format!(
            "group {:?}: invalid session {}–{}",
            row.group_id, row.start_time, row.end_time
        )));
    }
    Ok(())
}
