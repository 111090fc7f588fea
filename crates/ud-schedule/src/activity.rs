//! `AcademicActivity` - one weekly recurring class session.
//!
//! Activities are immutable values owned by their [`Group`][crate::Group].
//! Times are clock hours on `day` (1 = Monday … 7 = Sunday); a session never
//! spans midnight.

use ud_core::FacilityId;

#[derive(Clone, Debug, PartialEq)]
pub struct AcademicActivity {
    day:                  u8,
    start_time:           f64,
    end_time:             f64,
    teaching_facility_id: FacilityId,
    room:                 String,
}

impl AcademicActivity {
    /// # Panics
    ///
    /// Panics in debug mode if `day` is outside `1..=7` or the session ends
    /// before it starts.
    pub fn new(
        day:                  u8,
        start_time:           f64,
        end_time:             f64,
        teaching_facility_id: FacilityId,
        room:                 impl Into<String>,
    ) -> Self {
        debug_assert!((1..=7).contains(&day), "day must be in 1..=7");
        debug_assert!(start_time <= end_time, "activity ends before it starts");
        Self {
            day,
            start_time,
            end_time,
            teaching_facility_id,
            room: room.into(),
        }
    }

    #[inline]
    pub fn day(&self) -> u8 {
        self.day
    }

    #[inline]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    #[inline]
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn teaching_facility_id(&self) -> &FacilityId {
        &self.teaching_facility_id
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// Session length in hours.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// `true` if both sessions share a day and their time spans intersect.
    /// Back-to-back sessions (one ends exactly when the other starts) do not
    /// overlap.
    pub fn overlaps(&self, other: &AcademicActivity) -> bool {
        self.day == other.day
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}
