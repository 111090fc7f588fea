//! `Group` - a capacity-bounded teaching-group offering.

use std::collections::BTreeSet;

use crate::AcademicActivity;

/// One teaching group with a fixed number of seats.
///
/// Created once at build time from the roster source.  `capacity` never
/// changes afterwards and the enrollment count only grows: [`enroll`] is the
/// sole mutator and refuses (without side effects) once the group is full.
///
/// [`enroll`]: Group::enroll
#[derive(Clone, Debug)]
pub struct Group {
    id:                  String,
    capacity:            u32,
    enrollments_count:   u32,
    academic_activities: Vec<AcademicActivity>,
}

impl Group {
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
            enrollments_count: 0,
            academic_activities: Vec::new(),
        }
    }

    /// Append a weekly session.  Sessions keep their insertion order.
    pub fn add_academic_activity(&mut self, activity: AcademicActivity) {
        self.academic_activities.push(activity);
    }

    /// Take one seat.  Returns `false`, leaving the count untouched, when the
    /// group is already full.
    pub fn enroll(&mut self) -> bool {
        if self.enrollments_count < self.capacity {
            self.enrollments_count += 1;
            true
        } else {
            false
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn enrollments_count(&self) -> u32 {
        self.enrollments_count
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.enrollments_count >= self.capacity
    }

    pub fn academic_activities(&self) -> &[AcademicActivity] {
        &self.academic_activities
    }

    /// Days on which this group meets.
    pub fn activity_days(&self) -> BTreeSet<u8> {
        self.academic_activities.iter().map(|a| a.day()).collect()
    }
}
