//! `ud-schedule` - groups, academic schedules, and the weekly event scheduler.
//!
//! # Crate layout
//!
//! | Module              | Contents                                                    |
//! |---------------------|-------------------------------------------------------------|
//! | [`activity`]        | `AcademicActivity` - one weekly class session               |
//! | [`group`]           | `Group` - capacity-bounded teaching group                   |
//! | [`schedule`]        | `Schedule`, `NextActivity` - a student's weekly plan        |
//! | [`event_scheduler`] | `EventScheduler<A>`, `FiredEvent<A>`                        |
//! | [`heuristics`]      | `random_enrollment`, `lunch_gaps`                           |
//! | [`loader`]          | `load_groups_csv`, `load_groups_reader`                     |
//! | [`error`]           | `ScheduleError`, `ScheduleResult<T>`                        |
//!
//! # Event model (summary)
//!
//! Every weekly obligation is registered once with the `EventScheduler` as a
//! recurring action with period `ticks_per_week`.  The scheduler fires
//! actions in `(tick, registration order)` order; actions may register or
//! cancel further actions while they are being handled.
//!
//! ```text
//! first_tick        = converter.day_time_to_ticks(day, hour)
//! occurrence n      = first_tick + n * ticks_per_week
//! ```

pub mod activity;
pub mod error;
pub mod event_scheduler;
pub mod group;
pub mod heuristics;
pub mod loader;
pub mod schedule;


pub use activity::AcademicActivity;
pub use error::{ScheduleError, ScheduleResult};
pub use event_scheduler::{EventScheduler, FiredEvent};
pub use group::Group;
pub use heuristics::{lunch_gaps, random_enrollment};
pub use loader::{load_groups_csv, load_groups_reader};
pub use schedule::{NextActivity, Schedule};
