//! `ud-behavior` - what community members do, and when.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                           |
//! |---------------|--------------------------------------------------------------------|
//! | [`action`]    | `AgentAction`, `ScheduledActionKind`, `ActionRegistry`             |
//! | [`context`]   | `ActionContext<'a>` - mutable run state lent to each callback      |
//! | [`facility`]  | `Facility`, `FacilityKind`, `Facilities`, `SelectionStrategy`      |
//! | [`geography`] | `Geography` seam, `NoopGeography`, `MoveLog`, `MovePurpose`        |
//! | [`member`]    | `CommunityMember` state machine, `MemberState`, `Compartment`      |
//! | [`student`]   | `Student` policy, `LeisureConfig`                                  |
//! | [`staff`]     | `SupportStaff` policy                                              |
//! | [`timing`]    | `TimingPolicy` trait, `RandomTiming`, `TimingConfig`               |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                               |
//!
//! # Design notes
//!
//! Agents never poll.  [`CommunityMember::plan_weekly_events`] registers a
//! member's whole week with the scheduler as recurring actions; from then on
//! the member only reacts to fired [`AgentAction`]s via
//! [`CommunityMember::handle`], which may in turn book one-time follow-ups
//! (leisure hops).  Every handle is filed in the member's [`ActionRegistry`]
//! so a re-plan can cancel exactly what it replaces.
//!
//! Callbacks run one at a time in scheduler order and draw from one shared
//! RNG, which is what makes a run reproducible from its seed.

pub mod action;
pub mod context;
pub mod error;
pub mod facility;
pub mod geography;
pub mod member;
pub mod staff;
pub mod student;
pub mod timing;


pub use action::{ActionRegistry, AgentAction, ScheduledActionKind};
pub use context::ActionContext;
pub use error::{BehaviorError, BehaviorResult};
pub use facility::{Facilities, Facility, FacilityKind, SelectionStrategy};
pub use geography::{Destination, Geography, MoveLog, MovePurpose, MoveRecord, NoopGeography};
pub use member::{CampusActivity, CommunityMember, Compartment, MemberKind, MemberState};
pub use staff::{SupportStaff, WORKING_DAYS};
pub use student::{LeisureConfig, Student, FUN_CHANGE_FREQUENCY, MIN_TIME_TO_FUN};
pub use timing::{LunchWindow, RandomTiming, TimingConfig, TimingPolicy};
