//! `CommunityMember` - the agent state machine shared by every agent kind.
//!
//! ```text
//! AtHome ──► Commuting ──► OnCampus(InActivity | AtLunch | Leisure | Working)
//!   ▲                                        │
//!   └──────────── Commuting ◄────────────────┘  (exit through an in/out point)
//! ```
//!
//! Transitions happen only when a scheduled action fires.  Students and
//! support staff share this contract; what differs (how a week is planned,
//! which actions make sense) lives in [`Student`] and [`SupportStaff`] and is
//! selected by matching on [`MemberKind`].

use tracing::{debug, warn};
use ud_core::{AgentId, FacilityId};
use ud_schedule::{EventScheduler, Schedule};

use crate::{
    ActionContext, ActionRegistry, AgentAction, BehaviorResult, Destination, Facility,
    FacilityKind, MovePurpose, ScheduledActionKind, SelectionStrategy, Student, SupportStaff,
};

// ── State enums ───────────────────────────────────────────────────────────────

/// Disease compartment.  Held for the epidemic model; never changed here.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Compartment {
    #[default]
    Susceptible,
    Exposed,
    Infected,
    Recovered,
}

/// What a member is doing while on campus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CampusActivity {
    InActivity,
    AtLunch,
    Leisure,
    Working,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MemberState {
    #[default]
    AtHome,
    Commuting,
    OnCampus(CampusActivity),
}

impl MemberState {
    #[inline]
    pub fn is_on_campus(self) -> bool {
        matches!(self, MemberState::OnCampus(_))
    }
}

/// State reached once a move for `purpose` completes.
fn arrival_state(purpose: MovePurpose) -> MemberState {
    match purpose {
        MovePurpose::Activity => MemberState::OnCampus(CampusActivity::InActivity),
        MovePurpose::Lunch    => MemberState::OnCampus(CampusActivity::AtLunch),
        MovePurpose::Leisure  => MemberState::OnCampus(CampusActivity::Leisure),
        MovePurpose::Work     => MemberState::OnCampus(CampusActivity::Working),
        MovePurpose::Exit     => MemberState::Commuting,
        MovePurpose::Home     => MemberState::AtHome,
    }
}

// ── MemberCore ────────────────────────────────────────────────────────────────

/// State every member carries regardless of kind.
#[derive(Clone, Debug)]
pub struct MemberCore {
    pub(crate) id:          AgentId,
    pub(crate) compartment: Compartment,
    pub(crate) state:       MemberState,
    pub(crate) location:    Option<FacilityId>,
    pub(crate) registry:    ActionRegistry,
}

impl MemberCore {
    fn new(id: AgentId, compartment: Compartment) -> Self {
        Self {
            id,
            compartment,
            state: MemberState::AtHome,
            location: None,
            registry: ActionRegistry::new(),
        }
    }

    fn set_state(&mut self, next: MemberState) {
        if self.state != next {
            debug!(agent = %self.id, from = ?self.state, to = ?next, "state change");
            self.state = next;
        }
    }

    /// Teleport to `facility`.  Leaving home always passes through
    /// `Commuting` first.  Any move other than a leisure hop drops the
    /// pending hops, so none can fire into a class or a lunch.
    pub(crate) fn move_to_polygon(&mut self, facility: &Facility, purpose: MovePurpose, ctx: &mut ActionContext<'_>) {
        if self.state == MemberState::AtHome {
            self.set_state(MemberState::Commuting);
        }
        if purpose != MovePurpose::Leisure {
            self.registry.cancel_kind(ScheduledActionKind::ChangeLeisure, ctx.scheduler);
        }
        let now = ctx.now();
        ctx.geography.move_to(now, self.id, Destination::Facility(facility), purpose);
        debug!(agent = %self.id, facility = %facility.id, ?purpose, at = %now, "move");
        self.location = Some(facility.id.clone());
        self.set_state(arrival_state(purpose));
    }

    pub(crate) fn have_lunch(&mut self, ctx: &mut ActionContext<'_>) -> BehaviorResult<()> {
        let facilities = ctx.facilities;
        let place = facilities.choose(&[FacilityKind::EatingPlace], ctx.selection, ctx.rng)?;
        self.move_to_polygon(place, MovePurpose::Lunch, ctx);
        Ok(())
    }

    /// Leave campus through an in/out point (when the campus has any) and go
    /// home.  Pending leisure hops die with the day.
    pub(crate) fn return_home(&mut self, ctx: &mut ActionContext<'_>) -> BehaviorResult<()> {
        if self.state == MemberState::AtHome {
            debug!(agent = %self.id, "return_home while already home");
            return Ok(());
        }
        let facilities = ctx.facilities;
        if facilities.count(FacilityKind::InOut) > 0 {
            let exit = facilities.choose(&[FacilityKind::InOut], SelectionStrategy::Uniform, ctx.rng)?;
            self.move_to_polygon(exit, MovePurpose::Exit, ctx);
        }
        let now = ctx.now();
        ctx.geography.move_to(now, self.id, Destination::Home, MovePurpose::Home);
        debug!(agent = %self.id, at = %now, "home");
        self.location = None;
        self.set_state(MemberState::AtHome);
        self.registry.cancel_kind(ScheduledActionKind::ChangeLeisure, ctx.scheduler);
        Ok(())
    }
}

// ── CommunityMember ───────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum MemberKind {
    Student(Student),
    Staff(SupportStaff),
}

/// One simulated person on campus.
#[derive(Clone, Debug)]
pub struct CommunityMember {
    core: MemberCore,
    kind: MemberKind,
}

impl CommunityMember {
    pub fn student(id: AgentId, compartment: Compartment, schedule: Schedule) -> Self {
        Self {
            core: MemberCore::new(id, compartment),
            kind: MemberKind::Student(Student::new(schedule)),
        }
    }

    pub fn staff(id: AgentId, compartment: Compartment, workplace: FacilityId) -> Self {
        Self {
            core: MemberCore::new(id, compartment),
            kind: MemberKind::Staff(SupportStaff::new(workplace)),
        }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.core.id
    }

    #[inline]
    pub fn compartment(&self) -> Compartment {
        self.core.compartment
    }

    #[inline]
    pub fn state(&self) -> MemberState {
        self.core.state
    }

    /// Facility the member is in, `None` when at home.
    pub fn location(&self) -> Option<&FacilityId> {
        self.core.location.as_ref()
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.core.registry
    }

    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    pub fn as_student(&self) -> Option<&Student> {
        match &self.kind {
            MemberKind::Student(s) => Some(s),
            MemberKind::Staff(_) => None,
        }
    }

    pub fn is_student(&self) -> bool {
        self.as_student().is_some()
    }

    /// Register the member's whole weekly routine.  Called once before the
    /// first tick; every registration lands in the action registry.
    ///
    /// Order is fixed: activities, arrivals, departures, lunch.
    pub fn plan_weekly_events(&mut self, ctx: &mut ActionContext<'_>) {
        let CommunityMember { core, kind } = self;
        match kind {
            MemberKind::Student(s) => {
                s.schedule_activities(core, ctx);
                s.schedule_arrivals(core, ctx);
                s.schedule_departures(core, ctx);
                s.schedule_lunch(core, ctx);
            }
            MemberKind::Staff(s) => {
                s.schedule_activities(core, ctx);
                s.schedule_arrivals(core, ctx);
                s.schedule_departures(core, ctx);
                s.schedule_lunch(core, ctx);
            }
        }
    }

    /// Dispatch a fired action.
    ///
    /// A lookup failure aborts this action only: the member's state is left
    /// as it was and the scheduler is untouched.
    pub fn handle(&mut self, action: &AgentAction, ctx: &mut ActionContext<'_>) -> BehaviorResult<()> {
        let CommunityMember { core, kind } = self;
        match action {
            AgentAction::HaveLunch => core.have_lunch(ctx),
            AgentAction::ReturnHome => core.return_home(ctx),
            _ => match kind {
                MemberKind::Student(s) => s.handle(core, action, ctx),
                MemberKind::Staff(s) => s.handle(core, action, ctx),
            },
        }
    }

    pub fn move_to_polygon(&mut self, facility: &Facility, purpose: MovePurpose, ctx: &mut ActionContext<'_>) {
        self.core.move_to_polygon(facility, purpose, ctx);
    }

    pub fn return_home(&mut self, ctx: &mut ActionContext<'_>) -> BehaviorResult<()> {
        self.core.return_home(ctx)
    }

    /// Cancel every action the member holds.  Returns how many were live.
    pub fn deschedule(&mut self, scheduler: &mut EventScheduler<AgentAction>) -> usize {
        let cancelled = self.core.registry.cancel_all(scheduler);
        debug!(agent = %self.core.id, cancelled, "descheduled");
        cancelled
    }

    /// Give a student a new schedule: drop every pending action and plan the
    /// week again.  Returns `false` (doing nothing) for staff.
    pub fn reassign_schedule(&mut self, schedule: Schedule, ctx: &mut ActionContext<'_>) -> bool {
        let MemberKind::Student(student) = &mut self.kind else {
            warn!(agent = %self.core.id, "reassign_schedule on a non-student ignored");
            return false;
        };
        student.set_schedule(schedule);
        self.deschedule(ctx.scheduler);
        self.plan_weekly_events(ctx);
        true
    }
}
