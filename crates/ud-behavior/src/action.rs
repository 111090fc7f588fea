//! Agent actions and the per-agent registry of scheduled handles.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;
use ud_core::{EventId, FacilityId};
use ud_schedule::EventScheduler;

/// Everything the scheduler can ask a community member to do.
///
/// The payload travels with the registration, so a fired event carries all
/// it needs and dispatch is a plain `match`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentAction {
    /// Walk to a class at the given teaching facility.
    AttendActivity { facility: FacilityId },
    /// A class ended; decide between the next class and leisure.
    LeaveActivity,
    /// Spend free time at a shared area or eating place.
    HaveFun,
    HaveLunch,
    ReturnHome,
    /// Staff only: go to the workplace.
    Work,
}

impl AgentAction {
    pub fn name(&self) -> &'static str {
        match self {
            AgentAction::AttendActivity { .. } => "attend_activity",
            AgentAction::LeaveActivity         => "leave_activity",
            AgentAction::HaveFun               => "have_fun",
            AgentAction::HaveLunch             => "have_lunch",
            AgentAction::ReturnHome            => "return_home",
            AgentAction::Work                  => "work",
        }
    }
}

impl fmt::Display for AgentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentAction::AttendActivity { facility } => write!(f, "attend_activity({facility})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Registry key: the category a scheduled handle was registered under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScheduledActionKind {
    AttendActivity,
    ArriveCampus,
    ReturnHome,
    HaveLunch,
    /// Pending one-time leisure hops.
    ChangeLeisure,
}

// ── ActionRegistry ────────────────────────────────────────────────────────────

/// Handles an agent holds with the scheduler, grouped by category.
///
/// Whatever is registered here can be cancelled; a handle missing from the
/// registry would keep firing after a re-plan.
#[derive(Clone, Debug, Default)]
pub struct ActionRegistry {
    handles: BTreeMap<ScheduledActionKind, Vec<EventId>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every handle held under `kind`, then hold `handles` instead.
    pub fn replace<A: Clone>(
        &mut self,
        kind:      ScheduledActionKind,
        handles:   Vec<EventId>,
        scheduler: &mut EventScheduler<A>,
    ) {
        self.cancel_kind(kind, scheduler);
        if !handles.is_empty() {
            self.handles.insert(kind, handles);
        }
    }

    pub fn push(&mut self, kind: ScheduledActionKind, handle: EventId) {
        self.handles.entry(kind).or_default().push(handle);
    }

    pub fn handles(&self, kind: ScheduledActionKind) -> &[EventId] {
        self.handles.get(&kind).map_or(&[][..], Vec::as_slice)
    }

    /// Cancel and forget every handle under `kind`.  Returns how many were
    /// still live.
    pub fn cancel_kind<A: Clone>(&mut self, kind: ScheduledActionKind, scheduler: &mut EventScheduler<A>) -> usize {
        let Some(handles) = self.handles.remove(&kind) else { return 0 };
        let cancelled = handles.into_iter().filter(|&id| scheduler.cancel(id)).count();
        trace!(?kind, cancelled, "cancelled registry entries");
        cancelled
    }

    /// Cancel and forget every handle.  Returns how many were still live.
    pub fn cancel_all<A: Clone>(&mut self, scheduler: &mut EventScheduler<A>) -> usize {
        let kinds: Vec<ScheduledActionKind> = self.handles.keys().copied().collect();
        kinds.into_iter().map(|k| self.cancel_kind(k, scheduler)).sum()
    }

    /// Forget handles under `kind` that already fired or were cancelled.
    pub fn prune<A: Clone>(&mut self, kind: ScheduledActionKind, scheduler: &EventScheduler<A>) {
        if let Some(handles) = self.handles.get_mut(&kind) {
            handles.retain(|&id| scheduler.is_live(id));
            if handles.is_empty() {
                self.handles.remove(&kind);
            }
        }
    }

    /// Total number of held handles.
    pub fn len(&self) -> usize {
        self.handles.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
