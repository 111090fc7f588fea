//! The `Sim` struct and its event-dispatch loop.

use std::sync::Arc;

use tracing::{debug, info};
use ud_behavior::{ActionContext, AgentAction, CommunityMember, Facilities, Geography, TimingPolicy};
use ud_core::{AgentId, SimRng, Tick, TickConverter};
use ud_schedule::{EventScheduler, FiredEvent, Group};

use crate::{CampusConfig, SimError, SimObserver, SimResult};

/// The main simulation runner.
///
/// `Sim<G>` owns all run state.  Its loop is a single sequential drain of
/// the event scheduler:
///
/// 1. Pop the earliest live action (ties in registration order).
/// 2. Lend the run state to the target member as an [`ActionContext`] and
///    let it handle the action; the handler may register or cancel actions.
/// 3. Report the event to the observer.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<G: Geography> {
    /// Run configuration (seed, duration, population, policies).
    pub config: CampusConfig,

    pub converter: TickConverter,

    /// The run's only clock.  Shut down when [`run`](Self::run) returns.
    pub scheduler: EventScheduler<AgentAction>,

    /// Every community member, indexed by `AgentId`.
    pub members: Vec<CommunityMember>,

    pub facilities: Facilities,

    /// The roster, frozen after enrollment and shared with the schedules.
    pub groups: Vec<Arc<Group>>,

    /// Shared RNG, already advanced past every build-time draw.
    pub rng: SimRng,

    pub timing: Box<dyn TimingPolicy>,

    pub geography: G,

    pub(crate) dispatched: u64,
}

impl<G: Geography> Sim<G> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run to `config.sim.end_tick()`, then shut the scheduler down.
    ///
    /// Returns the number of events dispatched during this call.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<u64> {
        let end = self.config.sim.end_tick();
        info!(end = %end, pending = self.scheduler.pending(), "run start");
        let dispatched = self.run_until(end, observer)?;
        self.shutdown();
        observer.on_sim_end(self.scheduler.now(), self.dispatched);
        info!(dispatched = self.dispatched, "run complete");
        Ok(dispatched)
    }

    /// Dispatch every event due at or before `until` and leave the clock
    /// there.  Useful for tests and incremental stepping; the scheduler stays
    /// live.
    ///
    /// A failed action aborts the call with [`SimError::Action`].  The
    /// scheduler is left consistent (the failed action is consumed, recurring
    /// ones stay armed), so the run may be resumed.
    pub fn run_until<O: SimObserver>(&mut self, until: Tick, observer: &mut O) -> SimResult<u64> {
        let mut dispatched = 0;
        while let Some(event) = self.scheduler.pop_next(until) {
            self.dispatch(&event)?;
            dispatched += 1;
            self.dispatched += 1;
            observer.on_event(&event, &self.members[event.target.index()]);
        }
        self.scheduler.advance_to(until);
        debug!(until = %until, dispatched, "stepped");
        Ok(dispatched)
    }

    /// Invalidate every pending action.  Later registrations are ignored.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.scheduler.now()
    }

    /// Events dispatched since the sim was built.
    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn member(&self, id: AgentId) -> Option<&CommunityMember> {
        self.members.get(id.index())
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    fn dispatch(&mut self, event: &FiredEvent<AgentAction>) -> SimResult<()> {
        let member = self
            .members
            .get_mut(event.target.index())
            .ok_or(SimError::UnknownAgent(event.target))?;
        let mut ctx = ActionContext {
            converter:  self.converter,
            scheduler:  &mut self.scheduler,
            facilities: &self.facilities,
            rng:        &mut self.rng,
            timing:     self.timing.as_ref(),
            selection:  self.config.selection,
            leisure:    &self.config.leisure,
            geography:  &mut self.geography,
        };
        member.handle(&event.action, &mut ctx).map_err(|source| SimError::Action {
            agent: event.target,
            action: event.action.name(),
            source,
        })
    }
}
