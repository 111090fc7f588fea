//! Hooks for watching a run from the outside.

use ud_behavior::{AgentAction, CommunityMember};
use ud_core::Tick;
use ud_schedule::FiredEvent;

/// Receives every dispatched event from [`Sim::run`][crate::Sim::run] and
/// [`Sim::run_until`][crate::Sim::run_until].
///
/// Both hooks default to no-ops.
///
/// ```rust,ignore
/// struct HomeCounter(usize);
///
/// impl SimObserver for HomeCounter {
///     fn on_event(&mut self, event: &FiredEvent<AgentAction>, _member: &CommunityMember) {
///         if event.action == AgentAction::ReturnHome {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// `member` is the event's target, already in its post-action state.
    fn on_event(&mut self, _event: &FiredEvent<AgentAction>, _member: &CommunityMember) {}

    /// Runs once, after the scheduler has been shut down.
    fn on_sim_end(&mut self, _final_tick: Tick, _dispatched: u64) {}
}

/// Observes nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
