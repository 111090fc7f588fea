//! Mutable simulation state handed to every agent callback.

use ud_core::{AgentId, DayTime, EventId, SimRng, Tick, TickConverter};
use ud_schedule::EventScheduler;

use crate::{AgentAction, Facilities, Geography, LeisureConfig, SelectionStrategy, TimingPolicy};

/// Everything an agent may touch while planning or handling an action.
///
/// Built by ud-sim for each dispatch.  Callbacks run strictly one at a time,
/// so the scheduler and RNG are lent out mutably; the facility registries are
/// shared read-only.
pub struct ActionContext<'a> {
    pub converter:  TickConverter,
    pub scheduler:  &'a mut EventScheduler<AgentAction>,
    pub facilities: &'a Facilities,
    pub rng:        &'a mut SimRng,
    pub timing:     &'a dyn TimingPolicy,
    pub selection:  SelectionStrategy,
    pub leisure:    &'a LeisureConfig,
    pub geography:  &'a mut dyn Geography,
}

impl ActionContext<'_> {
    /// Current simulation tick (the scheduler's clock).
    #[inline]
    pub fn now(&self) -> Tick {
        self.scheduler.now()
    }

    /// Current `(day, hour)`.
    pub fn day_time(&self) -> DayTime {
        self.converter.ticks_to_day_time(self.now())
    }

    /// Register `action` every week at `(day, hour)`.
    ///
    /// `hour` may fall outside `0..24`; it wraps into the neighbouring day.
    pub fn schedule_weekly(&mut self, agent: AgentId, day: u8, hour: f64, action: AgentAction) -> EventId {
        let first = self.converter.day_time_to_ticks(i32::from(day), hour);
        let period = self.converter.ticks_per_week();
        self.scheduler.schedule_recurring(first, agent, period, action)
    }

    /// Register `action` once, `hours` from now.
    pub fn schedule_in_hours(&mut self, agent: AgentId, hours: f64, action: AgentAction) -> EventId {
        let delay = self.converter.hours_to_ticks(hours);
        self.scheduler.schedule_one_time(delay, agent, action)
    }
}
