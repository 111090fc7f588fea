//! `EventScheduler` - the run-wide discrete-event clock.
//!
//! # Role
//!
//! Agents never poll.  Every obligation (attend a class, go to lunch, leave
//! campus) is registered here as a one-time or recurring action targeting an
//! agent, and the simulation loop repeatedly calls [`EventScheduler::pop_next`]
//! to obtain the next action to dispatch.  Handlers may register and cancel
//! actions while they run, including their own.
//!
//! # Lifecycle
//!
//! One scheduler exists per simulation run.  It is created at tick 0 before
//! any agent registers, passed explicitly to every callback, and torn down
//! with [`EventScheduler::shutdown`], which invalidates every pending action.
//!
//! # Ordering
//!
//! Entries are ordered by `(tick, sequence)` where `sequence` is the
//! registration counter.  Actions due at the same tick therefore fire in
//! registration order (FIFO) regardless of which agent owns them, and a
//! recurring action keeps its original sequence on every occurrence.  This
//! makes the callback stream, and hence the RNG draw order, reproducible.
//!
//! # Cancellation
//!
//! Cancelling removes the action from the live table; its queue entry is
//! discarded lazily when it reaches the front.  Handles are never reused, so
//! cancelling an action that already fired (or was already cancelled) is a
//! harmless no-op.
//!
//! # Misuse
//!
//! Thousands of agents run unattended for simulated weeks, so misuse never
//! panics: a negative or non-finite delay, a non-positive interval, or a
//! registration after shutdown logs a warning and returns a handle that is
//! already dead.  A recurring action whose first tick lies in the past is
//! rolled forward to its first occurrence at or after `now`.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{trace, warn};
use ud_core::{AgentId, EventId, Tick};

// ── Public types ──────────────────────────────────────────────────────────────

/// An action handed back by [`EventScheduler::pop_next`].
#[derive(Clone, Debug, PartialEq)]
pub struct FiredEvent<A> {
    pub id:     EventId,
    pub at:     Tick,
    pub target: AgentId,
    pub action: A,
}

// ── Internal bookkeeping ──────────────────────────────────────────────────────

struct Registration<A> {
    target:     AgentId,
    action:     A,
    seq:        u64,
    first:      Tick,
    /// `None` for one-time actions.
    interval:   Option<f64>,
    occurrence: u64,
}

impl<A> Registration<A> {
    fn due_at(&self) -> Tick {
        match self.interval {
            Some(interval) => self.first + self.occurrence as f64 * interval,
            None => self.first,
        }
    }
}

struct QueueEntry {
    at:  Tick,
    seq: u64,
    id:  EventId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    /// Reversed so `BinaryHeap` (a max-heap) pops the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── EventScheduler ────────────────────────────────────────────────────────────

/// A cancellable one-time/recurring action queue over a real-valued clock.
///
/// `A` is the action payload; the scheduler only stores and clones it.
pub struct EventScheduler<A> {
    now:       Tick,
    next_id:   u64,
    next_seq:  u64,
    queue:     BinaryHeap<QueueEntry>,
    live:      HashMap<EventId, Registration<A>>,
    shut_down: bool,
}

impl<A> Default for EventScheduler<A> {
    fn default() -> Self {
        Self {
            now:       Tick::ZERO,
            next_id:   0,
            next_seq:  0,
            queue:     BinaryHeap::new(),
            live:      HashMap::new(),
            shut_down: false,
        }
    }
}

impl<A: Clone> EventScheduler<A> {
    /// A fresh scheduler with its clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Fire `action` for `target` once, `delay_ticks` after the current tick.
    pub fn schedule_one_time(&mut self, delay_ticks: f64, target: AgentId, action: A) -> EventId {
        if !delay_ticks.is_finite() || delay_ticks < 0.0 {
            warn!(%target, delay_ticks, now = %self.now, "ignoring one-time action scheduled in the past");
            return self.dead_handle();
        }
        let at = self.now + delay_ticks;
        self.register(at, None, target, action)
    }

    /// Fire `action` for `target` at `first_tick`, then every
    /// `interval_ticks` until cancelled or shut down.
    pub fn schedule_recurring(
        &mut self,
        first_tick:     Tick,
        target:         AgentId,
        interval_ticks: f64,
        action:         A,
    ) -> EventId {
        if !interval_ticks.is_finite() || interval_ticks <= 0.0 || !first_tick.0.is_finite() {
            warn!(%target, interval_ticks, first = %first_tick, "ignoring recurring action with invalid timing");
            return self.dead_handle();
        }
        self.register(first_tick, Some(interval_ticks), target, action)
    }

    fn register(&mut self, first: Tick, interval: Option<f64>, target: AgentId, action: A) -> EventId {
        if self.shut_down {
            warn!(%target, "ignoring registration after scheduler shutdown");
            return self.dead_handle();
        }

        let id = EventId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;

        let mut registration = Registration { target, action, seq, first, interval, occurrence: 0 };
        if let Some(interval) = interval {
            if first < self.now {
                registration.occurrence = ((self.now - first) / interval).ceil() as u64;
            }
        }
        let at = registration.due_at();

        trace!(?id, %target, %at, ?interval, "registered action");
        self.queue.push(QueueEntry { at, seq, id });
        self.live.insert(id, registration);
        id
    }

    /// A handle that was never live; cancelling it is a no-op.
    fn dead_handle(&mut self) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        id
    }

    // ── Cancellation ──────────────────────────────────────────────────────

    /// Cancel a pending action.  Returns `false` if it had already fired (a
    /// one-time action), was already cancelled, or never existed.
    pub fn cancel(&mut self, id: EventId) -> bool {
        let removed = self.live.remove(&id).is_some();
        trace!(?id, removed, "cancel");
        removed
    }

    /// `true` if `id` will still fire.
    #[inline]
    pub fn is_live(&self, id: EventId) -> bool {
        self.live.contains_key(&id)
    }

    /// Invalidate every pending action.  Later registrations are ignored.
    pub fn shutdown(&mut self) {
        trace!(pending = self.live.len(), now = %self.now, "scheduler shutdown");
        self.queue.clear();
        self.live.clear();
        self.shut_down = true;
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Remove and return the next live action due at or before `until`,
    /// advancing the clock to its tick.
    ///
    /// Recurring actions are re-armed before being returned, so the handler
    /// may cancel its own handle.  One-time actions are dead once returned.
    pub fn pop_next(&mut self, until: Tick) -> Option<FiredEvent<A>> {
        loop {
            let front = self.queue.peek()?;
            if !self.live.contains_key(&front.id) {
                self.queue.pop();
                continue;
            }
            if front.at > until {
                return None;
            }
            let entry = self.queue.pop()?;
            self.now = entry.at;

            let recurring = match self.live.get(&entry.id) {
                Some(reg) => reg.interval.is_some(),
                None => continue,
            };
            let fired = if recurring {
                let Some(reg) = self.live.get_mut(&entry.id) else { continue };
                let fired = FiredEvent {
                    id:     entry.id,
                    at:     entry.at,
                    target: reg.target,
                    action: reg.action.clone(),
                };
                reg.occurrence += 1;
                let next = QueueEntry { at: reg.due_at(), seq: reg.seq, id: entry.id };
                self.queue.push(next);
                fired
            } else {
                let Some(reg) = self.live.remove(&entry.id) else { continue };
                FiredEvent { id: entry.id, at: entry.at, target: reg.target, action: reg.action }
            };
            return Some(fired);
        }
    }

    /// Move the clock forward to `tick` (never backwards).
    pub fn advance_to(&mut self, tick: Tick) {
        if tick > self.now {
            self.now = tick;
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Number of live actions (recurring ones count once).
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Tick of the earliest live action, if any.
    pub fn next_tick(&self) -> Option<Tick> {
        self.queue
            .iter()
            .filter(|e| self.live.contains_key(&e.id))
            // `Ord` is reversed, so the greatest entry is the earliest.
            .max()
            .map(|e| e.at)
    }
}
