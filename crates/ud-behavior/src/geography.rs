//! The seam to the geography collaborator.
//!
//! This crate decides *where* and *when* an agent goes.  *How* it gets
//! there (routing, geometry, walking speed) belongs to whatever implements
//! [`Geography`]; the core only reports each teleport.

use ud_core::{AgentId, FacilityId, Tick};

use crate::Facility;

/// Why an agent is moving.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MovePurpose {
    Activity,
    Leisure,
    Lunch,
    Work,
    /// Leaving campus through an in/out point.
    Exit,
    Home,
}

impl MovePurpose {
    pub const ALL: [MovePurpose; 6] = [
        MovePurpose::Activity,
        MovePurpose::Leisure,
        MovePurpose::Lunch,
        MovePurpose::Work,
        MovePurpose::Exit,
        MovePurpose::Home,
    ];

    /// Same spelling as the serde name.
    pub fn as_str(self) -> &'static str {
        match self {
            MovePurpose::Activity => "activity",
            MovePurpose::Leisure  => "leisure",
            MovePurpose::Lunch    => "lunch",
            MovePurpose::Work     => "work",
            MovePurpose::Exit     => "exit",
            MovePurpose::Home     => "home",
        }
    }
}

/// Where a move ends.
#[derive(Copy, Clone, Debug)]
pub enum Destination<'a> {
    Facility(&'a Facility),
    /// Off campus; no polygon.
    Home,
}

impl Destination<'_> {
    pub fn facility_id(&self) -> Option<&FacilityId> {
        match self {
            Destination::Facility(f) => Some(&f.id),
            Destination::Home => None,
        }
    }
}

/// Receives every agent relocation decided by the movement core.
pub trait Geography {
    fn move_to(&mut self, at: Tick, agent: AgentId, destination: Destination<'_>, purpose: MovePurpose);
}

/// Ignores every move.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopGeography;

impl Geography for NoopGeography {
    fn move_to(&mut self, _at: Tick, _agent: AgentId, _destination: Destination<'_>, _purpose: MovePurpose) {}
}

// ── MoveLog ───────────────────────────────────────────────────────────────────

/// One recorded move.  `facility` is `None` for moves home.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    pub at:       Tick,
    pub agent:    AgentId,
    pub facility: Option<FacilityId>,
    pub purpose:  MovePurpose,
}

/// A [`Geography`] that keeps every move in order, for tests and traces.
#[derive(Clone, Debug, Default)]
pub struct MoveLog {
    moves: Vec<MoveRecord>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn for_agent(&self, agent: AgentId) -> impl Iterator<Item = &MoveRecord> + '_ {
        self.moves.iter().filter(move |m| m.agent == agent)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

impl Geography for MoveLog {
    fn move_to(&mut self, at: Tick, agent: AgentId, destination: Destination<'_>, purpose: MovePurpose) {
        self.moves.push(MoveRecord {
            at,
            agent,
            facility: destination.facility_id().cloned(),
            purpose,
        });
    }
}
