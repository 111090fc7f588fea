//! Campus facility registries and destination selection.
//!
//! Facilities are grouped by [`FacilityKind`] and keyed by id in ordered
//! maps, so iteration (and therefore every random draw over a union of
//! registries) is identical across runs with the same seed.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ud_core::{FacilityId, GeoPoint, SimRng};

use crate::{BehaviorError, BehaviorResult};

// ── FacilityKind ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FacilityKind {
    Teaching,
    SharedArea,
    EatingPlace,
    InOut,
    ParkingLot,
    Workplace,
}

impl FacilityKind {
    pub const ALL: [FacilityKind; 6] = [
        FacilityKind::Teaching,
        FacilityKind::SharedArea,
        FacilityKind::EatingPlace,
        FacilityKind::InOut,
        FacilityKind::ParkingLot,
        FacilityKind::Workplace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FacilityKind::Teaching    => "teaching",
            FacilityKind::SharedArea  => "shared_area",
            FacilityKind::EatingPlace => "eating_place",
            FacilityKind::InOut       => "in_out",
            FacilityKind::ParkingLot  => "parking_lot",
            FacilityKind::Workplace   => "workplace",
        }
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityKind {
    type Err = BehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FacilityKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| BehaviorError::UnknownFacilityKind(s.to_owned()))
    }
}

// ── Facility ──────────────────────────────────────────────────────────────────

/// One campus polygon, reduced to what the movement core needs: where it is
/// and how large it is (the weight for area-based selection).
#[derive(Clone, Debug, PartialEq)]
pub struct Facility {
    pub id:       FacilityId,
    pub kind:     FacilityKind,
    pub centroid: GeoPoint,
    /// Floor area in m².
    pub area:     f64,
}

impl Facility {
    pub fn new(id: impl Into<FacilityId>, kind: FacilityKind, centroid: GeoPoint, area: f64) -> Self {
        Self { id: id.into(), kind, centroid, area }
    }
}

// ── SelectionStrategy ─────────────────────────────────────────────────────────

/// How a destination is drawn from a set of candidate facilities.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionStrategy {
    /// Every candidate is equally likely.
    #[default]
    Uniform,
    /// Probability proportional to floor area.
    AreaWeighted,
}

// ── Facilities ────────────────────────────────────────────────────────────────

/// Read-only (after build) registry of every campus facility.
#[derive(Clone, Debug, Default)]
pub struct Facilities {
    by_kind: BTreeMap<FacilityKind, BTreeMap<FacilityId, Facility>>,
}

impl Facilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a facility, returning the one it replaced (same kind and id).
    pub fn insert(&mut self, facility: Facility) -> Option<Facility> {
        self.by_kind
            .entry(facility.kind)
            .or_default()
            .insert(facility.id.clone(), facility)
    }

    /// Keyed lookup.  A missing id is a lookup failure, not a sentinel.
    pub fn get(&self, kind: FacilityKind, id: &FacilityId) -> BehaviorResult<&Facility> {
        self.by_kind
            .get(&kind)
            .and_then(|m| m.get(id))
            .ok_or_else(|| BehaviorError::FacilityNotFound { kind, id: id.clone() })
    }

    pub fn contains(&self, kind: FacilityKind, id: &FacilityId) -> bool {
        self.by_kind.get(&kind).is_some_and(|m| m.contains_key(id))
    }

    /// Facilities of one kind, ordered by id.
    pub fn of_kind(&self, kind: FacilityKind) -> impl Iterator<Item = &Facility> + '_ {
        self.by_kind.get(&kind).into_iter().flat_map(|m| m.values())
    }

    pub fn count(&self, kind: FacilityKind) -> usize {
        self.by_kind.get(&kind).map_or(0, BTreeMap::len)
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draw one facility from the union of `kinds`.
    ///
    /// The union is assembled on the fly (kinds in the order given, ids
    /// ascending within a kind); no registry is modified.  A single candidate
    /// is always returned whatever its weight, and area weights that cannot
    /// form a distribution (all zero) fall back to a uniform draw.
    pub fn choose(
        &self,
        kinds:    &[FacilityKind],
        strategy: SelectionStrategy,
        rng:      &mut SimRng,
    ) -> BehaviorResult<&Facility> {
        let candidates: Vec<&Facility> = kinds.iter().flat_map(|&k| self.of_kind(k)).collect();
        let picked = match strategy {
            SelectionStrategy::Uniform => rng.choose(&candidates).copied(),
            SelectionStrategy::AreaWeighted => {
                let weights: Vec<f64> = candidates.iter().map(|f| f.area).collect();
                rng.choose_weighted_index(&weights).map(|i| candidates[i])
            }
        };
        picked.ok_or_else(|| BehaviorError::EmptyRegistry { kinds: kinds.to_vec() })
    }
}
