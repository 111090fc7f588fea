//! Strongly typed identifier wrappers.
//!
//! Numeric IDs are `Copy + Ord + Hash` so they can be used as map keys and
//! sorted collection elements without ceremony.  Facility IDs come from the
//! campus GIS layers as strings, so [`FacilityId`] wraps a shared `str`
//! instead.

use std::fmt;
use std::sync::Arc;

/// Numeric handle newtype.  `$label` prefixes the `Display` form
/// (`agent#12`), which is what log lines and error messages show.
macro_rules! numeric_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Position in the owning `Vec`.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<Self, Self::Error> {
                <$inner>::try_from(n).map(Self)
            }
        }
    };
}

numeric_id! {
    /// Index of a community member in the simulation's member list.
    pub struct AgentId(u32) = "agent";
}

numeric_id! {
    /// Handle of an action registered with the event scheduler.
    ///
    /// Handles are issued from a monotonically increasing counter and never
    /// reused within a run, so a stale handle can never alias a newer action.
    pub struct EventId(u64) = "event";
}

/// Identifier of a campus facility (teaching building, eating place, …).
///
/// Cheap to clone: the string is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct FacilityId(Arc<str>);

impl FacilityId {
    pub fn new(id: impl AsRef<str>) -> Self {
        FacilityId(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FacilityId {
    fn from(s: &str) -> Self {
        FacilityId::new(s)
    }
}

impl From<String> for FacilityId {
    fn from(s: String) -> Self {
        FacilityId(Arc::from(s))
    }
}

impl From<FacilityId> for String {
    fn from(id: FacilityId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
