use thiserror::Error;
use ud_core::FacilityId;

use crate::FacilityKind;

#[derive(Debug, Error)]
pub enum BehaviorError {
    /// A facility id was not found in its registry.  Fatal for the event
    /// that triggered the lookup.
    #[error("{kind} facility {id} not found")]
    FacilityNotFound { kind: FacilityKind, id: FacilityId },

    #[error("no facilities registered for kinds {kinds:?}")]
    EmptyRegistry { kinds: Vec<FacilityKind> },

    #[error("unknown facility kind {0:?}")]
    UnknownFacilityKind(String),

    #[error("behavior configuration error: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
