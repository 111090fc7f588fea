use thiserror::Error;
use ud_behavior::BehaviorError;
use ud_core::{AgentId, CoreError, FacilityId};
use ud_schedule::ScheduleError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error("group {group} meets at unknown teaching facility {facility}")]
    UnknownTeachingFacility { group: String, facility: FacilityId },

    #[error("event targets unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("{action} failed for {agent}: {source}")]
    Action {
        agent:  AgentId,
        action: &'static str,
        #[source]
        source: BehaviorError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
