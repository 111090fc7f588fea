use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("roster parse error: {0}")]
    Parse(String),

    #[error("group {group:?} declares capacity {got} but an earlier row declared {expected}")]
    CapacityMismatch {
        group:    String,
        expected: u32,
        got:      u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
