use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("invalid group: {0} (expected 1 or 2)")]
    InvalidGroup(u8),

    #[error("invalid control mode: {0}")]
    InvalidMode(String),

    #[error("invalid time '{0}': expected HH:mm (24h)")]
    InvalidTimeFormat(String),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("schedule not found for group {0}")]
    ScheduleNotFound(u8),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GuardError>;
