use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    StoreFailure(#[from] anyhow::Error),

    #[error("a coding session is already running")]
    SessionActive,

    #[error("no active session to stop")]
    NoActiveSession,

    #[error("the previous session has not been stored yet")]
    UnsavedSession,
}

impl TrackerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TrackerError::InvalidArgument(message.into())
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
