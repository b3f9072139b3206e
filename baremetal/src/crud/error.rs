use crate::api::ApiError;
use std::time::Duration;
use tfplug::TfplugError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrudError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("unexpected state '{state}', wanted target '{expected}'")]
    UnexpectedState { state: String, expected: String },

    #[error("work request {id} failed: {message}")]
    WorkRequestFailed { id: String, message: String },

    #[error("timeout while waiting for state to become '{expected}' (last state: '{state}', timeout: {timeout:?})")]
    Timeout {
        state: String,
        expected: String,
        timeout: Duration,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("{0} is required")]
    MissingAttribute(String),

    #[error(transparent)]
    State(#[from] TfplugError),
}

impl CrudError {
    pub fn is_not_found(&self) -> bool {
        match self {
            CrudError::NotFound(_) => true,
            CrudError::Api(e) => e.is_not_found(),
            _ => false,
        }
    }
}

pub type CrudResult<T> = std::result::Result<T, CrudError>;
