use thiserror::Error;

/// Errors returned by SDK client calls
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Service error (HTTP {status}) {code}: {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
        opc_request_id: Option<String>,
    },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("{0} does not exist")]
    NotFound(String),
}

impl ApiError {
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Service {
            status,
            code: code.into(),
            message: message.into(),
            opc_request_id: None,
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    /// True when the remote object is absent. The service reports this as a
    /// 404, as `NotAuthorizedOrNotFound`, or only through the message text.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::NotFound(_) => true,
            ApiError::Service { status: 404, .. } => true,
            ApiError::Service { code, .. } if code == "NotAuthorizedOrNotFound" => true,
            other => {
                let message = other.to_string();
                message.contains("does not exist") || message.contains(" not present in ")
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Parse(e.to_string())
    }
}
