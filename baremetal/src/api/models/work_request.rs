use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkRequestState {
    Accepted,
    InProgress,
    Succeeded,
    Failed,
}

impl WorkRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkRequestState::Accepted => "ACCEPTED",
            WorkRequestState::InProgress => "IN_PROGRESS",
            WorkRequestState::Succeeded => "SUCCEEDED",
            WorkRequestState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for WorkRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequestError {
    pub error_code: String,
    pub message: String,
}

/// An asynchronous load balancer mutation tracked by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    pub id: String,
    pub load_balancer_id: String,
    #[serde(rename = "type")]
    pub work_request_type: String,
    #[serde(rename = "lifecycleState")]
    pub state: WorkRequestState,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error_details: Vec<WorkRequestError>,
    pub time_accepted: DateTime<Utc>,
    #[serde(default)]
    pub time_finished: Option<DateTime<Utc>>,
}

impl WorkRequest {
    /// Error details joined for display, falling back to the status message
    pub fn failure_message(&self) -> String {
        if self.error_details.is_empty() {
            return self.message.clone();
        }
        self.error_details
            .iter()
            .map(|e| format!("{}: {}", e.error_code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_service_payload() {
        let wr: WorkRequest = serde_json::from_value(json!({
            "id": "wr-1",
            "loadBalancerId": "lb-1",
            "type": "CreateBackend",
            "lifecycleState": "IN_PROGRESS",
            "message": "working",
            "timeAccepted": "2017-06-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(wr.state, WorkRequestState::InProgress);
        assert!(wr.error_details.is_empty());
        assert!(wr.time_finished.is_none());
    }

    #[test]
    fn failure_message_prefers_error_details() {
        let mut wr: WorkRequest = serde_json::from_value(json!({
            "id": "wr-2",
            "loadBalancerId": "lb-1",
            "type": "CreateBackendSet",
            "lifecycleState": "FAILED",
            "message": "failed",
            "timeAccepted": "2017-06-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(wr.failure_message(), "failed");

        wr.error_details.push(WorkRequestError {
            error_code: "BAD_INPUT".to_string(),
            message: "port out of range".to_string(),
        });
        assert_eq!(wr.failure_message(), "BAD_INPUT: port out of range");
    }
}
