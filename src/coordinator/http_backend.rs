use crate::coordinator::{AssignError, AssignmentBackend};
use crate::models::StaffMember;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

/// Assignment backend for split deployments where the service-request store is
/// a remote roomops instance. Responses use the `{ "data": ... }` envelope;
/// error bodies carry `error` or `errors`.
pub struct HttpAssignmentBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

impl HttpAssignmentBackend {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl AssignmentBackend for HttpAssignmentBackend {
    async fn auto_assign(&self, request_id: i64) -> Result<StaffMember, AssignError> {
        let url = format!(
            "{}/api/v1/service-requests/{}/auto-assign",
            self.base_url, request_id
        );

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| AssignError::Transient(format!("request error: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let envelope: DataEnvelope<StaffMember> = response
                .json()
                .await
                .map_err(|e| AssignError::Transient(format!("malformed response: {}", e)))?;
            return Ok(envelope.data);
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = extract_error_message(&body);

        // A missing route or an unimplemented endpoint cannot start working by
        // itself; everything else is worth another pass.
        if status == StatusCode::NOT_FOUND || status == StatusCode::NOT_IMPLEMENTED {
            Err(AssignError::CapabilityMissing(message))
        } else {
            Err(AssignError::Transient(message))
        }
    }
}

/// Normalize heterogeneous backend error payloads: `error` wins, then
/// `errors` (string or array of strings), then a fixed fallback.
pub fn extract_error_message(body: &serde_json::Value) -> String {
    if let Some(message) = body.get("error").and_then(|v| v.as_str()) {
        return message.to_string();
    }

    if let Some(errors) = body.get("errors") {
        if let Some(message) = errors.as_str() {
            return message.to_string();
        }
        if let Some(list) = errors.as_array() {
            let messages: Vec<&str> = list.iter().filter_map(|v| v.as_str()).collect();
            if !messages.is_empty() {
                return messages.join("; ");
            }
        }
    }

    FALLBACK_ERROR_MESSAGE.to_string()
}
