//! Daily medication monitoring through the patient's QR code

use crate::client::{ApiClient, ApiResponse, ClientError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /pmo/daily-monitoring`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMonitoringRequest {
    pub patient_id: String,
}

/// Validate a scanned code. Only the hyphenated UUID form is accepted.
pub fn parse_monitoring_code(code: &str) -> Result<Uuid, ClientError> {
    let trimmed = code.trim();
    let invalid = || ClientError::InvalidMonitoringCode(trimmed.to_string());

    // The hyphenated form is exactly 36 characters; `Uuid::parse_str` also
    // accepts simple, braced and urn forms.
    if trimmed.len() != 36 {
        return Err(invalid());
    }
    Uuid::parse_str(trimmed).map_err(|_| invalid())
}

#[derive(Clone)]
pub struct MonitoringService {
    client: ApiClient,
}

impl MonitoringService {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Record today's dose for the patient behind `code`
    pub async fn submit_daily(&self, code: &str) -> Result<ApiResponse, ClientError> {
        let patient_id = parse_monitoring_code(code)?;
        let request = DailyMonitoringRequest {
            patient_id: patient_id.hyphenated().to_string(),
        };
        self.client.post("/pmo/daily-monitoring", &request).await
    }
}
