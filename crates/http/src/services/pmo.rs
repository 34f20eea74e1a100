//! PMO endpoints

use crate::client::{ApiClient, ClientError};
use carecom_core::Envelope;
use serde_json::{Value, json};
use tracing::debug;

/// Shown when the supervised patient has not been registered yet
pub const PATIENT_NOT_AVAILABLE: &str = "Data pasien belum tersedia";

#[derive(Clone)]
pub struct PmoService {
    client: ApiClient,
}

impl PmoService {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Patient supervised by the logged-in PMO.
    ///
    /// A 404 means no patient is linked yet and yields a fallback envelope
    /// instead of an error.
    pub async fn patient(&self) -> Result<Envelope<Value>, ClientError> {
        match self.client.get("/pmo/patient").await {
            Ok(response) => response.envelope(),
            Err(ClientError::NotFound { .. }) => {
                debug!("no patient linked to this PMO yet");
                Ok(patient_fallback())
            }
            Err(e) => Err(e),
        }
    }
}

fn patient_fallback() -> Envelope<Value> {
    Envelope::new(
        404,
        false,
        Some(PATIENT_NOT_AVAILABLE.to_string()),
        Some(json!({ "message": PATIENT_NOT_AVAILABLE })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_carries_message() {
        let fallback = patient_fallback();
        assert!(!fallback.success);
        assert_eq!(fallback.data.unwrap()["message"], PATIENT_NOT_AVAILABLE);
    }
}
