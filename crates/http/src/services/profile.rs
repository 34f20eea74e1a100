//! Profile of the logged-in user

use crate::client::{ApiClient, ApiResponse, ClientError};
use carecom_core::Envelope;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `PUT /user/profile`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone)]
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Envelope<Value>, ClientError> {
        self.client.get("/user/profile").await?.envelope()
    }

    /// Update the profile; the response body is returned as received
    pub async fn update(&self, profile: &UpdateProfileRequest) -> Result<ApiResponse, ClientError> {
        self.client.put("/user/profile", profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_skips_unset_fields() {
        let request = UpdateProfileRequest {
            phone: Some("081234567890".to_string()),
            ..UpdateProfileRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"phone": "081234567890"})
        );
    }
}
