//! Service request records submitted from the per-service order modal.

use super::{RecordId, RecordStatus, Urgency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated service request accepted by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServiceRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service_type: String,
    pub details: String,
    pub urgency: Urgency,
}

/// Persisted service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service_type: String,
    pub details: String,
    pub urgency: Urgency,
    pub status: RecordStatus,
    #[serde(serialize_with = "super::serialize_created_at")]
    pub created_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Builds the stored record for a freshly assigned id.
    pub fn from_input(
        id: RecordId,
        input: &NewServiceRequest,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            service_type: input.service_type.clone(),
            details: input.details.clone(),
            urgency: input.urgency,
            status: RecordStatus::Pending,
            created_at,
        }
    }
}
