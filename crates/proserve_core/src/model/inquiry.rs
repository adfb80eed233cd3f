//! Contact-form inquiry records.

use super::{RecordId, RecordStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated contact-form submission accepted by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Service the visitor asked about (`printing`, `financial`, `other`, ...).
    pub service: String,
    pub message: String,
}

/// Persisted contact-form inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub message: String,
    pub status: RecordStatus,
    #[serde(serialize_with = "super::serialize_created_at")]
    pub created_at: DateTime<Utc>,
}

impl Inquiry {
    /// Builds the stored record for a freshly assigned id.
    pub fn from_input(id: RecordId, input: &NewInquiry, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            service: input.service.clone(),
            message: input.message.clone(),
            status: RecordStatus::Pending,
            created_at,
        }
    }
}
