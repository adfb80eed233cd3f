//! University-registration assistance records.
//!
//! Unlike the other submission kinds, `phone` is mandatory here because the
//! education desk calls students back to collect documents.

use super::{RecordId, RecordStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated registration-assistance request accepted by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistrationAssistance {
    pub student_name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub program: String,
    /// `application-form`, `document-verification`, `submission-assistance`,
    /// `full-support`, or free text from older clients.
    pub assistance_type: String,
    /// Free-form list of documents the student already holds.
    pub documents: Option<String>,
}

/// Persisted registration-assistance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationAssistance {
    pub id: RecordId,
    pub student_name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub program: String,
    pub assistance_type: String,
    pub documents: Option<String>,
    pub status: RecordStatus,
    #[serde(serialize_with = "super::serialize_created_at")]
    pub created_at: DateTime<Utc>,
}

impl RegistrationAssistance {
    /// Builds the stored record for a freshly assigned id.
    pub fn from_input(
        id: RecordId,
        input: &NewRegistrationAssistance,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            student_name: input.student_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            university: input.university.clone(),
            program: input.program.clone(),
            assistance_type: input.assistance_type.clone(),
            documents: input.documents.clone(),
            status: RecordStatus::Pending,
            created_at,
        }
    }
}
