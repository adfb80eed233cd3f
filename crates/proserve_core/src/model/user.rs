//! Staff user accounts.
//!
//! # Invariants
//! - `username` is unique across all users.
//! - `password` is never serialized into API payloads.

use super::{RecordId, RecordStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated user account input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub status: RecordStatus,
    #[serde(serialize_with = "super::serialize_created_at")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds the stored record for a freshly assigned id.
    pub fn from_input(id: RecordId, input: &NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            username: input.username.clone(),
            password: input.password.clone(),
            status: RecordStatus::Pending,
            created_at,
        }
    }
}
