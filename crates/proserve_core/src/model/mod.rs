//! Submission domain model.
//!
//! # Responsibility
//! - Define the four persisted record kinds and their validated inputs.
//! - Define the lifecycle fields every record carries (`id`, `status`,
//!   `created_at`).
//!
//! # Invariants
//! - Identifiers are assigned by the record store, never by callers.
//! - `status` starts as `pending` and no exposed operation changes it.
//! - `created_at` has millisecond precision so that every store backend
//!   round-trips it exactly.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

pub mod inquiry;
pub mod registration;
pub mod service_request;
pub mod user;

/// Per-kind numeric record identifier. The first record of each kind gets `1`.
pub type RecordId = i64;

/// Review state of a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Received and awaiting staff follow-up.
    #[default]
    Pending,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// How soon a service request should be handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Within a week.
    Low,
    /// Within 2-3 days.
    #[default]
    Normal,
    /// Within 24 hours.
    High,
    /// Same day.
    Urgent,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Parses a stored or submitted value, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Service types that may be selected by route instead of by request body.
pub const SERVICE_CATALOG: &[&str] = &["printing", "laminating", "business-support"];

/// Returns whether `service_type` is one of [`SERVICE_CATALOG`].
pub fn is_catalog_service(service_type: &str) -> bool {
    SERVICE_CATALOG.contains(&service_type)
}

/// Current UTC time truncated to whole milliseconds.
pub fn created_now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

pub(crate) fn to_epoch_ms(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn from_epoch_ms(value: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
}

/// Writes `createdAt` as RFC 3339 with exactly three fractional digits.
pub(crate) fn serialize_created_at<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
