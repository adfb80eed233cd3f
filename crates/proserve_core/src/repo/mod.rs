//! Record store contract and its two backends.
//!
//! # Responsibility
//! - Define one storage contract for the four submission collections.
//! - Provide a transient (`MemoryRecordStore`) and a durable
//!   (`SqliteRecordStore`) implementation that callers can swap freely.
//!
//! # Invariants
//! - Ids start at 1 per kind, grow by exactly 1 per create and are never
//!   reused.
//! - New records always start with `status = pending`.
//! - Lists are ordered by `created_at DESC, id DESC` in every backend.
//! - A missing id is `Ok(None)`, never an error.
//! - Stores perform no business validation; inputs come from the
//!   validation gate.

use crate::db::DbError;
use crate::model::inquiry::{Inquiry, NewInquiry};
use crate::model::registration::{NewRegistrationAssistance, RegistrationAssistance};
use crate::model::service_request::{NewServiceRequest, ServiceRequest};
use crate::model::user::{NewUser, User};
use crate::model::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure. Always an infrastructure problem or a uniqueness
/// conflict, never an input-shape problem.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    DuplicateUsername(String),
    InvalidData(String),
    Unavailable(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateUsername(username) => write!(f, "username already exists: {username}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::Unavailable(message) => write!(f, "record store unavailable: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract shared by every backend.
pub trait RecordStore: Send + Sync {
    fn create_user(&self, input: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: RecordId) -> RepoResult<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn list_users(&self) -> RepoResult<Vec<User>>;

    fn create_inquiry(&self, input: &NewInquiry) -> RepoResult<Inquiry>;
    fn get_inquiry(&self, id: RecordId) -> RepoResult<Option<Inquiry>>;
    fn list_inquiries(&self) -> RepoResult<Vec<Inquiry>>;

    fn create_service_request(&self, input: &NewServiceRequest) -> RepoResult<ServiceRequest>;
    fn get_service_request(&self, id: RecordId) -> RepoResult<Option<ServiceRequest>>;
    fn list_service_requests(&self) -> RepoResult<Vec<ServiceRequest>>;

    fn create_registration_assistance(
        &self,
        input: &NewRegistrationAssistance,
    ) -> RepoResult<RegistrationAssistance>;
    fn get_registration_assistance(
        &self,
        id: RecordId,
    ) -> RepoResult<Option<RegistrationAssistance>>;
    fn list_registration_assistance(&self) -> RepoResult<Vec<RegistrationAssistance>>;
}
