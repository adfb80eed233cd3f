//! Core submission logic for the ProServe website backend.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{open_store, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingStatus};
pub use model::inquiry::{Inquiry, NewInquiry};
pub use model::registration::{NewRegistrationAssistance, RegistrationAssistance};
pub use model::service_request::{NewServiceRequest, ServiceRequest};
pub use model::user::{NewUser, User};
pub use model::{RecordId, RecordStatus, Urgency, SERVICE_CATALOG};
pub use repo::memory_store::MemoryRecordStore;
pub use repo::sqlite_store::SqliteRecordStore;
pub use repo::{RecordStore, RepoError, RepoResult};
pub use service::submission_service::{SubmissionService, SubmitError, SubmitResult};
pub use validation::{
    FieldError, InquiryDraft, NewUserDraft, RegistrationAssistanceDraft, ServiceRequestDraft,
    ValidationError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
