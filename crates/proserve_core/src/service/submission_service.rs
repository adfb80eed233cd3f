//! Submission use-case service.
//!
//! # Responsibility
//! - Validate drafts and persist the resulting inputs.
//! - Keep validation rejections and storage failures distinguishable.
//! - Own the username lookup-before-insert convention.
//!
//! # Invariants
//! - No store write happens for a draft that failed validation.
//! - Storage errors are passed through unchanged inside `SubmitError::Store`.
//! - A route-level service type always replaces the body's `serviceType`.

use crate::model::inquiry::Inquiry;
use crate::model::registration::RegistrationAssistance;
use crate::model::service_request::ServiceRequest;
use crate::model::user::User;
use crate::model::{is_catalog_service, RecordId};
use crate::repo::{RecordStore, RepoError, RepoResult};
use crate::validation::{
    InquiryDraft, NewUserDraft, RegistrationAssistanceDraft, ServiceRequestDraft, ValidationError,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure of a submission use-case.
#[derive(Debug)]
pub enum SubmitError {
    /// Input was rejected by the validation gate. Not retryable.
    Validation(ValidationError),
    /// Username is already registered.
    UsernameTaken(String),
    /// Backing store failed. The caller may retry.
    Store(RepoError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UsernameTaken(username) => write!(f, "username already taken: {username}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::UsernameTaken(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SubmitError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for SubmitError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateUsername(username) => Self::UsernameTaken(username),
            other => Self::Store(other),
        }
    }
}

pub type SubmitResult<T> = Result<T, SubmitError>;

/// Validates and stores website submissions.
#[derive(Clone)]
pub struct SubmissionService {
    store: Arc<dyn RecordStore>,
}

impl SubmissionService {
    /// Creates a service over an explicitly constructed store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validates and stores a contact-form inquiry.
    pub fn submit_inquiry(&self, draft: &InquiryDraft) -> SubmitResult<Inquiry> {
        let input = gate("inquiry", draft.validate())?;
        let inquiry = self.store.create_inquiry(&input)?;
        info!(
            "event=submission_created module=service status=ok kind=inquiry id={}",
            inquiry.id
        );
        Ok(inquiry)
    }

    /// Validates and stores a service request.
    ///
    /// # Contract
    /// - `route_service_type = Some(..)` replaces the body's `serviceType`.
    /// - A route-level value outside the service catalog is a validation
    ///   error on `serviceType`.
    pub fn submit_service_request(
        &self,
        draft: &ServiceRequestDraft,
        route_service_type: Option<&str>,
    ) -> SubmitResult<ServiceRequest> {
        let input = match route_service_type {
            Some(service_type) => {
                if !is_catalog_service(service_type) {
                    return Err(gate_rejection(
                        "service_request",
                        ValidationError::single(
                            "serviceType",
                            format!("`{service_type}` is not an orderable service"),
                        ),
                    ));
                }
                let overridden = ServiceRequestDraft {
                    service_type: Some(service_type.to_string()),
                    ..draft.clone()
                };
                gate("service_request", overridden.validate())?
            }
            None => gate("service_request", draft.validate())?,
        };

        let request = self.store.create_service_request(&input)?;
        info!(
            "event=submission_created module=service status=ok kind=service_request id={} urgency={}",
            request.id,
            request.urgency.as_str()
        );
        Ok(request)
    }

    /// Validates and stores a university-registration assistance request.
    pub fn submit_registration_assistance(
        &self,
        draft: &RegistrationAssistanceDraft,
    ) -> SubmitResult<RegistrationAssistance> {
        let input = gate("registration_assistance", draft.validate())?;
        let assistance = self.store.create_registration_assistance(&input)?;
        info!(
            "event=submission_created module=service status=ok kind=registration_assistance id={}",
            assistance.id
        );
        Ok(assistance)
    }

    /// Registers a staff user after checking the username is free.
    ///
    /// The store still enforces uniqueness, so a concurrent registration
    /// that slips past the lookup surfaces as `UsernameTaken` as well.
    pub fn register_user(&self, draft: &NewUserDraft) -> SubmitResult<User> {
        let input = gate("user", draft.validate())?;
        if self.store.get_user_by_username(&input.username)?.is_some() {
            warn!("event=user_register module=service status=rejected reason=username_taken");
            return Err(SubmitError::UsernameTaken(input.username));
        }
        let user = self.store.create_user(&input)?;
        info!(
            "event=user_register module=service status=ok id={}",
            user.id
        );
        Ok(user)
    }

    pub fn get_user(&self, id: RecordId) -> RepoResult<Option<User>> {
        self.store.get_user(id)
    }

    pub fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.store.get_user_by_username(username)
    }

    pub fn list_inquiries(&self) -> RepoResult<Vec<Inquiry>> {
        self.store.list_inquiries()
    }

    pub fn get_inquiry(&self, id: RecordId) -> RepoResult<Option<Inquiry>> {
        self.store.get_inquiry(id)
    }

    pub fn list_service_requests(&self) -> RepoResult<Vec<ServiceRequest>> {
        self.store.list_service_requests()
    }

    pub fn get_service_request(&self, id: RecordId) -> RepoResult<Option<ServiceRequest>> {
        self.store.get_service_request(id)
    }

    pub fn list_registration_assistance(&self) -> RepoResult<Vec<RegistrationAssistance>> {
        self.store.list_registration_assistance()
    }

    pub fn get_registration_assistance(
        &self,
        id: RecordId,
    ) -> RepoResult<Option<RegistrationAssistance>> {
        self.store.get_registration_assistance(id)
    }
}

fn gate<T>(kind: &'static str, result: Result<T, ValidationError>) -> SubmitResult<T> {
    result.map_err(|err| gate_rejection(kind, err))
}

fn gate_rejection(kind: &'static str, err: ValidationError) -> SubmitError {
    // Field names only; submitted values may contain personal data.
    let fields = err
        .errors
        .iter()
        .map(|error| error.field)
        .collect::<Vec<_>>()
        .join(",");
    warn!("event=submission_rejected module=service status=invalid kind={kind} fields={fields}");
    SubmitError::Validation(err)
}
