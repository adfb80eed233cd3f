//! HTTP request handlers for the submission API.
//!
//! Store calls are synchronous, so each one runs on the blocking pool.
//! Error bodies are `{message}` or, for validation failures,
//! `{message, errors}`.

use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use proserve_core::{
    FieldError, Inquiry, InquiryDraft, RecordId, RegistrationAssistance,
    RegistrationAssistanceDraft, RepoError, ServiceRequest, ServiceRequestDraft,
    SubmissionService, SubmitError, ValidationError,
};
use serde::Serialize;
use std::sync::Arc;

/// Client-facing wording for one submission kind.
pub struct Resource {
    kind: &'static str,
    invalid: &'static str,
    save_failed: &'static str,
    fetch_failed: &'static str,
    not_found: &'static str,
    bad_id: &'static str,
}

pub static INQUIRIES: Resource = Resource {
    kind: "inquiry",
    invalid: "Invalid inquiry data. Please check all required fields and try again.",
    save_failed: "Unable to save your inquiry. Please try again later.",
    fetch_failed: "Unable to fetch inquiries. Please try again later.",
    not_found: "Inquiry not found.",
    bad_id: "Invalid inquiry id.",
};

pub static SERVICE_REQUESTS: Resource = Resource {
    kind: "service_request",
    invalid: "Invalid service request data. Please check all required fields and try again.",
    save_failed: "Unable to save your service request. Please try again later.",
    fetch_failed: "Unable to fetch service requests. Please try again later.",
    not_found: "Service request not found.",
    bad_id: "Invalid service request id.",
};

pub static REGISTRATION_ASSISTANCE: Resource = Resource {
    kind: "registration_assistance",
    invalid: "Invalid registration assistance data. Please check all required fields and try again.",
    save_failed: "Unable to save your registration assistance request. Please try again later.",
    fetch_failed: "Unable to fetch registration assistance requests. Please try again later.",
    not_found: "Registration assistance request not found.",
    bad_id: "Invalid registration assistance id.",
};

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ApiError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            errors: None,
        }
    }

    fn invalid(resource: &Resource, err: ValidationError) -> Self {
        Self {
            errors: Some(err.errors),
            ..Self::new(StatusCode::BAD_REQUEST, resource.invalid)
        }
    }

    fn malformed(resource: &Resource, rejection: &JsonRejection) -> Self {
        warn!(
            "event=request_rejected module=handlers status=invalid kind={} reason=malformed_body http_status={}",
            resource.kind,
            rejection.status().as_u16()
        );
        Self::new(StatusCode::BAD_REQUEST, resource.invalid)
    }

    fn bad_id(resource: &Resource, rejection: &PathRejection) -> Self {
        warn!(
            "event=request_rejected module=handlers status=invalid kind={} reason=bad_id detail={}",
            resource.kind,
            rejection.body_text()
        );
        Self::new(StatusCode::BAD_REQUEST, resource.bad_id)
    }

    fn bad_service_type(rejection: &PathRejection) -> Self {
        warn!(
            "event=request_rejected module=handlers status=invalid kind={} reason=bad_service_type detail={}",
            SERVICE_REQUESTS.kind,
            rejection.body_text()
        );
        Self::invalid(
            &SERVICE_REQUESTS,
            ValidationError::single("serviceType", "must be a valid path segment"),
        )
    }

    fn not_found(resource: &Resource) -> Self {
        Self::new(StatusCode::NOT_FOUND, resource.not_found)
    }

    fn submit(resource: &Resource, err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(validation) => Self::invalid(resource, validation),
            SubmitError::UsernameTaken(_) => Self::new(StatusCode::CONFLICT, resource.invalid),
            SubmitError::Store(store) => {
                error!(
                    "event=submission_failed module=handlers status=error kind={} error={store}",
                    resource.kind
                );
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, resource.save_failed)
            }
        }
    }

    fn fetch(resource: &Resource, err: RepoError) -> Self {
        error!(
            "event=fetch_failed module=handlers status=error kind={} error={err}",
            resource.kind
        );
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, resource.fetch_failed)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
    store: &'static str,
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store_backend(),
    })
}

/// POST /api/inquiries
pub async fn create_inquiry(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InquiryDraft>, JsonRejection>,
) -> Result<Json<Inquiry>, ApiError> {
    let resource = &INQUIRIES;
    let Json(draft) = payload.map_err(|rejection| ApiError::malformed(resource, &rejection))?;
    run_blocking(&state, resource, move |service| service.submit_inquiry(&draft))
        .await?
        .map(Json)
        .map_err(|err| ApiError::submit(resource, err))
}

/// GET /api/inquiries
pub async fn list_inquiries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Inquiry>>, ApiError> {
    let resource = &INQUIRIES;
    run_blocking(&state, resource, |service| service.list_inquiries())
        .await?
        .map(Json)
        .map_err(|err| ApiError::fetch(resource, err))
}

/// GET /api/inquiries/:id
pub async fn get_inquiry(
    State(state): State<Arc<AppState>>,
    id: Result<Path<RecordId>, PathRejection>,
) -> Result<Json<Inquiry>, ApiError> {
    let resource = &INQUIRIES;
    let Path(id) = id.map_err(|rejection| ApiError::bad_id(resource, &rejection))?;
    let found = run_blocking(&state, resource, move |service| service.get_inquiry(id))
        .await?
        .map_err(|err| ApiError::fetch(resource, err))?;
    found.map(Json).ok_or_else(|| ApiError::not_found(resource))
}

/// POST /api/service-requests
pub async fn create_service_request(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ServiceRequestDraft>, JsonRejection>,
) -> Result<Json<ServiceRequest>, ApiError> {
    submit_service_request(&state, payload, None).await
}

/// POST /api/service-requests/:service_type
pub async fn create_service_request_for(
    State(state): State<Arc<AppState>>,
    service_type: Result<Path<String>, PathRejection>,
    payload: Result<Json<ServiceRequestDraft>, JsonRejection>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let Path(service_type) =
        service_type.map_err(|rejection| ApiError::bad_service_type(&rejection))?;
    submit_service_request(&state, payload, Some(service_type)).await
}

async fn submit_service_request(
    state: &AppState,
    payload: Result<Json<ServiceRequestDraft>, JsonRejection>,
    service_type: Option<String>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let resource = &SERVICE_REQUESTS;
    let Json(draft) = payload.map_err(|rejection| ApiError::malformed(resource, &rejection))?;
    run_blocking(state, resource, move |service| {
        service.submit_service_request(&draft, service_type.as_deref())
    })
    .await?
    .map(Json)
    .map_err(|err| ApiError::submit(resource, err))
}

/// GET /api/service-requests
pub async fn list_service_requests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    let resource = &SERVICE_REQUESTS;
    run_blocking(&state, resource, |service| service.list_service_requests())
        .await?
        .map(Json)
        .map_err(|err| ApiError::fetch(resource, err))
}

/// GET /api/service-requests/:id
pub async fn get_service_request(
    State(state): State<Arc<AppState>>,
    id: Result<Path<RecordId>, PathRejection>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let resource = &SERVICE_REQUESTS;
    let Path(id) = id.map_err(|rejection| ApiError::bad_id(resource, &rejection))?;
    let found = run_blocking(&state, resource, move |service| {
        service.get_service_request(id)
    })
    .await?
    .map_err(|err| ApiError::fetch(resource, err))?;
    found.map(Json).ok_or_else(|| ApiError::not_found(resource))
}

/// POST /api/registration-assistance
pub async fn create_registration_assistance(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegistrationAssistanceDraft>, JsonRejection>,
) -> Result<Json<RegistrationAssistance>, ApiError> {
    let resource = &REGISTRATION_ASSISTANCE;
    let Json(draft) = payload.map_err(|rejection| ApiError::malformed(resource, &rejection))?;
    run_blocking(&state, resource, move |service| {
        service.submit_registration_assistance(&draft)
    })
    .await?
    .map(Json)
    .map_err(|err| ApiError::submit(resource, err))
}

/// GET /api/registration-assistance
pub async fn list_registration_assistance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RegistrationAssistance>>, ApiError> {
    let resource = &REGISTRATION_ASSISTANCE;
    run_blocking(&state, resource, |service| {
        service.list_registration_assistance()
    })
    .await?
    .map(Json)
    .map_err(|err| ApiError::fetch(resource, err))
}

/// GET /api/registration-assistance/:id
pub async fn get_registration_assistance(
    State(state): State<Arc<AppState>>,
    id: Result<Path<RecordId>, PathRejection>,
) -> Result<Json<RegistrationAssistance>, ApiError> {
    let resource = &REGISTRATION_ASSISTANCE;
    let Path(id) = id.map_err(|rejection| ApiError::bad_id(resource, &rejection))?;
    let found = run_blocking(&state, resource, move |service| {
        service.get_registration_assistance(id)
    })
    .await?
    .map_err(|err| ApiError::fetch(resource, err))?;
    found.map(Json).ok_or_else(|| ApiError::not_found(resource))
}

async fn run_blocking<T, F>(
    state: &AppState,
    resource: &Resource,
    work: F,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SubmissionService) -> T + Send + 'static,
{
    let service = state.service().clone();
    tokio::task::spawn_blocking(move || work(&service))
        .await
        .map_err(|err| {
            error!(
                "event=worker_failed module=handlers status=error kind={} error={err}",
                resource.kind
            );
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, resource.fetch_failed)
        })
}
