use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use proserve_core::{
    open_store, Inquiry, MemoryRecordStore, NewInquiry, NewRegistrationAssistance,
    NewServiceRequest, NewUser, RecordId, RecordStore, RegistrationAssistance, RepoError,
    RepoResult, ServiceRequest, StoreConfig, SubmissionService, User,
};
use proserve_server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const STORE_FAILURE_DETAIL: &str = "disk detached at /var/lib/proserve";

/// Store whose every call fails, standing in for a lost database.
struct UnavailableStore;

fn unavailable<T>() -> RepoResult<T> {
    Err(RepoError::Unavailable(STORE_FAILURE_DETAIL.to_string()))
}

impl RecordStore for UnavailableStore {
    fn create_user(&self, _input: &NewUser) -> RepoResult<User> {
        unavailable()
    }

    fn get_user(&self, _id: RecordId) -> RepoResult<Option<User>> {
        unavailable()
    }

    fn get_user_by_username(&self, _username: &str) -> RepoResult<Option<User>> {
        unavailable()
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        unavailable()
    }

    fn create_inquiry(&self, _input: &NewInquiry) -> RepoResult<Inquiry> {
        unavailable()
    }

    fn get_inquiry(&self, _id: RecordId) -> RepoResult<Option<Inquiry>> {
        unavailable()
    }

    fn list_inquiries(&self) -> RepoResult<Vec<Inquiry>> {
        unavailable()
    }

    fn create_service_request(&self, _input: &NewServiceRequest) -> RepoResult<ServiceRequest> {
        unavailable()
    }

    fn get_service_request(&self, _id: RecordId) -> RepoResult<Option<ServiceRequest>> {
        unavailable()
    }

    fn list_service_requests(&self) -> RepoResult<Vec<ServiceRequest>> {
        unavailable()
    }

    fn create_registration_assistance(
        &self,
        _input: &NewRegistrationAssistance,
    ) -> RepoResult<RegistrationAssistance> {
        unavailable()
    }

    fn get_registration_assistance(
        &self,
        _id: RecordId,
    ) -> RepoResult<Option<RegistrationAssistance>> {
        unavailable()
    }

    fn list_registration_assistance(&self) -> RepoResult<Vec<RegistrationAssistance>> {
        unavailable()
    }
}

fn memory_router() -> Router {
    let service = SubmissionService::new(Arc::new(MemoryRecordStore::new()));
    build_router(Arc::new(AppState::new(service, "memory")))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn inquiry_body() -> Value {
    json!({
        "firstName": "John",
        "lastName": "Doe",
        "email": "j@x.com",
        "service": "printing",
        "message": "need copies"
    })
}

fn service_request_body(details: &str) -> Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "serviceType": "printing",
        "details": details
    })
}

#[tokio::test]
async fn post_inquiry_returns_created_record() {
    let router = memory_router();

    let (status, body) = send(&router, post_json("/api/inquiries", &inquiry_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["firstName"], "John");
    assert_eq!(body["phone"], Value::Null);
    assert!(body.as_object().unwrap().contains_key("phone"));
    assert_eq!(body["status"], "pending");
    assert!(body["createdAt"].is_string());

    let (status, fetched) = send(&router, get("/api/inquiries/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn invalid_inquiry_lists_failing_fields() {
    let router = memory_router();

    let (status, body) = send(
        &router,
        post_json("/api/inquiries", &json!({ "firstName": "John", "email": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid inquiry data. Please check all required fields and try again."
    );
    let fields = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["field"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(fields, vec!["lastName", "email", "service", "message"]);

    let (_, listed) = send(&router, get("/api/inquiries")).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let router = memory_router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/registration-assistance")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"studentName\": "))
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid registration assistance data. Please check all required fields and try again."
    );
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn wrong_field_type_is_a_bad_request() {
    let router = memory_router();
    let mut payload = inquiry_body();
    payload["phone"] = json!(977123456);

    let (status, _) = send(&router, post_json("/api/inquiries", &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn service_requests_list_newest_first() {
    let router = memory_router();
    send(
        &router,
        post_json("/api/service-requests", &service_request_body("first")),
    )
    .await;
    send(
        &router,
        post_json("/api/service-requests", &service_request_body("second")),
    )
    .await;

    let (status, body) = send(&router, get("/api/service-requests")).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], 2);
    assert_eq!(listed[0]["details"], "second");
    assert_eq!(listed[0]["urgency"], "normal");
    assert_eq!(listed[1]["id"], 1);
}

#[tokio::test]
async fn route_service_type_overrides_body() {
    let router = memory_router();

    let (status, body) = send(
        &router,
        post_json(
            "/api/service-requests/laminating",
            &service_request_body("ten certificates"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceType"], "laminating");

    let (status, body) = send(
        &router,
        post_json(
            "/api/service-requests/fireworks",
            &service_request_body("one big show"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "serviceType");
}

#[tokio::test]
async fn missing_and_malformed_ids() {
    let router = memory_router();

    let (status, body) = send(&router, get("/api/service-requests/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Service request not found.");

    let (status, body) = send(&router, get("/api/registration-assistance/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid registration assistance id.");
}

#[tokio::test]
async fn registration_assistance_round_trip() {
    let router = memory_router();
    let payload = json!({
        "studentName": "Grace",
        "email": "grace@example.com",
        "phone": "0955 111 222",
        "university": "Copperbelt University",
        "program": "Nursing",
        "assistanceType": "full-support"
    });

    let (status, created) = send(&router, post_json("/api/registration-assistance", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["documents"], Value::Null);

    let (_, listed) = send(&router, get("/api/registration-assistance")).await;
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn health_reports_store_backend() {
    let router = memory_router();
    let response = router.clone().oneshot(get("/api/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let (status, body) = send(&router, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn sqlite_backed_router_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::Sqlite {
        path: dir.path().join("proserve.sqlite3"),
    };

    let first = {
        let service = SubmissionService::new(open_store(&config).unwrap());
        let router = build_router(Arc::new(AppState::new(service, config.backend_name())));
        let (status, body) = send(&router, post_json("/api/inquiries", &inquiry_body())).await;
        assert_eq!(status, StatusCode::OK);
        body
    };

    let service = SubmissionService::new(open_store(&config).unwrap());
    let router = build_router(Arc::new(AppState::new(service, config.backend_name())));
    let (status, body) = send(&router, get("/api/inquiries")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([first]));
}

#[tokio::test]
async fn undecodable_service_type_gets_json_error() {
    let router = memory_router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/service-requests/%FF")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(service_request_body("one box").to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body["message"],
        "Invalid service request data. Please check all required fields and try again."
    );
    assert_eq!(body["errors"][0]["field"], "serviceType");

    let (_, listed) = send(&router, get("/api/service-requests")).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn store_failure_is_a_generic_server_error() {
    let service = SubmissionService::new(Arc::new(UnavailableStore));
    let router = build_router(Arc::new(AppState::new(service, "memory")));

    let (status, body) = send(&router, post_json("/api/inquiries", &inquiry_body())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Unable to save your inquiry. Please try again later."
    );
    assert!(body.get("errors").is_none());
    assert!(!body.to_string().contains(STORE_FAILURE_DETAIL));

    let (status, body) = send(&router, get("/api/inquiries")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Unable to fetch inquiries. Please try again later."
    );
    assert!(body.get("errors").is_none());
    assert!(!body.to_string().contains(STORE_FAILURE_DETAIL));

    let (status, body) = send(&router, get("/api/inquiries/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains(STORE_FAILURE_DETAIL));
}
