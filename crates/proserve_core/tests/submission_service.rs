use proserve_core::{
    InquiryDraft, MemoryRecordStore, NewUserDraft, RecordStore, RegistrationAssistanceDraft,
    ServiceRequestDraft, SubmissionService, SubmitError,
};
use serde_json::json;
use std::sync::Arc;

fn service() -> (SubmissionService, Arc<dyn RecordStore>) {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    (SubmissionService::new(Arc::clone(&store)), store)
}

fn service_request_draft() -> ServiceRequestDraft {
    serde_json::from_value(json!({
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "",
        "serviceType": "other",
        "details": "Bind 3 reports",
        "urgency": "high"
    }))
    .unwrap()
}

#[test]
fn submit_inquiry_persists_validated_record() {
    let (service, store) = service();
    let draft: InquiryDraft = serde_json::from_value(json!({
        "firstName": "John",
        "lastName": "Doe",
        "email": "j@x.com",
        "service": "printing",
        "message": "need copies"
    }))
    .unwrap();

    let created = service.submit_inquiry(&draft).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.phone, None);
    assert_eq!(store.get_inquiry(1).unwrap(), Some(created));
}

#[test]
fn rejected_draft_never_reaches_the_store() {
    let (service, store) = service();

    let err = service
        .submit_inquiry(&InquiryDraft::default())
        .unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));
    assert!(store.list_inquiries().unwrap().is_empty());

    let err = service
        .submit_registration_assistance(&RegistrationAssistanceDraft::default())
        .unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));
    assert!(store.list_registration_assistance().unwrap().is_empty());
}

#[test]
fn route_service_type_overrides_body() {
    let (service, _) = service();

    let from_body = service
        .submit_service_request(&service_request_draft(), None)
        .unwrap();
    assert_eq!(from_body.service_type, "other");
    assert_eq!(from_body.phone, None);

    let from_route = service
        .submit_service_request(&service_request_draft(), Some("laminating"))
        .unwrap();
    assert_eq!(from_route.service_type, "laminating");
    assert_eq!(from_route.id, 2);
}

#[test]
fn route_service_type_fills_missing_body_value() {
    let (service, _) = service();
    let draft = ServiceRequestDraft {
        service_type: None,
        ..service_request_draft()
    };

    assert!(service.submit_service_request(&draft, None).is_err());
    let created = service
        .submit_service_request(&draft, Some("business-support"))
        .unwrap();
    assert_eq!(created.service_type, "business-support");
}

#[test]
fn unknown_route_service_type_is_a_validation_error() {
    let (service, store) = service();

    let err = service
        .submit_service_request(&service_request_draft(), Some("scratch-cards"))
        .unwrap_err();
    match err {
        SubmitError::Validation(validation) => assert!(validation.has_field("serviceType")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.list_service_requests().unwrap().is_empty());
}

#[test]
fn register_user_rejects_taken_username() {
    let (service, store) = service();
    let draft = NewUserDraft {
        username: Some("admin".to_string()),
        password: Some("first-password".to_string()),
    };

    let user = service.register_user(&draft).unwrap();
    assert_eq!(user.id, 1);

    let err = service.register_user(&draft).unwrap_err();
    assert!(matches!(err, SubmitError::UsernameTaken(ref name) if name == "admin"));
    assert_eq!(store.list_users().unwrap().len(), 1);
    assert_eq!(service.get_user_by_username("admin").unwrap(), Some(user));
}

#[test]
fn store_duplicate_error_maps_to_username_taken() {
    let (service, store) = service();
    store
        .create_user(&proserve_core::NewUser {
            username: "raced".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();

    let err = SubmitError::from(
        store
            .create_user(&proserve_core::NewUser {
                username: "raced".to_string(),
                password: "pw".to_string(),
            })
            .unwrap_err(),
    );
    assert!(matches!(err, SubmitError::UsernameTaken(_)));
    assert!(service.get_user(1).unwrap().is_some());
}

#[test]
fn list_passthrough_returns_newest_first() {
    let (service, _) = service();
    let first = service
        .submit_service_request(&service_request_draft(), None)
        .unwrap();
    let second = service
        .submit_service_request(&service_request_draft(), Some("printing"))
        .unwrap();

    let listed = service.list_service_requests().unwrap();
    assert_eq!(listed, vec![second, first]);
    assert_eq!(service.get_service_request(999).unwrap(), None);
}
