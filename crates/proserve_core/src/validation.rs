//! Validation gate for untrusted submission input.
//!
//! # Responsibility
//! - Decode request payloads into all-optional drafts.
//! - Turn each draft into a typed, store-ready input or a full list of
//!   field errors.
//!
//! # Invariants
//! - Required text fields are trimmed and must not be blank.
//! - Optional text fields that are missing, `null` or blank become `None`,
//!   never an empty string.
//! - Every failing field is reported, in declaration order.
//! - Field names in errors use the JSON (camelCase) spelling.

use crate::model::inquiry::NewInquiry;
use crate::model::registration::NewRegistrationAssistance;
use crate::model::service_request::NewServiceRequest;
use crate::model::user::NewUser;
use crate::model::Urgency;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SHORT_TEXT_MAX_CHARS: usize = 255;
const LONG_TEXT_MAX_CHARS: usize = 5000;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Structured rejection returned by the validation gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Builds a rejection for a single field.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }

    /// Returns whether `field` is among the rejected fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid input: ")?;
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Unvalidated user registration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserDraft {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl NewUserDraft {
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let mut check = FieldCheck::default();
        let username = check.required("username", self.username.as_deref(), SHORT_TEXT_MAX_CHARS);
        let password = check.password("password", self.password.as_deref());
        check.finish(NewUser { username, password })
    }
}

/// Unvalidated contact-form payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
}

impl InquiryDraft {
    pub fn validate(&self) -> Result<NewInquiry, ValidationError> {
        let mut check = FieldCheck::default();
        let input = NewInquiry {
            first_name: check.required(
                "firstName",
                self.first_name.as_deref(),
                SHORT_TEXT_MAX_CHARS,
            ),
            last_name: check.required("lastName", self.last_name.as_deref(), SHORT_TEXT_MAX_CHARS),
            email: check.email("email", self.email.as_deref()),
            phone: check.optional("phone", self.phone.as_deref(), SHORT_TEXT_MAX_CHARS),
            service: check.required("service", self.service.as_deref(), SHORT_TEXT_MAX_CHARS),
            message: check.required("message", self.message.as_deref(), LONG_TEXT_MAX_CHARS),
        };
        check.finish(input)
    }
}

/// Unvalidated service request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_type: Option<String>,
    pub details: Option<String>,
    pub urgency: Option<String>,
}

impl ServiceRequestDraft {
    pub fn validate(&self) -> Result<NewServiceRequest, ValidationError> {
        let mut check = FieldCheck::default();
        let input = NewServiceRequest {
            name: check.required("name", self.name.as_deref(), SHORT_TEXT_MAX_CHARS),
            email: check.email("email", self.email.as_deref()),
            phone: check.optional("phone", self.phone.as_deref(), SHORT_TEXT_MAX_CHARS),
            service_type: check.required(
                "serviceType",
                self.service_type.as_deref(),
                SHORT_TEXT_MAX_CHARS,
            ),
            details: check.required("details", self.details.as_deref(), LONG_TEXT_MAX_CHARS),
            urgency: check.urgency("urgency", self.urgency.as_deref()),
        };
        check.finish(input)
    }
}

/// Unvalidated registration-assistance payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationAssistanceDraft {
    pub student_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub university: Option<String>,
    pub program: Option<String>,
    pub assistance_type: Option<String>,
    pub documents: Option<String>,
}

impl RegistrationAssistanceDraft {
    pub fn validate(&self) -> Result<NewRegistrationAssistance, ValidationError> {
        let mut check = FieldCheck::default();
        let input = NewRegistrationAssistance {
            student_name: check.required(
                "studentName",
                self.student_name.as_deref(),
                SHORT_TEXT_MAX_CHARS,
            ),
            email: check.email("email", self.email.as_deref()),
            phone: check.required("phone", self.phone.as_deref(), SHORT_TEXT_MAX_CHARS),
            university: check.required(
                "university",
                self.university.as_deref(),
                SHORT_TEXT_MAX_CHARS,
            ),
            program: check.required("program", self.program.as_deref(), SHORT_TEXT_MAX_CHARS),
            assistance_type: check.required(
                "assistanceType",
                self.assistance_type.as_deref(),
                SHORT_TEXT_MAX_CHARS,
            ),
            documents: check.optional("documents", self.documents.as_deref(), LONG_TEXT_MAX_CHARS),
        };
        check.finish(input)
    }
}

#[derive(Default)]
struct FieldCheck {
    errors: Vec<FieldError>,
}

impl FieldCheck {
    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn required(&mut self, field: &'static str, value: Option<&str>, max_chars: usize) -> String {
        match normalize_text(value) {
            Some(text) => self.bounded(field, text, max_chars),
            None => {
                self.reject(field, "is required");
                String::new()
            }
        }
    }

    fn optional(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        max_chars: usize,
    ) -> Option<String> {
        normalize_text(value).map(|text| self.bounded(field, text, max_chars))
    }

    fn email(&mut self, field: &'static str, value: Option<&str>) -> String {
        let email = self.required(field, value, SHORT_TEXT_MAX_CHARS);
        if !email.is_empty() && !EMAIL_RE.is_match(&email) {
            self.reject(field, "must be a valid email address");
        }
        email
    }

    fn password(&mut self, field: &'static str, value: Option<&str>) -> String {
        // Passwords keep surrounding whitespace; only emptiness is normalized.
        match value {
            Some(password) if !password.is_empty() => {
                self.bounded(field, password.to_string(), SHORT_TEXT_MAX_CHARS)
            }
            _ => {
                self.reject(field, "is required");
                String::new()
            }
        }
    }

    fn urgency(&mut self, field: &'static str, value: Option<&str>) -> Urgency {
        let Some(text) = normalize_text(value) else {
            return Urgency::default();
        };
        match Urgency::parse(&text) {
            Some(urgency) => urgency,
            None => {
                self.reject(field, "must be one of low, normal, high, urgent");
                Urgency::default()
            }
        }
    }

    fn bounded(&mut self, field: &'static str, text: String, max_chars: usize) -> String {
        if text.chars().count() > max_chars {
            self.reject(field, format!("must be at most {max_chars} characters"));
        }
        text
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

fn normalize_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_text, FieldCheck, ValidationError};

    #[test]
    fn normalize_text_collapses_blank_to_none() {
        assert_eq!(normalize_text(None), None);
        assert_eq!(normalize_text(Some("   ")), None);
        assert_eq!(normalize_text(Some(" a b ")), Some("a b".to_string()));
    }

    #[test]
    fn bounded_counts_characters_not_bytes() {
        let mut check = FieldCheck::default();
        let value = check.required("name", Some("ééé"), 3);
        assert_eq!(value, "ééé");
        assert!(check.errors.is_empty());

        check.required("name", Some("éééé"), 3);
        assert_eq!(check.errors.len(), 1);
    }

    #[test]
    fn display_lists_every_field() {
        let mut error = ValidationError::single("email", "is required");
        error.errors.extend(ValidationError::single("name", "is required").errors);
        assert_eq!(
            error.to_string(),
            "invalid input: email is required; name is required"
        );
    }
}
