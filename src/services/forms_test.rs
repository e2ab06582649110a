use super::*;
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::state::test_helpers;

fn contact() -> NewContactSubmission {
    NewContactSubmission {
        name: "Asha Verma".into(),
        email: "asha@example.org".into(),
        phone: "9876543210".into(),
        reason: "Question about hostel fees".into(),
    }
}

fn fields(errors: &[FieldError]) -> Vec<&'static str> {
    errors.iter().map(|e| e.field).collect()
}

// =============================================================================
// email
// =============================================================================

#[test]
fn email_shapes() {
    assert!(is_valid_email("asha@example.org"));
    assert!(is_valid_email("  Asha@Example.ORG "));
    assert!(!is_valid_email("asha@example"));
    assert!(!is_valid_email("asha@.org"));
    assert!(!is_valid_email("asha example@x.org"));
    assert!(!is_valid_email("asha@x.o"));
    assert!(!is_valid_email(""));
}

// =============================================================================
// per-form rules
// =============================================================================

#[test]
fn valid_contact_passes() {
    assert!(contact().validate().is_ok());
}

#[test]
fn contact_reports_every_violation() {
    let form = NewContactSubmission { name: "A".into(), email: "nope".into(), phone: "123".into(), reason: "short".into() };
    let errors = form.validate().unwrap_err();
    assert_eq!(fields(&errors), vec!["name", "email", "phone", "reason"]);
    assert_eq!(errors[0].message, "must be at least 2 characters");
}

#[test]
fn lengths_are_measured_after_trimming() {
    let form = NewContactSubmission { name: "  A  ".into(), ..contact() };
    assert_eq!(fields(&form.validate().unwrap_err()), vec!["name"]);
}

#[test]
fn feedback_rating_must_be_one_to_five() {
    let base = NewFeedbackSubmission {
        name: "Ravi".into(),
        email: "ravi@example.org".into(),
        phone: "9876543210".into(),
        feedback: "The library is great".into(),
        rating: 5,
    };
    assert!(base.validate().is_ok());
    for rating in [0, 6, -1] {
        let form = NewFeedbackSubmission { rating, ..base.clone() };
        assert_eq!(fields(&form.validate().unwrap_err()), vec!["rating"]);
    }
}

#[test]
fn campus_visit_requires_date_time_and_address() {
    let form = NewCampusVisitRequest {
        name: "Meera".into(),
        email: "meera@example.org".into(),
        phone: "9876543210".into(),
        address: "Pune".into(),
        visit_date: " ".into(),
        visit_time: String::new(),
        purpose: "Tour of the science labs".into(),
    };
    assert_eq!(fields(&form.validate().unwrap_err()), vec!["address", "visit_date", "visit_time"]);
}

#[test]
fn scholarship_rules() {
    let form = NewScholarshipApplication {
        name: "Kiran".into(),
        email: "kiran@example.org".into(),
        phone: "9876543210".into(),
        course_id: None,
        current_education: "X".into(),
        family_income: String::new(),
        reason_for_scholarship: "need".into(),
    };
    assert_eq!(
        fields(&form.validate().unwrap_err()),
        vec!["current_education", "family_income", "reason_for_scholarship"]
    );
}

#[test]
fn admission_optional_phones_checked_only_when_present() {
    let minimal = NewAdmissionApplication { name: "Dev".into(), email: "dev@example.org".into(), ..Default::default() };
    assert!(minimal.validate().is_ok());

    let blank_phone = NewAdmissionApplication { phone: Some("  ".into()), ..minimal.clone() };
    assert!(blank_phone.validate().is_ok());

    let short = NewAdmissionApplication {
        phone: Some("123".into()),
        guardian_phone: Some("456".into()),
        ..minimal
    };
    assert_eq!(fields(&short.validate().unwrap_err()), vec!["phone", "guardian_phone"]);
}

#[test]
fn forms_map_to_their_tables() {
    use crate::services::records::Table;
    assert_eq!(contact().into_record().table(), Table::ContactSubmissions);
    assert_eq!(NewAdmissionApplication::default().into_record().table(), Table::AdmissionApplications);
    assert_eq!(NewCampusVisitRequest::default().into_record().table(), Table::CampusVisitRequests);
    assert_eq!(NewFeedbackSubmission::default().into_record().table(), Table::FeedbackSubmissions);
    assert_eq!(NewScholarshipApplication::default().into_record().table(), Table::ScholarshipApplications);
}

// =============================================================================
// submit
// =============================================================================

#[tokio::test]
async fn invalid_submission_is_rejected_before_throttle() {
    let (state, _log) = test_helpers::test_app_state();
    let form = NewContactSubmission { name: String::new(), ..contact() };
    let err = submit(&state, form).await.unwrap_err();
    assert!(matches!(err, FormError::Invalid(ref errors) if fields(errors) == vec!["name"]));
}

#[tokio::test]
async fn throttled_email_is_rejected_before_store() {
    let (mut state, _log) = test_helpers::test_app_state();
    state.form_limiter = RateLimiter::new(RateLimitConfig {
        per_key_limit: 0,
        ..RateLimitConfig::form_defaults()
    });
    let err = submit(&state, contact()).await.unwrap_err();
    assert!(matches!(err, FormError::RateLimited(RateLimitError::PerKeyExceeded { .. })));
}

#[test]
fn invalid_error_message_counts_fields() {
    let err = FormError::Invalid(vec![
        FieldError { field: "name", message: "x".into() },
        FieldError { field: "email", message: "y".into() },
    ]);
    assert_eq!(err.to_string(), "2 field(s) failed validation");
}

#[test]
fn constraint_errors_become_field_errors() {
    let unknown_course = store_error_to_form_error(RecordError::InvalidReference("course_id"));
    assert!(matches!(unknown_course, FormError::Invalid(ref errors) if fields(errors) == vec!["course_id"]));

    let duplicate = store_error_to_form_error(RecordError::Duplicate("id"));
    assert!(matches!(duplicate, FormError::Invalid(ref errors) if fields(errors) == vec!["id"]));

    let store = store_error_to_form_error(RecordError::NotFound);
    assert!(matches!(store, FormError::Store(RecordError::NotFound)));
}

#[test]
fn missing_fields_decode_as_empty_and_are_all_reported() {
    let form: NewContactSubmission = serde_json::from_value(serde_json::json!({ "name": "A" })).unwrap();
    assert_eq!(fields(&form.validate().unwrap_err()), vec!["name", "email", "phone", "reason"]);

    let feedback: NewFeedbackSubmission = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(fields(&feedback.validate().unwrap_err()), vec!["name", "email", "phone", "feedback", "rating"]);
}
