//! Public form submissions: validation and storage.
//!
//! Each form body is the insert type of its submission table. Validation
//! collects every violated rule before anything is written; a valid body is
//! throttled per email address and then inserted through `records`.

use serde::Serialize;
use tracing::info;

use crate::rate_limit::RateLimitError;
use crate::services::admin_auth::normalize_email;
use crate::services::records::{
    self, NewAdmissionApplication, NewCampusVisitRequest, NewContactSubmission, NewFeedbackSubmission, NewRecord,
    NewScholarshipApplication, Record, RecordError,
};
use crate::state::AppState;

const MIN_NAME: usize = 2;
const MIN_PHONE: usize = 10;
const MIN_DETAIL: usize = 10;
const MIN_ADDRESS: usize = 5;

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error(transparent)]
    Store(RecordError),
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Accumulates field errors.
#[derive(Debug, Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError { field, message: message.into() });
    }

    fn min_len(&mut self, field: &'static str, value: &str, min: usize) {
        if value.trim().chars().count() < min {
            self.fail(field, format!("must be at least {min} characters"));
        }
    }

    fn optional_min_len(&mut self, field: &'static str, value: Option<&str>, min: usize) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.min_len(field, value, min);
        }
    }

    fn required(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        }
    }

    fn email(&mut self, field: &'static str, value: &str) {
        if !is_valid_email(value) {
            self.fail(field, "must be a valid email address");
        }
    }

    fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() { Ok(()) } else { Err(self.errors) }
    }
}

/// `local@domain.tld` with no whitespace.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    let Some(email) = normalize_email(raw) else {
        return false;
    };
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    email
        .split_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(host, tld)| !host.is_empty() && !host.ends_with('.') && tld.len() >= 2)
}

/// A public form body.
pub trait FormSubmission {
    /// Form name used in URLs and logs.
    const FORM: &'static str;

    /// Every violated rule, in field order.
    ///
    /// # Errors
    ///
    /// The list of field errors when any rule fails.
    fn validate(&self) -> Result<(), Vec<FieldError>>;

    fn email(&self) -> &str;

    fn into_record(self) -> NewRecord;
}

impl FormSubmission for NewContactSubmission {
    const FORM: &'static str = "contact";

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::default();
        c.min_len("name", &self.name, MIN_NAME);
        c.email("email", &self.email);
        c.min_len("phone", &self.phone, MIN_PHONE);
        c.min_len("reason", &self.reason, MIN_DETAIL);
        c.finish()
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn into_record(self) -> NewRecord {
        NewRecord::ContactSubmissions(self)
    }
}

impl FormSubmission for NewFeedbackSubmission {
    const FORM: &'static str = "feedback";

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::default();
        c.min_len("name", &self.name, MIN_NAME);
        c.email("email", &self.email);
        c.min_len("phone", &self.phone, MIN_PHONE);
        c.min_len("feedback", &self.feedback, MIN_DETAIL);
        if !(1..=5).contains(&self.rating) {
            c.fail("rating", "must be between 1 and 5");
        }
        c.finish()
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn into_record(self) -> NewRecord {
        NewRecord::FeedbackSubmissions(self)
    }
}

impl FormSubmission for NewCampusVisitRequest {
    const FORM: &'static str = "campus-visit";

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::default();
        c.min_len("name", &self.name, MIN_NAME);
        c.email("email", &self.email);
        c.min_len("phone", &self.phone, MIN_PHONE);
        c.min_len("address", &self.address, MIN_ADDRESS);
        c.required("visit_date", &self.visit_date);
        c.required("visit_time", &self.visit_time);
        c.min_len("purpose", &self.purpose, MIN_DETAIL);
        c.finish()
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn into_record(self) -> NewRecord {
        NewRecord::CampusVisitRequests(self)
    }
}

impl FormSubmission for NewScholarshipApplication {
    const FORM: &'static str = "scholarship";

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::default();
        c.min_len("name", &self.name, MIN_NAME);
        c.email("email", &self.email);
        c.min_len("phone", &self.phone, MIN_PHONE);
        c.min_len("current_education", &self.current_education, MIN_NAME);
        c.required("family_income", &self.family_income);
        c.min_len("reason_for_scholarship", &self.reason_for_scholarship, MIN_DETAIL);
        c.finish()
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn into_record(self) -> NewRecord {
        NewRecord::ScholarshipApplications(self)
    }
}

impl FormSubmission for NewAdmissionApplication {
    const FORM: &'static str = "admission";

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::default();
        c.min_len("name", &self.name, MIN_NAME);
        c.email("email", &self.email);
        c.optional_min_len("phone", self.phone.as_deref(), MIN_PHONE);
        c.optional_min_len("guardian_phone", self.guardian_phone.as_deref(), MIN_PHONE);
        c.finish()
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn into_record(self) -> NewRecord {
        NewRecord::AdmissionApplications(self)
    }
}

// =============================================================================
// SUBMIT
// =============================================================================

/// Validate, throttle, and store one submission.
///
/// # Errors
///
/// `Invalid` lists every violated rule (including an unknown course);
/// `RateLimited` when the email or the site is over its limit.
pub async fn submit<F: FormSubmission>(state: &AppState, form: F) -> Result<Record, FormError> {
    form.validate().map_err(FormError::Invalid)?;

    let key = normalize_email(form.email()).unwrap_or_default();
    state.form_limiter.check_and_record(&key)?;

    let stored = records::insert(&state.pool, &form.into_record())
        .await
        .map_err(store_error_to_form_error)?;

    info!(form = F::FORM, table = stored.table().slug(), id = ?stored.id(), "form submission stored");
    Ok(stored)
}

/// Constraint violations become field errors; anything else is a store failure.
pub(crate) fn store_error_to_form_error(err: RecordError) -> FormError {
    match err {
        RecordError::InvalidReference(field) => {
            FormError::Invalid(vec![FieldError { field, message: "does not match a known course".into() }])
        }
        RecordError::Duplicate(field) => {
            FormError::Invalid(vec![FieldError { field, message: "is already taken".into() }])
        }
        other => FormError::Store(other),
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
