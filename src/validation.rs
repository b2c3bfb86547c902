// 📐 Shape validation for incoming records
// Collects every field problem instead of stopping at the first one

use regex::Regex;
use std::sync::OnceLock;

use crate::entities::{ClientData, ProposedRequest, TechnicianData};
use crate::error::{FieldError, SupportError};

// Column bounds of the persisted layout
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_SPECIALTY_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_STATUS_LEN: usize = 50;

pub type ValidationResult = Result<(), SupportError>;

// Dot-separated atoms before the `@`, dot-separated hostname labels after it.
// A single-label domain (`user@localhost`) is accepted.
const EMAIL_PATTERN: &str = concat!(
    r"^[\w!#$%&'*+/=?^`{|}~-]+(?:\.[\w!#$%&'*+/=?^`{|}~-]+)*",
    r"@[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?",
    r"(?:\.[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?)*$",
);

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Accumulates field errors for one record
#[derive(Debug, Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn required(&mut self, field: &str, value: &str, max_len: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, "must not be blank"));
        } else {
            self.max_len(field, value, max_len);
        }
        self
    }

    fn max_len(&mut self, field: &str, value: &str, max_len: usize) -> &mut Self {
        if value.chars().count() > max_len {
            self.errors.push(FieldError::new(
                field,
                &format!("must be at most {} characters", max_len),
            ));
        }
        self
    }

    fn finish(&mut self) -> ValidationResult {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SupportError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

pub fn validate_client(data: &ClientData) -> ValidationResult {
    let mut check = Checker::default();
    check.required("nombre", &data.name, MAX_NAME_LEN);
    check.required("correo", &data.email, MAX_EMAIL_LEN);

    if !data.email.trim().is_empty() && !is_valid_email(&data.email) {
        check
            .errors
            .push(FieldError::new("correo", "is not a valid email address"));
    }

    check.finish()
}

pub fn validate_technician(data: &TechnicianData) -> ValidationResult {
    let mut check = Checker::default();
    check.required("nombre", &data.name, MAX_NAME_LEN);
    if let Some(specialty) = &data.specialty {
        check.max_len("especialidad", specialty, MAX_SPECIALTY_LEN);
    }
    check.finish()
}

/// Checks description and status only. Client and technician references
/// are the workflow's business.
pub fn validate_request(proposed: &ProposedRequest) -> ValidationResult {
    let mut check = Checker::default();
    check.required("descripcion", &proposed.description, MAX_DESCRIPTION_LEN);
    if let Some(status) = &proposed.status {
        check.max_len("estado", status, MAX_STATUS_LEN);
    }
    check.finish()
}
