// ── Form validation ──
//
// Required/format checks run before any mutation is dispatched.
// Failures never reach the network; they are returned as field errors
// for the dialog to show next to the offending input.

use std::fmt;

use serde::Serialize;

/// What is wrong with a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    InvalidEmail,
    NotPositive,
}

/// A validation failure attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field (`companyName`, `items[0].quantity`).
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self.kind {
            FieldErrorKind::Required => "required",
            FieldErrorKind::InvalidEmail => "must be a valid email address",
            FieldErrorKind::NotPositive => "must be greater than zero",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message())
    }
}

/// All field errors from one validation pass, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// The first error reported for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Implemented by every create/update request.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Accumulates field errors for one request.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, kind: FieldErrorKind) {
        self.errors.push(FieldError {
            field: field.to_owned(),
            kind,
        });
    }

    /// A value that must contain something other than whitespace.
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, FieldErrorKind::Required);
        }
        self
    }

    /// An optional update field: absent is fine, present-but-blank is not.
    pub fn required_if_present(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.required(field, v);
        }
        self
    }

    /// A reference that must be chosen.
    pub fn required_ref<T>(&mut self, field: &str, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            self.push(field, FieldErrorKind::Required);
        }
        self
    }

    /// An optional email field; blank counts as absent.
    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !looks_like_email(v) {
                self.push(field, FieldErrorKind::InvalidEmail);
            }
        }
        self
    }

    /// A required email field.
    pub fn required_email(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, FieldErrorKind::Required);
        } else {
            self.email(field, Some(value));
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: u32) -> &mut Self {
        if value == 0 {
            self.push(field, FieldErrorKind::NotPositive);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors(std::mem::take(&mut self.errors)))
        }
    }
}

/// Simple format check: one `@`, non-empty local part, dotted domain.
fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
