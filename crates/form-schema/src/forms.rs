//! Form types and their validation rules.
//!
//! Validation collects every failing field instead of stopping at the
//! first, so a UI can annotate the whole form in one pass.

use crate::error::{FieldError, ValidationResult};
use chrono::{DateTime, Utc};

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// Minimal well-formedness check: one `@` with a non-empty local part
/// and a dotted domain. Deliverability is the provider's problem.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.split_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Split a full name into a first name and an optional remainder.
///
/// The first whitespace-separated word becomes the first name; anything
/// after it (rejoined) becomes the last name.
pub fn split_full_name(full_name: &str) -> (String, Option<String>) {
    let mut words = full_name.split_whitespace();
    let first = words.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = words.collect();
    let last = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };
    (first, last)
}

/// Sign-up form fields.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if self.full_name.trim().chars().count() < 2 {
            errors.push(FieldError::new(
                "full_name",
                "Full name must be at least 2 characters",
            ));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
        if self.password.chars().count() < 8 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters",
            ));
        }
        if self.password != self.confirm_password {
            errors.push(FieldError::new("confirm_password", "Passwords don't match"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Sign-in form fields.
#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
        if self.password.chars().count() < 6 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Memory capsule form fields.
#[derive(Debug, Clone)]
pub struct MemoryForm {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    pub tags: Option<String>,
    pub notes: Option<String>,
}

impl MemoryForm {
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if self.title.is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            errors.push(FieldError::new("title", "Title is too long"));
        }
        if self.description.is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        } else if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(FieldError::new("description", "Description is too long"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
