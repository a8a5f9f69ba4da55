//! Field-level validation for Keepsake's forms.
//!
//! Mirrors the rules the app enforces before anything hits the
//! network: sign-up, sign-in, and memory-capsule forms, each returning
//! every failing field with its user-facing message.

mod error;
mod forms;

pub use error::{FieldError, ValidationResult};
pub use forms::{split_full_name, MemoryForm, SignInForm, SignUpForm};
