//! Authenticated REST client for the Keepsake backend.
//!
//! The backend stores the user records and memory capsules behind
//! session-token auth. This crate provides:
//! - A `reqwest`-based client for the `/users` and `/capsules` routes
//! - An adapter implementing `signup_flow::RegistrationService` so the
//!   sign-up flow can persist verified users

mod adapter;
mod client;
mod error;

pub use client::{BackendClient, CapsuleReceipt, NewCapsule};
pub use error::{BackendError, BackendResult};
