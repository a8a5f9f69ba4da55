//! REST client for the hosted identity provider.
//!
//! Keepsake delegates account creation, email-code verification, and
//! session tokens to a hosted identity service. This crate provides:
//! - A thin `reqwest`-based client for the provider's REST surface
//! - An adapter implementing `signup_flow::IdentityService` so the flow
//!   controller stays provider-agnostic

mod adapter;
mod client;
mod error;

pub use client::{IdentityClient, SignInOutcome, SignUpAttempt, VerificationOutcome};
pub use error::{IdentityError, IdentityResult};
