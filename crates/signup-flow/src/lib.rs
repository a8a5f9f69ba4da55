//! Sign-up email verification flow for Keepsake.
//!
//! This crate provides:
//! - An explicit FSM for the multi-step sign-up flow (credentials →
//!   code entry → verification → backend registration)
//! - A controller that owns the segmented code buffer and the pending
//!   identity payload, and gates duplicate submissions with a busy flag
//! - Service traits for the identity provider and the Keepsake backend

mod controller;
mod error;
mod flow_fsm;
mod service;

pub use controller::{PendingIdentity, SignUpController};
pub use error::{FlowError, FlowResult, ServiceError};
pub use flow_fsm::{
    signup_machine, FlowState, SignupMachine, SignupMachineInput, SignupMachineState,
};
pub use service::{
    IdentityService, NewUserRecord, RegistrationReceipt, RegistrationService, SessionRef,
    SignUpRequest, VerifiedSession,
};
