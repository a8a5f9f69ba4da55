//! Sign-up verification state machine using rust-fsm.
//!
//! The multi-step sign-up flow is an explicit finite state machine
//! rather than a pile of booleans: every step the UI can show maps to
//! exactly one state, and every service response maps to exactly one
//! input.
//!
//! ## State Diagram
//!
//! ```text
//! ┌────────────────────────┐
//! │ CollectingCredentials  │ (initial)
//! └───────────┬────────────┘
//!             │ CodeDispatched
//!             ▼
//! ┌────────────────────────┐  ResendRequested (self)
//! │     AwaitingCode       │◄─────────────────────────┐
//! └───────────┬────────────┘                          │
//!             │ CodeSubmitted              CodeRejected
//!             ▼                                       │
//! ┌────────────────────────┐──────────────────────────┘
//! │       Verifying        │
//! └───────┬──────────┬─────┘
//!         │          │ TokenMissing
//!         │          ▼
//!         │   ┌─────────────┐   RetryRequested
//!         │   │   Failed    │──────────────────┐
//!         │   └─────────────┘                  │
//!         │ CodeConfirmed   ▲                  │
//!         ▼                 │ RegistrationFailed
//! ┌────────────────────────┐│                  │
//! │      Registering       │◄──────────────────┘
//! └───────────┬────────────┘
//!             │ RegistrationSucceeded
//!             ▼
//!           Done
//! ```
//!
//! `BackRequested` returns to `CollectingCredentials` from
//! `AwaitingCode` and `Failed`.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Generates a module `signup_machine` with State, Input, StateMachine
// and the transition impl.
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub signup_machine(CollectingCredentials)

    CollectingCredentials => {
        CodeDispatched => AwaitingCode
    },
    AwaitingCode => {
        CodeSubmitted => Verifying,
        ResendRequested => AwaitingCode,
        BackRequested => CollectingCredentials
    },
    Verifying => {
        CodeConfirmed => Registering,
        CodeRejected => AwaitingCode,
        TokenMissing => Failed
    },
    Registering => {
        RegistrationSucceeded => Done,
        RegistrationFailed => Failed
    },
    Failed => {
        RetryRequested => Registering,
        BackRequested => CollectingCredentials
    }
}

// Re-export the generated types with clearer names
pub use signup_machine::Input as SignupMachineInput;
pub use signup_machine::State as SignupMachineState;
pub use signup_machine::StateMachine as SignupMachine;

/// Externally-observable flow state.
///
/// A serde-friendly mirror of the FSM state for UI and IPC purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Collecting name, email and password.
    CollectingCredentials,
    /// Code dispatched; waiting for the user to enter it.
    AwaitingCode,
    /// Code submitted to the identity service.
    Verifying,
    /// Identity confirmed; registering the user with the backend.
    Registering,
    /// Terminal: verified and registered.
    Done,
    /// Registration failed or the session is unusable.
    Failed,
}

impl FlowState {
    /// True for the successful terminal state.
    pub fn is_done(&self) -> bool {
        matches!(self, FlowState::Done)
    }

    /// True while the flow is showing the code-entry step.
    pub fn is_awaiting_code(&self) -> bool {
        matches!(self, FlowState::AwaitingCode)
    }

    /// True when the flow has failed and is waiting on the caller to
    /// retry or abandon.
    pub fn is_failed(&self) -> bool {
        matches!(self, FlowState::Failed)
    }
}

impl From<&SignupMachineState> for FlowState {
    fn from(state: &SignupMachineState) -> Self {
        match state {
            SignupMachineState::CollectingCredentials => FlowState::CollectingCredentials,
            SignupMachineState::AwaitingCode => FlowState::AwaitingCode,
            SignupMachineState::Verifying => FlowState::Verifying,
            SignupMachineState::Registering => FlowState::Registering,
            SignupMachineState::Done => FlowState::Done,
            SignupMachineState::Failed => FlowState::Failed,
        }
    }
}
