//! Sign-up flow controller.
//!
//! `SignUpController` layers the verification flow on top of the
//! segmented code input: it owns the code buffer, the pending identity
//! payload, and the FSM, and it is the only place that talks to the
//! identity provider and the Keepsake backend.
//!
//! The flow is driven by a single logical actor (the UI), so in-flight
//! exclusivity is enforced with a busy flag rather than a lock: any
//! user-triggered operation issued while a prior request is still in
//! flight returns `FlowError::Busy` without touching flow state or the
//! code buffer.

use crate::error::{FlowError, FlowResult};
use crate::flow_fsm::{FlowState, SignupMachine, SignupMachineInput, SignupMachineState};
use crate::service::{
    IdentityService, NewUserRecord, RegistrationService, SessionRef, SignUpRequest,
};
use otp_input::{CellView, OtpInput, OtpInputError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Credential data retained between credential submission and backend
/// registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIdentity {
    pub email: String,
    pub full_name: String,
}

impl PendingIdentity {
    /// First word of the full name.
    pub fn first_name(&self) -> String {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Everything after the first word, or `None` for single-word names.
    pub fn last_name(&self) -> Option<String> {
        let rest: Vec<&str> = self.full_name.split_whitespace().skip(1).collect();
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }
}

/// Mutable flow state, guarded by one mutex and never held across an
/// await point.
struct FlowInner {
    fsm: SignupMachine,
    code: OtpInput,
    pending: Option<PendingIdentity>,
    session: Option<SessionRef>,
    token: Option<String>,
    provider_user_id: Option<String>,
    last_error: Option<FlowError>,
}

impl FlowInner {
    fn fresh(code_length: usize) -> Self {
        Self {
            fsm: SignupMachine::new(),
            // Length was validated at controller construction.
            code: OtpInput::with_length(code_length).unwrap_or_default(),
            pending: None,
            session: None,
            token: None,
            provider_user_id: None,
            last_error: None,
        }
    }
}

/// Multi-step sign-up verification flow controller.
pub struct SignUpController<I, R> {
    identity: I,
    registration: R,
    inner: Mutex<FlowInner>,
    busy: AtomicBool,
    code_length: usize,
}

impl<I, R> SignUpController<I, R>
where
    I: IdentityService,
    R: RegistrationService,
{
    /// Create a controller with the default six-digit code.
    pub fn new(identity: I, registration: R) -> Self {
        Self {
            identity,
            registration,
            inner: Mutex::new(FlowInner::fresh(otp_input::DEFAULT_CODE_LENGTH)),
            busy: AtomicBool::new(false),
            code_length: otp_input::DEFAULT_CODE_LENGTH,
        }
    }

    /// Create a controller with a custom code length.
    pub fn with_code_length(
        identity: I,
        registration: R,
        code_length: usize,
    ) -> Result<Self, OtpInputError> {
        // Validate up front so FlowInner::fresh can't fail later.
        OtpInput::with_length(code_length)?;
        Ok(Self {
            identity,
            registration,
            inner: Mutex::new(FlowInner::fresh(code_length)),
            busy: AtomicBool::new(false),
            code_length,
        })
    }

    // ---- observers -------------------------------------------------

    /// Current flow state.
    pub fn state(&self) -> FlowState {
        let inner = self.inner.lock().unwrap();
        FlowState::from(inner.fsm.state())
    }

    /// Current code buffer value.
    pub fn code(&self) -> String {
        self.inner.lock().unwrap().code.value()
    }

    /// True when the code buffer holds a full-length code.
    pub fn code_is_full(&self) -> bool {
        self.inner.lock().unwrap().code.is_full()
    }

    /// Per-cell render snapshot of the code input.
    pub fn code_cells(&self) -> Vec<CellView> {
        self.inner.lock().unwrap().code.cells()
    }

    /// True while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// The most recent operation failure, if any.
    pub fn last_error(&self) -> Option<FlowError> {
        self.inner.lock().unwrap().last_error.clone()
    }

    /// The identity payload captured at credential submission.
    pub fn pending_identity(&self) -> Option<PendingIdentity> {
        self.inner.lock().unwrap().pending.clone()
    }

    // ---- code input forwarding ------------------------------------

    /// Apply a raw text-change event from code cell `index`.
    pub fn edit_code_cell(&self, index: usize, text: &str) {
        self.inner.lock().unwrap().code.edit_cell(index, text);
    }

    /// Handle a physical backspace in an already-empty code cell.
    pub fn code_backspace_at_empty(&self, index: usize) {
        self.inner.lock().unwrap().code.backspace_at_empty(index);
    }

    /// Bulk-set the code from a paste or autofill source.
    pub fn set_code(&self, raw: &str) {
        self.inner.lock().unwrap().code.paste(raw);
    }

    /// Record focus acquisition on code cell `index`.
    pub fn focus_code_cell(&self, index: usize) {
        self.inner.lock().unwrap().code.focus(index);
    }

    /// Record loss of focus on the code input.
    pub fn blur_code(&self) {
        self.inner.lock().unwrap().code.blur();
    }

    // ---- flow operations ------------------------------------------

    /// Submit registration credentials and request a verification code.
    ///
    /// On acceptance the pending identity payload is stored and the
    /// flow moves to `AwaitingCode`. On rejection the state is
    /// unchanged and the error is surfaced as `CredentialRejected`
    /// (or `DispatchError` when the code could not be sent).
    pub async fn submit_credentials(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> FlowResult<()> {
        self.acquire_busy()?;
        let result = self.do_submit_credentials(full_name, email, password).await;
        self.release_busy();
        self.finish("submit_credentials", result)
    }

    /// Re-request a verification code. Clears the code buffer.
    pub async fn resend_code(&self) -> FlowResult<()> {
        self.acquire_busy()?;
        let result = self.do_resend_code().await;
        self.release_busy();
        self.finish("resend_code", result)
    }

    /// Submit the entered code for verification, then register the
    /// verified user with the backend.
    ///
    /// Requires a full-length code. On rejection the flow returns to
    /// `AwaitingCode` and the buffer is left as-is for the caller to
    /// decide whether to clear.
    pub async fn submit_code(&self) -> FlowResult<()> {
        self.acquire_busy()?;
        let result = self.do_submit_code().await;
        self.release_busy();
        self.finish("submit_code", result)
    }

    /// Retry backend registration after a `Failed` state.
    ///
    /// Only possible when a session token is held; a flow that failed
    /// with `MissingToken` cannot be retried.
    pub async fn retry_registration(&self) -> FlowResult<()> {
        self.acquire_busy()?;
        let result = self.do_retry_registration().await;
        self.release_busy();
        self.finish("retry_registration", result)
    }

    /// Return to the credentials step, clearing the code buffer.
    pub fn back_to_credentials(&self) -> FlowResult<()> {
        self.acquire_busy()?;
        let result = (|| {
            self.transition(&SignupMachineInput::BackRequested)?;
            self.inner.lock().unwrap().code.clear();
            Ok(())
        })();
        self.release_busy();
        self.finish("back_to_credentials", result)
    }

    /// Abandon the flow entirely and return to a fresh
    /// `CollectingCredentials` state.
    pub fn reset(&self) -> FlowResult<()> {
        self.acquire_busy()?;
        *self.inner.lock().unwrap() = FlowInner::fresh(self.code_length);
        self.release_busy();
        debug!("sign-up flow reset");
        Ok(())
    }

    // ---- internals ------------------------------------------------

    async fn do_submit_credentials(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> FlowResult<()> {
        self.require_state(SignupMachineState::CollectingCredentials, "submit credentials")?;

        let pending = PendingIdentity {
            email: email.trim().to_string(),
            full_name: full_name.trim().to_string(),
        };
        let request = SignUpRequest {
            email: pending.email.clone(),
            password: password.to_string(),
            first_name: pending.first_name(),
            last_name: pending.last_name(),
        };

        let session = self
            .identity
            .submit_credentials(&request)
            .await
            .map_err(|e| FlowError::CredentialRejected(e.message))?;

        self.identity
            .dispatch_code(&session)
            .await
            .map_err(|e| FlowError::DispatchError(e.message))?;

        {
            let mut inner = self.inner.lock().unwrap();
            inner.pending = Some(pending);
            inner.session = Some(session);
            inner.code.clear();
        }
        self.transition(&SignupMachineInput::CodeDispatched)?;
        info!("verification code dispatched");
        Ok(())
    }

    async fn do_resend_code(&self) -> FlowResult<()> {
        let session = {
            let mut inner = self.inner.lock().unwrap();
            if *inner.fsm.state() != SignupMachineState::AwaitingCode {
                return Err(self.bad_state(inner.fsm.state(), "resend code"));
            }
            inner.code.clear();
            inner
                .session
                .clone()
                .ok_or_else(|| FlowError::InvalidTransition("no identity session".to_string()))?
        };

        self.identity
            .dispatch_code(&session)
            .await
            .map_err(|e| FlowError::DispatchError(e.message))?;

        self.transition(&SignupMachineInput::ResendRequested)?;
        info!("verification code resent");
        Ok(())
    }

    async fn do_submit_code(&self) -> FlowResult<()> {
        let (session, code) = {
            let inner = self.inner.lock().unwrap();
            if *inner.fsm.state() != SignupMachineState::AwaitingCode {
                return Err(self.bad_state(inner.fsm.state(), "submit code"));
            }
            if !inner.code.is_full() {
                return Err(FlowError::IncompleteCode {
                    entered: inner.code.len(),
                    required: inner.code.max_len(),
                });
            }
            let session = inner
                .session
                .clone()
                .ok_or_else(|| FlowError::InvalidTransition("no identity session".to_string()))?;
            (session, inner.code.value())
        };

        self.transition(&SignupMachineInput::CodeSubmitted)?;

        let verified = match self.identity.verify_code(&session, &code).await {
            Ok(verified) => verified,
            Err(e) => {
                // Buffer is intentionally left intact; the caller
                // decides whether to clear it.
                self.transition(&SignupMachineInput::CodeRejected)?;
                return Err(FlowError::CodeRejected(e.message));
            }
        };

        let token = match self.identity.get_token(&session).await {
            Ok(Some(token)) => token,
            Ok(None) | Err(_) => {
                self.transition(&SignupMachineInput::TokenMissing)?;
                return Err(FlowError::MissingToken);
            }
        };

        {
            let mut inner = self.inner.lock().unwrap();
            inner.provider_user_id = Some(verified.user_id.clone());
            inner.token = Some(token.clone());
        }
        self.transition(&SignupMachineInput::CodeConfirmed)?;
        debug!(user_id = %verified.user_id, "email verified, registering with backend");

        self.register(&token).await
    }

    async fn do_retry_registration(&self) -> FlowResult<()> {
        let token = {
            let inner = self.inner.lock().unwrap();
            if *inner.fsm.state() != SignupMachineState::Failed {
                return Err(self.bad_state(inner.fsm.state(), "retry registration"));
            }
            inner.token.clone()
        };
        let token = token.ok_or(FlowError::MissingToken)?;

        self.transition(&SignupMachineInput::RetryRequested)?;
        self.register(&token).await
    }

    /// Register the verified user with the backend. Expects the flow
    /// to be in `Registering`.
    async fn register(&self, token: &str) -> FlowResult<()> {
        let record = {
            let inner = self.inner.lock().unwrap();
            let pending = inner
                .pending
                .as_ref()
                .ok_or_else(|| FlowError::InvalidTransition("no pending identity".to_string()))?;
            let user_id = inner.provider_user_id.as_ref().ok_or_else(|| {
                FlowError::InvalidTransition("no provider user id".to_string())
            })?;
            NewUserRecord {
                provider_user_id: user_id.clone(),
                email: pending.email.clone(),
                first_name: pending.first_name(),
                last_name: pending.last_name(),
                full_name: pending.full_name.clone(),
            }
        };

        match self.registration.register_user(&record, token).await {
            Ok(receipt) if receipt.success => {
                self.transition(&SignupMachineInput::RegistrationSucceeded)?;
                self.inner.lock().unwrap().pending = None;
                info!(user_id = %receipt.user_id, "user registered with backend");
                Ok(())
            }
            Ok(receipt) => {
                self.transition(&SignupMachineInput::RegistrationFailed)?;
                Err(FlowError::RegistrationError(
                    receipt
                        .message
                        .unwrap_or_else(|| "registration declined".to_string()),
                ))
            }
            Err(e) => {
                self.transition(&SignupMachineInput::RegistrationFailed)?;
                Err(FlowError::RegistrationError(e.message))
            }
        }
    }

    /// Claim the single in-flight slot; disables code editing while a
    /// request is pending.
    fn acquire_busy(&self) -> FlowResult<()> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FlowError::Busy);
        }
        self.inner.lock().unwrap().code.set_disabled(true);
        Ok(())
    }

    fn release_busy(&self) {
        self.inner.lock().unwrap().code.set_disabled(false);
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Drive the FSM, mapping rejected inputs to `InvalidTransition`.
    fn transition(&self, input: &SignupMachineInput) -> FlowResult<FlowState> {
        let mut inner = self.inner.lock().unwrap();
        let old_state = FlowState::from(inner.fsm.state());

        inner.fsm.consume(input).map_err(|_| {
            FlowError::InvalidTransition(format!(
                "cannot apply {:?} in state {:?}",
                input,
                inner.fsm.state()
            ))
        })?;

        let new_state = FlowState::from(inner.fsm.state());
        if old_state != new_state {
            debug!(?old_state, ?new_state, "sign-up flow transition");
        }
        Ok(new_state)
    }

    fn require_state(
        &self,
        expected: SignupMachineState,
        operation: &str,
    ) -> FlowResult<()> {
        let inner = self.inner.lock().unwrap();
        if *inner.fsm.state() != expected {
            return Err(self.bad_state(inner.fsm.state(), operation));
        }
        Ok(())
    }

    fn bad_state(&self, state: &SignupMachineState, operation: &str) -> FlowError {
        FlowError::InvalidTransition(format!(
            "cannot {} in state {:?}",
            operation,
            FlowState::from(state)
        ))
    }

    /// Record the operation outcome as the last-error observable.
    fn finish(&self, operation: &str, result: FlowResult<()>) -> FlowResult<()> {
        let mut inner = self.inner.lock().unwrap();
        match &result {
            Ok(()) => inner.last_error = None,
            Err(err) => {
                warn!(operation, error = %err, "sign-up flow operation failed");
                inner.last_error = Some(err.clone());
            }
        }
        result
    }
}
