//! Segmented one-time-passcode input state machine.
//!
//! This crate models the verification-code entry widget as pure state:
//! a fixed number of single-digit cells that together hold one code,
//! plus the focus bookkeeping that drives per-cell highlighting. The
//! rendering layer (mobile, TUI, tests) forwards raw text-change and
//! key events and reads back a snapshot; it never touches the buffer
//! directly.

mod error;
mod input;

pub use error::{OtpInputError, OtpInputResult};
pub use input::{CellView, OtpInput, DEFAULT_CODE_LENGTH};
