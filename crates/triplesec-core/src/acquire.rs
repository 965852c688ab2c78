//! Passphrase acquisition with bounded retries and optional confirmation.
//!
//! The operator gets three attempts to enter a passphrase of at least
//! [`MIN_PASSPHRASE_LENGTH`] bytes. Encryption additionally asks for the
//! passphrase a second time; a confirmation mismatch is fatal immediately.
//!
//! ```text
//! AwaitingEntry(0) --short--> AwaitingEntry(1) --short--> AwaitingEntry(2) --short--> Rejected
//!        |                           |                           |
//!        +------------- long enough -+---------------------------+
//!                                    |
//!                  encrypt: Confirming --match--> Accepted
//!                                    \--mismatch--> Rejected
//!                  decrypt: Accepted
//! ```

use std::io::{self, Write};

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::{Result, TripleSecError};
use crate::pipeline::Mode;
use crate::secret::{Secret, MIN_PASSPHRASE_LENGTH};

/// Short entries tolerated before the final attempt.
pub const MAX_SHORT_RETRIES: u32 = 2;

pub const PASSPHRASE_PROMPT: &str = "Passphrase";
pub const CONFIRM_PROMPT: &str = "Confirm";

/// Source of masked operator input.
///
/// Implementations must not echo what the operator types.
pub trait SecretReader {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Zeroizing<Vec<u8>>>;
}

/// Why acquisition gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    InputUnavailable(String),
    TooManyShortAttempts,
    ConfirmationMismatch,
}

/// One state of the acquisition machine.
#[derive(Debug)]
pub enum AcquisitionState {
    AwaitingEntry { tries: u32 },
    Confirming(Secret),
    Accepted(Secret),
    Rejected(RejectReason),
}

impl AcquisitionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AcquisitionState::Accepted(_) | AcquisitionState::Rejected(_)
        )
    }
}

/// Drives a [`SecretReader`] through the acquisition states.
///
/// Policy messages go to `notices`; prompts are the reader's business.
pub struct Acquisition<'a, R: SecretReader> {
    reader: &'a mut R,
    notices: &'a mut dyn Write,
    confirm: bool,
    reads: u32,
}

impl<'a, R: SecretReader> Acquisition<'a, R> {
    /// Prepare acquisition for an operation; only encryption is confirmed.
    pub fn new(reader: &'a mut R, notices: &'a mut dyn Write, mode: Mode) -> Self {
        Self {
            reader,
            notices,
            confirm: matches!(mode, Mode::Encrypt),
            reads: 0,
        }
    }

    /// Number of secrets requested from the reader so far.
    pub fn reads(&self) -> u32 {
        self.reads
    }

    /// Advance the machine by one transition.
    pub fn step(&mut self, state: AcquisitionState) -> AcquisitionState {
        match state {
            AcquisitionState::AwaitingEntry { tries } => self.on_entry(tries),
            AcquisitionState::Confirming(secret) => self.on_confirm(secret),
            terminal => terminal,
        }
    }

    /// Run until the machine reaches `Accepted` or `Rejected`.
    pub fn run(mut self) -> Result<Secret> {
        let mut state = AcquisitionState::AwaitingEntry { tries: 0 };
        while !state.is_terminal() {
            state = self.step(state);
        }
        match state {
            AcquisitionState::Accepted(secret) => {
                tracing::debug!(reads = self.reads, "passphrase accepted");
                Ok(secret)
            }
            AcquisitionState::Rejected(reason) => {
                tracing::debug!(reads = self.reads, ?reason, "passphrase rejected");
                Err(reason.into())
            }
            _ => unreachable!("loop exits only on a terminal state"),
        }
    }

    fn read(&mut self, prompt: &str) -> std::result::Result<Zeroizing<Vec<u8>>, RejectReason> {
        self.reads += 1;
        self.reader
            .read_secret(prompt)
            .map_err(|e| RejectReason::InputUnavailable(e.to_string()))
    }

    fn notice(&mut self, message: &str) {
        // Operator output is best-effort; a closed stream must not change the outcome.
        let _ = writeln!(self.notices, "{}", message);
    }

    fn on_entry(&mut self, tries: u32) -> AcquisitionState {
        let entered = match self.read(PASSPHRASE_PROMPT) {
            Ok(bytes) => bytes,
            Err(reason) => return AcquisitionState::Rejected(reason),
        };

        if entered.len() < MIN_PASSPHRASE_LENGTH {
            self.notice(&format!(
                "Passphrase must be at least {} chars",
                MIN_PASSPHRASE_LENGTH
            ));
            if tries < MAX_SHORT_RETRIES {
                return AcquisitionState::AwaitingEntry { tries: tries + 1 };
            }
            return AcquisitionState::Rejected(RejectReason::TooManyShortAttempts);
        }

        let secret = Secret::new(entered.to_vec());
        if self.confirm {
            AcquisitionState::Confirming(secret)
        } else {
            AcquisitionState::Accepted(secret)
        }
    }

    fn on_confirm(&mut self, secret: Secret) -> AcquisitionState {
        let confirmation = match self.read(CONFIRM_PROMPT) {
            Ok(bytes) => bytes,
            Err(reason) => return AcquisitionState::Rejected(reason),
        };

        let matches: bool = secret.expose().ct_eq(confirmation.as_slice()).into();
        if matches {
            AcquisitionState::Accepted(secret)
        } else {
            self.notice("Passphrases do not match");
            AcquisitionState::Rejected(RejectReason::ConfirmationMismatch)
        }
    }
}

impl From<RejectReason> for TripleSecError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::InputUnavailable(message) => TripleSecError::InputUnavailable(message),
            RejectReason::TooManyShortAttempts => TripleSecError::TooManyShortAttempts {
                min: MIN_PASSPHRASE_LENGTH,
                attempts: MAX_SHORT_RETRIES + 1,
            },
            RejectReason::ConfirmationMismatch => TripleSecError::ConfirmationMismatch,
        }
    }
}

/// Obtain a policy-compliant passphrase for `mode`.
pub fn acquire_passphrase<R: SecretReader>(
    reader: &mut R,
    notices: &mut dyn Write,
    mode: Mode,
) -> Result<Secret> {
    Acquisition::new(reader, notices, mode).run()
}
