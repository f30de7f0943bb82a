//! The claim-check state machine.
//!
//! A [`ClaimSession`] owns the claim text and exactly one [`UiState`]. The only
//! way into `Loading` is [`ClaimSession::begin`], which hands out an
//! [`InFlight`] ticket; the only way out is [`ClaimSession::settle`], which
//! consumes it. Because the ticket cannot be cloned, every check settles at
//! most once, and because `begin` refuses while loading, at most one check is
//! ever outstanding.
use crate::backend::{CheckOutcome, ClaimBackend};
use crate::types::{ClaimRequest, ClaimResult};
use std::time::Instant;
use uuid::Uuid;

pub const EMPTY_CLAIM_MESSAGE: &str = "Please enter a claim to check";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to check claim";

/// Message shown when no response could be obtained from `backend`.
///
/// ```
/// assert_eq!(
///     claimcheck_client::unreachable_message("http://localhost:3000/"),
///     "Failed to check claim. Make sure the backend server is running at http://localhost:3000/."
/// );
/// ```
pub fn unreachable_message(backend: &str) -> String {
    format!("{GENERIC_FAILURE_MESSAGE}. Make sure the backend server is running at {backend}.")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(ClaimResult),
    Failed(String),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn result(&self) -> Option<&ClaimResult> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl From<CheckOutcome> for UiState {
    fn from(outcome: CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::Verified(result) => Self::Success(result),
            CheckOutcome::Rejected { message, .. } => {
                Self::Failed(message.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()))
            }
            CheckOutcome::Malformed { .. } => Self::Failed(GENERIC_FAILURE_MESSAGE.to_string()),
            CheckOutcome::Unreachable { backend, .. } => {
                Self::Failed(unreachable_message(&backend))
            }
        }
    }
}

/// Why [`ClaimSession::begin`] did not start a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    #[error("a claim check is already in flight")]
    InFlight,
    #[error("{}", EMPTY_CLAIM_MESSAGE)]
    EmptyClaim,
}

/// Proof that a check is outstanding. Hand it back to [`ClaimSession::settle`].
#[must_use = "an in-flight check must be settled"]
#[derive(Debug)]
pub struct InFlight {
    id: Uuid,
    request: ClaimRequest,
    started: Instant,
}

impl InFlight {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request(&self) -> &ClaimRequest {
        &self.request
    }
}

#[derive(Debug, Default)]
pub struct ClaimSession {
    claim_text: String,
    state: UiState,
    in_flight: Option<Uuid>,
}

impl ClaimSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claim(text: impl Into<String>) -> Self {
        Self {
            claim_text: text.into(),
            ..Self::default()
        }
    }

    pub fn claim_text(&self) -> &str {
        &self.claim_text
    }

    /// Replace the input text. Editing never touches the displayed result.
    pub fn set_claim_text(&mut self, text: impl Into<String>) {
        self.claim_text = text.into();
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading() && !self.claim_text.trim().is_empty()
    }

    /// Validate the claim and move to `Loading`, clearing any previous result
    /// or error. An empty claim moves to `Failed` instead and no ticket is
    /// issued.
    pub fn begin(&mut self) -> Result<InFlight, SubmitBlocked> {
        if self.state.is_loading() {
            return Err(SubmitBlocked::InFlight);
        }
        let Some(request) = ClaimRequest::new(&self.claim_text) else {
            tracing::info!("claim.rejected_empty");
            self.state = UiState::Failed(EMPTY_CLAIM_MESSAGE.to_string());
            return Err(SubmitBlocked::EmptyClaim);
        };

        let id = Uuid::new_v4();
        self.in_flight = Some(id);
        self.state = UiState::Loading;
        tracing::debug!(check_id = %id, claim_len = request.claim().len(), "claim.submit");
        Ok(InFlight {
            id,
            request,
            started: Instant::now(),
        })
    }

    /// Record the outcome of the check `ticket` stands for.
    ///
    /// Returns `false` and leaves the state alone if the ticket was issued by
    /// a different session.
    pub fn settle(&mut self, ticket: InFlight, outcome: CheckOutcome) -> bool {
        if self.in_flight != Some(ticket.id) {
            tracing::warn!(check_id = %ticket.id, "claim.settle_foreign_ticket");
            return false;
        }
        self.in_flight = None;
        self.state = UiState::from(outcome);
        tracing::debug!(
            check_id = %ticket.id,
            elapsed_ms = ticket.started.elapsed().as_millis() as u64,
            success = self.state.result().is_some(),
            "claim.settled"
        );
        true
    }

    /// Begin, await `backend`, settle.
    pub async fn submit<B>(&mut self, backend: &B) -> Result<&UiState, SubmitBlocked>
    where
        B: ClaimBackend + ?Sized,
    {
        let ticket = self.begin()?;
        let outcome = backend.check(ticket.request()).await;
        self.settle(ticket, outcome);
        Ok(&self.state)
    }

    /// Back to `Idle` with an empty claim. Refused while a check is in flight.
    pub fn clear(&mut self) -> bool {
        if self.state.is_loading() {
            return false;
        }
        self.claim_text.clear();
        self.state = UiState::Idle;
        true
    }
}
