pub mod actor;
pub mod builder;
pub mod check;
pub mod system;

use claimcheck_client::{CheckOutcome, ClaimRequest};
use tokio::sync::oneshot;

/// One claim check. The outcome is delivered on `reply`; a dropped reply
/// means the check never produced an answer.
pub struct CheckCmd {
    pub request: ClaimRequest,
    pub reply: oneshot::Sender<CheckOutcome>,
}
