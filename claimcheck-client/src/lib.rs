//! Claim-check client: wire types, the session state machine, the backend
//! seam, and the derived render model.
//!
//! The client does no verification itself. It sends a claim to the backend's
//! `POST /check` endpoint and maps whatever comes back onto a [`UiState`].
//!
//! ```no_run
//! use claimcheck_client::{render, ClaimSession, HttpBackend};
//!
//! # async fn demo() -> claimcheck_common::Result<()> {
//! let backend = HttpBackend::new("http://localhost:3000", "/check")?;
//! let mut session = ClaimSession::with_claim("The Earth is flat");
//! let _ = session.submit(&backend).await;
//! print!("{}", render::body_text(&render::view(&session).body));
//! # Ok(()) }
//! ```
pub mod backend;
pub mod render;
pub mod session;
pub mod types;

pub use backend::{CheckOutcome, ClaimBackend, HttpBackend};
pub use session::{
    ClaimSession, EMPTY_CLAIM_MESSAGE, GENERIC_FAILURE_MESSAGE, InFlight, SubmitBlocked, UiState,
    unreachable_message,
};
pub use types::{BannerCategory, ClaimRequest, ClaimResult, VerdictKind};
