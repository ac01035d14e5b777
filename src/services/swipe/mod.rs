//! Gesture-to-decision pipeline
//!
//! Pointer drags on the top card are classified by a [`GestureTracker`], committed
//! decisions go into the session's [`ActionLog`], and once the deck runs dry the log
//! is folded into a [`VerdictMap`] where the latest decision for each item wins.

use thiserror::Error;

pub mod card;
pub mod gesture;
pub mod log;
pub mod reducer;
pub mod session;

pub use card::{CardId, SwipeCard};
pub use gesture::{
    Affordance, CardTransform, GestureEnd, GesturePhase, GestureTracker, PointerEvent,
    PointerTarget,
};
pub use log::{ActionLog, ActionLogEntry};
#[allow(deprecated)]
pub use reducer::{reduce, reduce_legacy, summarize, LegacyResults, Verdict, VerdictMap};
pub use session::{
    CommitOutcome, DeckSession, DeckStatus, ExitTicket, PointerKind, PointerOutcome,
    SummaryListener,
};

/// Error types for the swipe pipeline
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Card {0} is not in the current deck")]
    UnknownCard(CardId),
    #[error("Action log sequence out of order: last {last}, got {got}")]
    OutOfOrder { last: u64, got: u64 },
}
