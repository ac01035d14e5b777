use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::card::{CardId, SwipeCard};
use super::gesture::{Affordance, CardTransform, GestureEnd, PointerEvent, PointerTarget};
use super::log::{ActionLog, ActionLogEntry};
use super::reducer::{reduce, VerdictMap};
use super::SessionError;
use crate::config::SwipeConfig;
use crate::models::ItemRecord;

/// Lifecycle of the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckStatus {
    /// No batch has been started, or the deck was reset
    Idle,
    /// Started with an empty batch
    NoResults,
    /// Cards remain
    Active,
    /// Every card has been committed
    Exhausted,
}

/// Kind of pointer event delivered to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
    LostCapture,
}

/// Handle that completes one card's exit animation
///
/// Tickets are bound to the session that issued them; once the deck is restarted or
/// reset they no longer commit anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExitTicket {
    pub session_id: Uuid,
    pub card_id: CardId,
}

/// What a pointer event did to the deck
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    Ignored,
    DragStarted,
    Dragged {
        transform: CardTransform,
        affordance: Affordance,
    },
    SnappedBack {
        duration: Duration,
    },
    /// Exit animation started; call [`DeckSession::complete_exit`] after `duration`
    Committing {
        liked: bool,
        exit: CardTransform,
        duration: Duration,
        ticket: ExitTicket,
    },
}

/// Result of delivering a commit to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Unknown or already removed card, or a ticket from another session
    Ignored,
    Recorded { sequence: u64, exhausted: bool },
}

/// Receives the reduced verdicts once a deck runs out of cards
#[cfg_attr(test, mockall::automock)]
pub trait SummaryListener: Send + Sync {
    fn on_summary_ready(&self, session_id: Uuid, summary: &VerdictMap);
}

/// One batch of recommendations being swiped through
///
/// Owns the card stack (index 0 is the top card), the action log and, once
/// exhausted, the reduced verdicts. Starting a new batch or resetting discards all of
/// it and rotates the session id.
pub struct DeckSession {
    id: Uuid,
    config: SwipeConfig,
    status: DeckStatus,
    cards: Vec<SwipeCard>,
    log: ActionLog,
    summary: Option<VerdictMap>,
    listener: Option<Arc<dyn SummaryListener>>,
}

impl DeckSession {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            status: DeckStatus::Idle,
            cards: Vec::new(),
            log: ActionLog::new(),
            summary: None,
            listener: None,
        }
    }

    /// Attaches the listener notified on exhaustion
    pub fn with_listener(mut self, listener: Arc<dyn SummaryListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn status(&self) -> DeckStatus {
        self.status
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.status, DeckStatus::Exhausted | DeckStatus::NoResults)
    }

    /// Remaining cards, top first
    pub fn cards(&self) -> &[SwipeCard] {
        &self.cards
    }

    pub fn card(&self, card_id: CardId) -> Option<&SwipeCard> {
        self.cards.iter().find(|card| card.id() == card_id)
    }

    /// The only card that accepts new gestures
    ///
    /// Cards still playing their exit animation sit above it but no longer count.
    pub fn top_card(&self) -> Option<&SwipeCard> {
        self.cards.iter().find(|card| card.tracker().is_interactive())
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Reduced verdicts, available once the deck is exhausted
    pub fn summary(&self) -> Option<&VerdictMap> {
        self.summary.as_ref()
    }

    /// Replaces whatever was in progress with a fresh deck for `items`
    pub fn start(&mut self, items: Vec<ItemRecord>) {
        self.discard();

        if items.is_empty() {
            tracing::info!(session_id = %self.id, "Deck started with no recommendations");
            self.status = DeckStatus::NoResults;
            self.publish_summary();
            return;
        }

        let config = self.config;
        self.cards = items
            .into_iter()
            .enumerate()
            .map(|(position, item)| SwipeCard::new(item, position, &config))
            .collect();
        self.status = DeckStatus::Active;

        tracing::info!(
            session_id = %self.id,
            cards = self.cards.len(),
            "Deck started"
        );
    }

    /// Clears cards, log and summary; pending exits become stale
    pub fn reset(&mut self) {
        let previous = self.id;
        self.discard();
        tracing::info!(previous_session = %previous, session_id = %self.id, "Deck reset");
    }

    fn discard(&mut self) {
        let dropped = self.cards.len();
        if dropped > 0 {
            tracing::debug!(session_id = %self.id, dropped, "Discarding uncommitted cards");
        }

        self.id = Uuid::new_v4();
        self.cards.clear();
        self.log = ActionLog::new();
        self.summary = None;
        self.status = DeckStatus::Idle;
    }

    /// Routes a pointer event to a card's gesture tracker
    ///
    /// Only the top card may start a drag. Events for cards that are not in the
    /// deck return [`SessionError::UnknownCard`] and change nothing.
    pub fn pointer(
        &mut self,
        card_id: CardId,
        kind: PointerKind,
        event: &PointerEvent,
        target: PointerTarget,
    ) -> Result<PointerOutcome, SessionError> {
        let top_id = self.top_card().map(SwipeCard::id);
        let session_id = self.id;
        let card = self
            .cards
            .iter_mut()
            .find(|card| card.id() == card_id)
            .ok_or(SessionError::UnknownCard(card_id))?;
        let tracker = card.tracker_mut();

        let outcome = match kind {
            PointerKind::Down => {
                if top_id != Some(card_id) {
                    tracing::debug!(card_id = %card_id, "Pointer down on a card below the top, ignoring");
                    PointerOutcome::Ignored
                } else if tracker.pointer_down(event, target) {
                    PointerOutcome::DragStarted
                } else {
                    PointerOutcome::Ignored
                }
            }
            PointerKind::Move => match tracker.pointer_move(event) {
                Some(transform) => PointerOutcome::Dragged {
                    transform,
                    affordance: tracker.affordance(),
                },
                None => PointerOutcome::Ignored,
            },
            PointerKind::Up | PointerKind::Cancel | PointerKind::LostCapture => {
                match tracker.pointer_end(event) {
                    GestureEnd::Ignored => PointerOutcome::Ignored,
                    GestureEnd::SnapBack { duration } => {
                        tracing::debug!(card_id = %card_id, "Drag below threshold, snapping back");
                        PointerOutcome::SnappedBack { duration }
                    }
                    GestureEnd::Commit {
                        liked,
                        exit,
                        duration,
                    } => {
                        tracing::debug!(card_id = %card_id, liked, "Drag committed, exit animation started");
                        PointerOutcome::Committing {
                            liked,
                            exit,
                            duration,
                            ticket: ExitTicket {
                                session_id,
                                card_id,
                            },
                        }
                    }
                }
            }
        };

        Ok(outcome)
    }

    /// Called once a card's exit animation has elapsed
    pub fn complete_exit(&mut self, ticket: ExitTicket) -> CommitOutcome {
        if ticket.session_id != self.id {
            tracing::debug!(
                card_id = %ticket.card_id,
                stale_session = %ticket.session_id,
                "Exit ticket from a discarded session, ignoring"
            );
            return CommitOutcome::Ignored;
        }

        let liked = self
            .cards
            .iter_mut()
            .find(|card| card.id() == ticket.card_id)
            .and_then(|card| card.tracker_mut().complete_exit());

        match liked {
            Some(liked) => self.on_commit(ticket.card_id, liked),
            None => CommitOutcome::Ignored,
        }
    }

    /// Records the decision for a card and removes it from the deck
    ///
    /// A card can only be committed once: later calls for the same id find nothing
    /// and are ignored.
    pub fn on_commit(&mut self, card_id: CardId, liked: bool) -> CommitOutcome {
        let Some(index) = self.cards.iter().position(|card| card.id() == card_id) else {
            tracing::debug!(card_id = %card_id, "Commit for a card not in the deck, ignoring");
            return CommitOutcome::Ignored;
        };

        let sequence = self.log.next_sequence();
        let entry = ActionLogEntry::new(sequence, self.cards[index].item().clone(), liked);

        // The card stays in the deck unless its decision made it into the log
        if let Err(e) = self.log.append(entry) {
            tracing::error!(error = %e, card_id = %card_id, "Failed to append decision");
            return CommitOutcome::Ignored;
        }
        self.cards.remove(index);

        tracing::info!(
            session_id = %self.id,
            card_id = %card_id,
            liked,
            sequence,
            remaining = self.cards.len(),
            "Decision recorded"
        );

        if self.cards.is_empty() && self.status == DeckStatus::Active {
            self.status = DeckStatus::Exhausted;
            self.publish_summary();
        }

        CommitOutcome::Recorded {
            sequence,
            exhausted: self.is_exhausted(),
        }
    }

    fn publish_summary(&mut self) {
        let summary = reduce(&self.log);

        tracing::info!(
            session_id = %self.id,
            verdicts = summary.len(),
            liked = summary.liked_count(),
            "Deck exhausted, summary ready"
        );

        if let Some(listener) = &self.listener {
            listener.on_summary_ready(self.id, &summary);
        }
        self.summary = Some(summary);
    }
}
