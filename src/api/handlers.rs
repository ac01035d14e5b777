use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::ItemRecord;
use crate::services::swipe::{
    ActionLogEntry, Affordance, CardTransform, DeckSession, DeckStatus, ExitTicket, GesturePhase,
    PointerEvent, PointerKind, PointerOutcome, PointerTarget, SwipeCard, Verdict,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct StartDeckRequest {
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub preference: String,
}

#[derive(Debug, Deserialize)]
pub struct PointerRequest {
    pub kind: PointerKind,
    pub pointer_id: i64,
    pub client_x: f64,
    pub client_y: f64,
    #[serde(default)]
    pub target: PointerTarget,
}

impl PointerRequest {
    fn event(&self) -> PointerEvent {
        PointerEvent::new(self.pointer_id, self.client_x, self.client_y)
    }
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub position: usize,
    pub interactive: bool,
    pub phase: GesturePhase,
    pub transform: CardTransform,
    pub affordance: Affordance,
    pub item: ItemRecord,
}

impl CardResponse {
    fn new(card: &SwipeCard, top: Option<Uuid>) -> Self {
        let tracker = card.tracker();
        Self {
            id: card.id(),
            position: card.position(),
            interactive: top == Some(card.id()),
            phase: tracker.phase(),
            transform: tracker.transform(),
            affordance: tracker.affordance(),
            item: card.item().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeckResponse {
    pub session_id: Uuid,
    pub status: DeckStatus,
    pub exhausted: bool,
    pub decisions: usize,
    pub cards: Vec<CardResponse>,
}

impl From<&DeckSession> for DeckResponse {
    fn from(session: &DeckSession) -> Self {
        let top = session.top_card().map(SwipeCard::id);
        Self {
            session_id: session.id(),
            status: session.status(),
            exhausted: session.is_exhausted(),
            decisions: session.log().len(),
            cards: session
                .cards()
                .iter()
                .map(|card| CardResponse::new(card, top))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PointerResponse {
    Ignored,
    DragStarted,
    Dragged {
        transform: CardTransform,
        affordance: Affordance,
    },
    SnappedBack {
        duration_ms: u64,
    },
    Committing {
        liked: bool,
        exit: CardTransform,
        duration_ms: u64,
    },
}

impl From<PointerOutcome> for PointerResponse {
    fn from(outcome: PointerOutcome) -> Self {
        match outcome {
            PointerOutcome::Ignored => PointerResponse::Ignored,
            PointerOutcome::DragStarted => PointerResponse::DragStarted,
            PointerOutcome::Dragged {
                transform,
                affordance,
            } => PointerResponse::Dragged {
                transform,
                affordance,
            },
            PointerOutcome::SnappedBack { duration } => PointerResponse::SnappedBack {
                duration_ms: duration.as_millis() as u64,
            },
            PointerOutcome::Committing {
                liked,
                exit,
                duration,
                ..
            } => PointerResponse::Committing {
                liked,
                exit,
                duration_ms: duration.as_millis() as u64,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub session_id: Uuid,
    pub verdicts: Vec<Verdict>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get the current deck
pub async fn get_deck(State(state): State<AppState>) -> Json<DeckResponse> {
    let session = state.session.read().await;
    Json(DeckResponse::from(&*session))
}

/// Start a deck from an explicit batch
pub async fn start_deck(
    State(state): State<AppState>,
    Json(request): Json<StartDeckRequest>,
) -> (StatusCode, Json<DeckResponse>) {
    let items: Vec<ItemRecord> = request.items.into_iter().map(ItemRecord::from_value).collect();

    let mut session = state.session.write().await;
    session.start(items);

    (StatusCode::CREATED, Json(DeckResponse::from(&*session)))
}

/// Fetch a batch for a preference and start a deck from it
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<(StatusCode, Json<DeckResponse>)> {
    let preference = request.preference.trim();
    if preference.is_empty() {
        return Err(AppError::InvalidInput(
            "Please enter something you liked or a mood.".to_string(),
        ));
    }

    tracing::info!(provider = state.source.name(), "Requesting recommendations");

    // The current deck stays as it is if the source fails
    let items = state.source.recommend(preference).await?;

    let mut session = state.session.write().await;
    session.start(items);

    Ok((StatusCode::CREATED, Json(DeckResponse::from(&*session))))
}

/// Clear the deck
pub async fn reset_deck(State(state): State<AppState>) -> Json<DeckResponse> {
    let mut session = state.session.write().await;
    session.reset();
    Json(DeckResponse::from(&*session))
}

/// Deliver a pointer event to a card
pub async fn pointer_event(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    Json(request): Json<PointerRequest>,
) -> AppResult<Json<PointerResponse>> {
    let outcome = {
        let mut session = state.session.write().await;
        session.pointer(card_id, request.kind, &request.event(), request.target)?
    };

    if let PointerOutcome::Committing {
        ticket, duration, ..
    } = outcome
    {
        schedule_exit(state.session.clone(), ticket, duration);
    }

    Ok(Json(PointerResponse::from(outcome)))
}

/// Completes a card's exit once its animation window has elapsed
fn schedule_exit(session: Arc<RwLock<DeckSession>>, ticket: ExitTicket, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let outcome = session.write().await.complete_exit(ticket);
        tracing::debug!(card_id = %ticket.card_id, outcome = ?outcome, "Exit animation finished");
    });
}

/// Get the decisions recorded so far, oldest first
pub async fn get_log(State(state): State<AppState>) -> Json<Vec<ActionLogEntry>> {
    let session = state.session.read().await;
    Json(session.log().entries().to_vec())
}

/// Get the final verdicts of an exhausted deck
pub async fn get_summary(State(state): State<AppState>) -> AppResult<Json<SummaryResponse>> {
    let session = state.session.read().await;
    let summary = session.summary().ok_or_else(|| match session.status() {
        DeckStatus::Idle => AppError::Conflict("No deck has been started".to_string()),
        _ => AppError::Conflict("The deck still has cards to swipe".to_string()),
    })?;

    Ok(Json(SummaryResponse {
        session_id: session.id(),
        verdicts: summary.verdicts().to_vec(),
    }))
}
