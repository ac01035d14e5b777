use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::SwipeConfig;
use crate::services::providers::RecommendationSource;
use crate::services::swipe::{DeckSession, SummaryListener, VerdictMap};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<DeckSession>>,
    pub source: Arc<dyn RecommendationSource>,
}

impl AppState {
    /// Creates state with an idle deck backed by `source`
    pub fn new(source: Arc<dyn RecommendationSource>, config: SwipeConfig) -> Self {
        let session = DeckSession::new(config).with_listener(Arc::new(LoggingSummaryListener));

        Self {
            session: Arc::new(RwLock::new(session)),
            source,
        }
    }
}

/// Writes each finished summary to the log
pub struct LoggingSummaryListener;

impl SummaryListener for LoggingSummaryListener {
    fn on_summary_ready(&self, session_id: Uuid, summary: &VerdictMap) {
        let liked = summary.liked_count();
        tracing::info!(
            session_id = %session_id,
            liked,
            disliked = summary.len() - liked,
            "Swipe summary published"
        );
    }
}
