use uuid::Uuid;

use super::gesture::GestureTracker;
use crate::config::SwipeConfig;
use crate::models::ItemRecord;

pub type CardId = Uuid;

/// A recommended item waiting for a decision
#[derive(Debug, Clone)]
pub struct SwipeCard {
    id: CardId,
    item: ItemRecord,
    /// Stack order at creation, 0 = topmost
    position: usize,
    tracker: GestureTracker,
}

impl SwipeCard {
    pub fn new(item: ItemRecord, position: usize, config: &SwipeConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            item,
            position,
            tracker: GestureTracker::new(config),
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn item(&self) -> &ItemRecord {
        &self.item
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub(crate) fn tracker_mut(&mut self) -> &mut GestureTracker {
        &mut self.tracker
    }
}
