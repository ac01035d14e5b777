use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::log::ActionLog;
use crate::models::{ItemKey, ItemRecord};

/// Final decision for one distinct item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub id: ItemKey,
    pub liked: bool,
    pub item: ItemRecord,
}

/// Item id → verdict, ordered by first appearance of each id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerdictMap {
    verdicts: Vec<Verdict>,
    index: HashMap<ItemKey, usize>,
}

impl VerdictMap {
    /// Overwrites the verdict for `id`, keeping its original slot
    fn record(&mut self, id: ItemKey, item: ItemRecord, liked: bool) {
        match self.index.get(&id) {
            Some(&slot) => {
                self.verdicts[slot].item = item;
                self.verdicts[slot].liked = liked;
            }
            None => {
                self.index.insert(id.clone(), self.verdicts.len());
                self.verdicts.push(Verdict { id, liked, item });
            }
        }
    }

    pub fn get(&self, id: &ItemKey) -> Option<&Verdict> {
        self.index.get(id).map(|&slot| &self.verdicts[slot])
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn liked_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.liked).count()
    }

    pub fn into_verdicts(self) -> Vec<Verdict> {
        self.verdicts
    }
}

/// Folds the log into one verdict per id; the last entry for an id wins
///
/// Entries without an id cannot be keyed and are dropped.
pub fn reduce(log: &ActionLog) -> VerdictMap {
    let mut verdicts = VerdictMap::default();
    let mut dropped = 0usize;

    for entry in log.entries() {
        match &entry.id {
            Some(id) => verdicts.record(id.clone(), entry.payload.clone(), entry.liked),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "Skipped log entries without an item id");
    }

    verdicts
}

/// Separate like/dislike collections kept by producers that never wrote a log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyResults {
    #[serde(default)]
    pub likes: Vec<ItemRecord>,
    #[serde(default)]
    pub dislikes: Vec<ItemRecord>,
}

/// Reduces like/dislike collections: dislikes first, then likes, so likes win
#[deprecated(note = "use `reduce` on an ActionLog; only `summarize` should reach this")]
pub fn reduce_legacy(results: &LegacyResults) -> VerdictMap {
    let mut verdicts = VerdictMap::default();

    let folded = results
        .dislikes
        .iter()
        .map(|item| (item, false))
        .chain(results.likes.iter().map(|item| (item, true)));

    for (item, liked) in folded {
        if let Some(id) = &item.id {
            verdicts.record(id.clone(), item.clone(), liked);
        }
    }

    verdicts
}

/// Picks the reduction source: the log whenever it has entries, legacy collections
/// only when it is absent or empty
#[allow(deprecated)]
pub fn summarize(log: Option<&ActionLog>, legacy: Option<&LegacyResults>) -> VerdictMap {
    match (log, legacy) {
        (Some(log), _) if !log.is_empty() => reduce(log),
        (_, Some(legacy)) => {
            tracing::debug!("No action log entries, falling back to legacy like/dislike sets");
            reduce_legacy(legacy)
        }
        _ => VerdictMap::default(),
    }
}
