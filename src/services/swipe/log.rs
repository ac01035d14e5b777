use chrono::{DateTime, Utc};
use serde::Serialize;

use super::SessionError;
use crate::models::{ItemKey, ItemRecord};

/// One committed decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionLogEntry {
    /// Decision key; `None` when the payload carried no id
    pub id: Option<ItemKey>,
    pub liked: bool,
    pub payload: ItemRecord,
    pub sequence: u64,
    pub committed_at: DateTime<Utc>,
}

impl ActionLogEntry {
    pub fn new(sequence: u64, payload: ItemRecord, liked: bool) -> Self {
        Self {
            id: payload.id.clone(),
            liked,
            payload,
            sequence,
            committed_at: Utc::now(),
        }
    }
}

/// Append-only, chronological record of committed decisions
///
/// Duplicate ids are allowed. Entries are never edited or removed; a new session
/// gets a new log.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Vec<ActionLogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next appended entry must carry
    pub fn next_sequence(&self) -> u64 {
        self.entries.last().map_or(1, |last| last.sequence.saturating_add(1))
    }

    /// Appends an entry; sequence numbers must strictly increase
    pub fn append(&mut self, entry: ActionLogEntry) -> Result<&ActionLogEntry, SessionError> {
        if let Some(last) = self.entries.last() {
            if entry.sequence <= last.sequence {
                return Err(SessionError::OutOfOrder {
                    last: last.sequence,
                    got: entry.sequence,
                });
            }
        }

        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
