//! Revision history: the data model for stored document snapshots and the
//! read contract the reconciliation workflow needs from a history store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;
use xxhash_rust::xxh64::xxh64;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History fetch failed: {0}")]
    Fetch(String),
}

/// Identity of the resource a history is kept for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ResourceKey {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// A single immutable snapshot of a resource's document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub action: String,
}

impl Revision {
    /// Author display name, falling back to "system" when absent
    pub fn author_display(&self) -> &str {
        self.author.as_deref().unwrap_or("system")
    }

    /// One-line label for revision list display
    pub fn label(&self) -> String {
        format!(
            "{} {} ({})",
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            self.author_display(),
            self.action
        )
    }
}

/// Read contract the reconciliation workflow needs from a history store.
///
/// The store itself is append-only and external; the workflow only ever asks
/// for the most recent snapshots of one resource.
pub trait RevisionHistoryStore {
    /// List up to `limit` revisions for a resource, newest first.
    fn list(&self, key: &ResourceKey, limit: usize) -> Result<Vec<Revision>, HistoryError>;
}

/// Calculate XXHash64 of content and return as hex string
fn content_hash(text: &str) -> String {
    format!("{:016x}", xxh64(text.as_bytes(), 0))
}

/// In-memory reference store, append-only per resource.
///
/// Consecutive identical snapshots are deduplicated by content hash, so a
/// save that changed nothing does not clutter the history.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    entries: HashMap<ResourceKey, Vec<Revision>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new snapshot; returns the revision id, or `None` when the
    /// text is identical to the latest stored snapshot.
    pub fn record(
        &mut self,
        key: &ResourceKey,
        text: impl Into<String>,
        author: Option<String>,
        action: impl Into<String>,
    ) -> Option<String> {
        let text = text.into();
        let hash = content_hash(&text);
        let revisions = self.entries.entry(key.clone()).or_default();

        if let Some(latest) = revisions.last()
            && content_hash(&latest.text) == hash
        {
            return None;
        }

        let id = Uuid::new_v4().to_string();
        revisions.push(Revision {
            id: id.clone(),
            text,
            created_at: Utc::now(),
            author,
            action: action.into(),
        });
        Some(id)
    }
}

impl RevisionHistoryStore for InMemoryHistoryStore {
    fn list(&self, key: &ResourceKey, limit: usize) -> Result<Vec<Revision>, HistoryError> {
        let revisions = match self.entries.get(key) {
            Some(revisions) => revisions,
            None => return Ok(Vec::new()),
        };
        // Stored oldest first; serve newest first.
        Ok(revisions.iter().rev().take(limit).cloned().collect())
    }
}
