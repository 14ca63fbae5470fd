use serde::{Deserialize, Serialize};

/// Classification of a single output line of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffKind {
    /// Present in both texts
    Context,
    /// Present only in the modified text
    Added,
    /// Present only in the original text
    Removed,
}

/// One output line of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub kind: DiffKind,
    pub value: String,
}

impl DiffRecord {
    pub fn new(kind: DiffKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// The ordered record sequence produced for one comparison.
///
/// Concatenating the values of all non-`Removed` records reconstructs the
/// modified text; all non-`Added` records reconstruct the original text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript(pub Vec<DiffRecord>);

impl EditScript {
    pub fn records(&self) -> &[DiffRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lines of the original text, in order
    pub fn reconstruct_original(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|r| r.kind != DiffKind::Added)
            .map(|r| r.value.as_str())
            .collect()
    }

    /// Lines of the modified text, in order
    pub fn reconstruct_modified(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|r| r.kind != DiffKind::Removed)
            .map(|r| r.value.as_str())
            .collect()
    }

    /// Check if the script contains meaningful changes (non-blank added or removed content)
    pub fn has_meaningful_changes(&self) -> bool {
        self.0.iter().any(|r| {
            matches!(r.kind, DiffKind::Added | DiffKind::Removed) && !r.value.trim().is_empty()
        })
    }
}

/// A presentation row: a single unchanged line, or a removed block paired
/// with the added block that replaces it.
#[derive(Debug, Clone)]
pub enum DiffRow {
    Context(String),
    Pair(Vec<DiffRecord>, Vec<DiffRecord>),
}
