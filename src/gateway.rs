//! Outbound boundary contracts: applying a document to a live system and
//! formatting a draft. Implementations live outside this crate.

use crate::constant::DOCUMENT_SEPARATOR;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplyError {
    /// The live system refused the submission
    #[error("Apply rejected: {0}")]
    Rejected(String),

    /// The submission never reached the live system
    #[error("Apply transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Format failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyMode {
    Create,
    Update,
    Rollback,
}

/// Options for one apply submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOptions {
    /// Validate only; must have no observable effect on the live resource
    pub dry_run: bool,
    pub mode: ApplyMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ApplyOptions {
    pub fn dry_run(mode: ApplyMode, namespace: Option<String>) -> Self {
        Self {
            dry_run: true,
            mode,
            namespace,
        }
    }

    pub fn real(mode: ApplyMode, namespace: Option<String>) -> Self {
        Self {
            dry_run: false,
            mode,
            namespace,
        }
    }
}

/// Validates or applies a document to a live system.
///
/// A submission may contain multiple documents (see [`split_documents`]).
/// Implementations must be all-or-nothing across documents: either every
/// document applies, or the whole submission fails with an
/// [`ApplyError::Rejected`] naming the failing document(s). Callers never
/// see partial success.
pub trait ApplyGateway {
    fn apply(&self, text: &str, options: &ApplyOptions) -> Result<(), ApplyError>;
}

/// Formats a document, e.g. canonical YAML indentation.
pub trait Formatter {
    fn format(&self, text: &str) -> Result<String, FormatError>;
}

/// Split a multi-document draft on whole-line `---` boundary markers.
///
/// Helper for gateway implementations; the reconciliation workflow itself
/// treats the draft as one opaque blob.
pub fn split_documents(text: &str) -> Vec<&str> {
    let mut documents = Vec::new();
    let mut start = 0usize;
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DOCUMENT_SEPARATOR {
            documents.push(&text[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    documents.push(&text[start..]);

    documents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_single_document() {
        let text = "kind: ConfigMap\ndata:\n  a: 1\n";
        assert_eq!(split_documents(text), vec![text]);
    }

    #[test]
    fn test_split_two_documents() {
        let text = "kind: Service\n---\nkind: Deployment\n";
        assert_eq!(
            split_documents(text),
            vec!["kind: Service\n", "kind: Deployment\n"]
        );
    }

    #[test]
    fn test_separator_inside_value_is_not_a_boundary() {
        let text = "note: --- not a marker\nkind: Service\n";
        assert_eq!(split_documents(text), vec![text]);
    }

    #[test]
    fn test_split_empty_text() {
        assert_eq!(split_documents(""), vec![""]);
    }
}
