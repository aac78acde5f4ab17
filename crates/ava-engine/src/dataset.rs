//! QA document loading.
//!
//! The document holds one list of `{ "q": ..., "a": ... }` records per panel:
//!
//! ```json
//! { "sarah": [{ "q": "...", "a": "..." }], "michael": [] }
//! ```
//!
//! Each list is decoded on its own so a broken list only empties its own
//! panel. [`QaDocument::fetch`] never fails; [`QaDocument::load`] is the strict
//! variant used for validation.

use std::path::Path;

use serde::Deserialize as _;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::matcher::{normalize, QaEntry};
use crate::panel::PanelId;

/// Errors that can occur while loading a QA document.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The document could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or not an object.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// A panel's list is absent.
    #[error("Missing list for {0}")]
    MissingList(PanelId),

    /// A panel's list is present but not a list of `{q, a}` records.
    #[error("Invalid list for {panel}: {source}")]
    InvalidList {
        /// Panel whose list is invalid.
        panel: PanelId,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Per-panel QA entries from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QaDocument {
    /// Entries for the left panel.
    pub left: Vec<QaEntry>,
    /// Entries for the right panel.
    pub right: Vec<QaEntry>,
}

/// Per-panel outcome of a lenient parse.
#[derive(Debug)]
pub struct LenientParse {
    /// Whatever could be decoded; failed panels are empty.
    pub document: QaDocument,
    /// Errors that caused a panel to fall back to an empty list.
    pub errors: Vec<DataLoadError>,
}

impl QaDocument {
    /// Entries for `panel`.
    pub fn entries(&self, panel: PanelId) -> &[QaEntry] {
        match panel {
            PanelId::Left => &self.left,
            PanelId::Right => &self.right,
        }
    }

    fn entries_mut(&mut self, panel: PanelId) -> &mut Vec<QaEntry> {
        match panel {
            PanelId::Left => &mut self.left,
            PanelId::Right => &mut self.right,
        }
    }

    /// Parse a document, collecting per-panel errors instead of failing.
    ///
    /// A document that is not a JSON object empties both panels.
    pub fn parse_lenient(content: &str) -> LenientParse {
        let mut document = Self::default();
        let mut errors = Vec::new();

        let root: Value = match serde_json::from_str(content) {
            Ok(root @ Value::Object(_)) => root,
            Ok(other) => {
                let err: serde_json::Error = serde::de::Error::custom(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                ));
                errors.push(DataLoadError::Parse(err));
                return LenientParse { document, errors };
            }
            Err(e) => {
                errors.push(DataLoadError::Parse(e));
                return LenientParse { document, errors };
            }
        };

        for panel in PanelId::ALL {
            match decode_list(&root, panel) {
                Ok(entries) => *document.entries_mut(panel) = entries,
                Err(e) => errors.push(e),
            }
        }

        LenientParse { document, errors }
    }

    /// Parse a document strictly: any missing or invalid list is an error.
    pub fn parse(content: &str) -> Result<Self, DataLoadError> {
        let mut parsed = Self::parse_lenient(content);
        if parsed.errors.is_empty() {
            Ok(parsed.document)
        } else {
            Err(parsed.errors.remove(0))
        }
    }

    /// Read and strictly parse a document.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Fetch a document once, falling back to empty lists on any failure.
    ///
    /// Failures are logged and never returned; an unreadable file empties both
    /// panels, a bad list empties only its own panel.
    pub async fn fetch(path: &Path) -> Self {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "QA document unavailable, using empty tables");
                return Self::default();
            }
        };

        let parsed = Self::parse_lenient(&content);
        for error in &parsed.errors {
            warn!(path = %path.display(), %error, "QA data fallback");
        }
        info!(
            path = %path.display(),
            left = parsed.document.left.len(),
            right = parsed.document.right.len(),
            "QA document loaded"
        );
        parsed.document
    }

    /// Normalized questions that appear more than once in `panel`'s list.
    ///
    /// Later duplicates override earlier ones when the table is built.
    pub fn duplicate_questions(&self, panel: PanelId) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for entry in self.entries(panel) {
            let key = normalize(&entry.question);
            if !seen.insert(key.clone()) && !dups.contains(&key) {
                dups.push(key);
            }
        }
        dups
    }
}

fn decode_list(root: &Value, panel: PanelId) -> Result<Vec<QaEntry>, DataLoadError> {
    let list = root
        .get(panel.dataset_key())
        .ok_or(DataLoadError::MissingList(panel))?;
    Vec::<QaEntry>::deserialize(list).map_err(|source| DataLoadError::InvalidList { panel, source })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
