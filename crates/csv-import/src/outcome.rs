//! Results of the parse and import stages.

use serde::Serialize;

use foodmap_common::ImportRow;

use crate::error::RowFailure;

/// Output of the parse stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseReport {
    /// Normalized rows in file order
    pub rows: Vec<ImportRow>,
    /// Rows left out, in file order
    pub failures: Vec<RowFailure>,
    /// True when processing stopped early at the first failure
    pub aborted: bool,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of handing a batch to storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    Success { stored: usize },
    /// Storage accepted the call but wrote fewer records than submitted.
    /// The bundled stores write all or nothing; this is for stores that can
    /// commit part of a batch.
    Partial { stored: usize, submitted: usize },
    Failed { reason: String },
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Success { .. })
    }

    pub fn stored(&self) -> usize {
        match self {
            ImportOutcome::Success { stored } | ImportOutcome::Partial { stored, .. } => *stored,
            ImportOutcome::Failed { .. } => 0,
        }
    }
}

/// Parse followed by import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRun {
    pub report: ParseReport,
    /// `None` when parsing aborted and nothing was sent to storage
    pub outcome: Option<ImportOutcome>,
}
