//! In-flight and recent import bookkeeping for `GET /status`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

use csv_import::ImportOutcome;
use foodmap_common::{ImportAction, TenantId};

const MAX_COMPLETED: usize = 100;
const RECENT_IN_STATUS: usize = 20;

/// Tracks imports the service is working on and the last ones it finished.
pub struct ImportTracker {
    active: Mutex<HashMap<String, ActiveImport>>,
    completed: Mutex<VecDeque<CompletedImport>>,
    max_completed: usize,
}

/// What an in-flight import is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    /// Reading the upload and geocoding rows
    Parsing,
    /// Waiting on the store
    Storing,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveImport {
    pub id: String,
    pub tenant_id: TenantId,
    pub action: ImportAction,
    pub stage: ImportStage,
    /// Rows in the batch; 0 until parsing has finished
    pub rows: usize,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedImport {
    pub id: String,
    pub tenant_id: TenantId,
    pub action: ImportAction,
    pub rows: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub outcome: ImportOutcome,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub active: Vec<ActiveImport>,
    pub recent: Vec<CompletedImport>,
    pub total_completed: usize,
}

impl Default for ImportTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportTracker {
    pub fn new() -> Self {
        Self::with_capacity(MAX_COMPLETED)
    }

    /// Tracker that remembers at most `max_completed` finished imports.
    pub fn with_capacity(max_completed: usize) -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
            completed: Mutex::new(VecDeque::new()),
            max_completed,
        }
    }

    pub async fn start(
        &self,
        id: &str,
        tenant_id: TenantId,
        action: ImportAction,
        stage: ImportStage,
        rows: usize,
    ) {
        let import = ActiveImport {
            id: id.to_string(),
            tenant_id,
            action,
            stage,
            rows,
            started_at: Utc::now(),
        };
        self.active.lock().await.insert(id.to_string(), import);
    }

    /// Move an active import to the next stage. Unknown ids are ignored.
    pub async fn advance(&self, id: &str, stage: ImportStage, rows: usize) {
        if let Some(import) = self.active.lock().await.get_mut(id) {
            import.stage = stage;
            import.rows = rows;
        }
    }

    /// Move an import to the completed list. Unknown ids are ignored.
    pub async fn complete(&self, id: &str, outcome: ImportOutcome) {
        let Some(import) = self.active.lock().await.remove(id) else {
            return;
        };

        let completed_at = Utc::now();
        let duration_ms = (completed_at - import.started_at).num_milliseconds().max(0) as u64;

        let mut completed = self.completed.lock().await;
        completed.push_front(CompletedImport {
            id: import.id,
            tenant_id: import.tenant_id,
            action: import.action,
            rows: import.rows,
            started_at: import.started_at,
            completed_at,
            duration_ms,
            outcome,
        });
        completed.truncate(self.max_completed);
    }

    pub async fn get_status(&self) -> StatusResponse {
        let active = self.active.lock().await;
        let completed = self.completed.lock().await;

        StatusResponse {
            active: active.values().cloned().collect(),
            recent: completed.iter().take(RECENT_IN_STATUS).cloned().collect(),
            total_completed: completed.len(),
        }
    }
}
