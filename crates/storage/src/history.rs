//! Diagnosis History Implementation

use crate::StorageError;
use chrono::{DateTime, Utc};
use inference_engine::DiagnosisResult;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Number of sessions kept by default
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Snapshot of one diagnosis request and its ranked results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisSession {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Symptoms as submitted by the caller
    pub observed_symptoms: Vec<String>,
    pub results: Vec<DiagnosisResult>,
}

impl DiagnosisSession {
    /// Create a session stamped with a fresh id and the current time
    pub fn new(observed_symptoms: Vec<String>, results: Vec<DiagnosisResult>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            observed_symptoms,
            results,
        }
    }
}

/// Bounded history of diagnosis sessions, newest first
pub struct HistoryStore {
    /// Sessions, front is newest
    sessions: Mutex<VecDeque<DiagnosisSession>>,
    /// Max sessions retained
    capacity: usize,
    /// JSON file mirror, if any
    file: Option<PathBuf>,
}

impl HistoryStore {
    /// Create an in-memory history
    pub fn new(capacity: usize) -> Self {
        let capacity = effective_capacity(capacity);
        info!("Creating in-memory history store: capacity={}", capacity);
        Self {
            sessions: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            file: None,
        }
    }

    /// Create a history backed by a JSON file
    ///
    /// An existing file is loaded (trimmed to `capacity`); a missing file
    /// starts an empty history. Missing parent directories are created so
    /// later writes can reach the file.
    pub fn with_file(path: impl AsRef<Path>, capacity: usize) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let capacity = effective_capacity(capacity);

        let mut sessions: VecDeque<DiagnosisSession> = if path.exists() {
            let data = std::fs::read(&path)?;
            serde_json::from_slice(&data)?
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            VecDeque::with_capacity(capacity)
        };
        sessions.truncate(capacity);

        info!(
            "Opened history file {}: {} sessions, capacity={}",
            path.display(),
            sessions.len(),
            capacity
        );

        Ok(Self {
            sessions: Mutex::new(sessions),
            capacity,
            file: Some(path),
        })
    }

    /// Record a session as the newest entry, evicting the oldest beyond capacity
    ///
    /// With a file mirror the write is synchronous; async callers should run
    /// this on a blocking thread. The in-memory history only changes once the
    /// file has been written.
    pub fn record(&self, session: DiagnosisSession) -> Result<(), StorageError> {
        let mut sessions = self.lock()?;

        debug!("Recording session {} with {} results", session.id, session.results.len());
        let mut updated = sessions.clone();
        updated.push_front(session);
        updated.truncate(self.capacity);

        self.persist(&updated)?;
        *sessions = updated;
        Ok(())
    }

    /// Get up to `limit` sessions, newest first
    pub fn list(&self, limit: usize) -> Result<Vec<DiagnosisSession>, StorageError> {
        let sessions = self.lock()?;
        Ok(sessions.iter().take(limit).cloned().collect())
    }

    /// Find a session by id
    pub fn get(&self, id: Uuid) -> Result<Option<DiagnosisSession>, StorageError> {
        let sessions = self.lock()?;
        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    /// Remove every session, returning how many were removed
    ///
    /// Nothing is removed from memory if the file cannot be written.
    pub fn clear(&self) -> Result<usize, StorageError> {
        let mut sessions = self.lock()?;
        let removed = sessions.len();

        self.persist(&VecDeque::new())?;
        sessions.clear();

        info!("Cleared {} history sessions", removed);
        Ok(removed)
    }

    /// Get number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get retention capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> Result<MutexGuard<'_, VecDeque<DiagnosisSession>>, StorageError> {
        self.sessions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn persist(&self, sessions: &VecDeque<DiagnosisSession>) -> Result<(), StorageError> {
        let Some(path) = &self.file else {
            return Ok(());
        };

        let data = serde_json::to_vec_pretty(sessions)?;
        std::fs::write(path, data).map_err(|e| {
            warn!("Failed to write history file {}: {}", path.display(), e);
            StorageError::from(e)
        })
    }
}

fn effective_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        warn!("History capacity 0 is not usable, keeping 1 session");
        return 1;
    }
    capacity
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
