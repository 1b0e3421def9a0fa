//! Per-requester job tracking
//!
//! Each requester may have at most one job in flight. The registry is shared
//! between concurrent jobs; the crawl state itself never is.

use crate::SnapshotError;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Identifies whoever asked for a snapshot
pub type RequesterId = u64;

/// Where a job currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Downloading,
    Archiving,
    Delivering,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Downloading => write!(f, "Download in progress..."),
            Self::Archiving => write!(f, "Creating ZIP archive"),
            Self::Delivering => write!(f, "Sending file to user"),
        }
    }
}

/// Shared table of active jobs
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    active: Arc<Mutex<HashMap<RequesterId, JobStatus>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the job slot for `requester`
    ///
    /// # Returns
    ///
    /// * `Ok(JobGuard)` - The slot, released when the guard drops
    /// * `Err(SnapshotError::JobInProgress)` - The requester already has a job
    pub fn begin(&self, requester: RequesterId) -> Result<JobGuard, SnapshotError> {
        let mut active = self.lock();
        if active.contains_key(&requester) {
            return Err(SnapshotError::JobInProgress { requester });
        }
        active.insert(requester, JobStatus::Downloading);

        Ok(JobGuard {
            registry: self.clone(),
            requester,
        })
    }

    /// Current status of `requester`'s job, if one is running
    pub fn status(&self, requester: RequesterId) -> Option<JobStatus> {
        self.lock().get(&requester).copied()
    }

    /// Number of jobs in flight
    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RequesterId, JobStatus>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds a requester's job slot; dropping it clears the status
#[derive(Debug)]
pub struct JobGuard {
    registry: JobRegistry,
    requester: RequesterId,
}

impl JobGuard {
    pub fn requester(&self) -> RequesterId {
        self.requester
    }

    /// Moves the job to a new stage
    pub fn set(&self, status: JobStatus) {
        tracing::debug!("Requester {}: {}", self.requester, status);
        self.registry.lock().insert(self.requester, status);
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.requester);
    }
}
