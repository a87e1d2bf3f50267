//! In-process backend recording submitted entries
//!
//! Stands in for the remote service in tests and local development. Clones
//! share state, so the backend handed to the logger can be inspected later.

use crate::core::{CommonLabels, LogEntry, LoggerError, RemoteBackend, RemoteClient, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct BackendState {
    entries: Vec<LogEntry>,
    labels: CommonLabels,
    stream_name: Option<String>,
    acquire_count: usize,
    release_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<BackendState>>,
    acquire_error: Option<String>,
    release_error: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose acquisition always fails with `reason`
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            acquire_error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Make released clients report `reason` as their release error
    #[must_use]
    pub fn with_release_error(mut self, reason: impl Into<String>) -> Self {
        self.release_error = Some(reason.into());
        self
    }

    /// Entries submitted so far, in submission order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state.lock().entries.clone()
    }

    /// Labels passed at the last successful acquisition
    pub fn labels(&self) -> CommonLabels {
        self.state.lock().labels.clone()
    }

    pub fn stream_name(&self) -> Option<String> {
        self.state.lock().stream_name.clone()
    }

    /// Number of acquisition attempts, failed ones included
    pub fn acquire_count(&self) -> usize {
        self.state.lock().acquire_count
    }

    pub fn release_count(&self) -> usize {
        self.state.lock().release_count
    }
}

impl RemoteBackend for MemoryBackend {
    fn acquire(
        &self,
        identity: &str,
        stream_name: &str,
        labels: &CommonLabels,
    ) -> Result<Box<dyn RemoteClient>> {
        let mut state = self.state.lock();
        state.acquire_count += 1;

        if let Some(ref reason) = self.acquire_error {
            return Err(LoggerError::acquisition(identity, reason.clone()));
        }

        state.labels = labels.clone();
        state.stream_name = Some(stream_name.to_string());

        Ok(Box::new(MemoryClient {
            state: Arc::clone(&self.state),
            release_error: self.release_error.clone(),
            released: false,
        }))
    }
}

/// Client handed out by [`MemoryBackend`]
#[derive(Debug)]
pub struct MemoryClient {
    state: Arc<Mutex<BackendState>>,
    release_error: Option<String>,
    released: bool,
}

impl RemoteClient for MemoryClient {
    fn submit(&self, entry: LogEntry) {
        self.state.lock().entries.push(entry);
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.state.lock().release_count += 1;

        match self.release_error {
            Some(ref reason) => Err(LoggerError::release(reason.clone())),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
