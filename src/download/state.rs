//! Download state machine.

use std::sync::Mutex;

use crate::error::{Error, Result};

/// Where a download currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DownloadState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for the backend
    Fetching,
    /// Running the PDF to Word pipeline
    Converting,
    /// Writing the file
    Saving,
    /// Failed; always followed by `Idle`
    Error,
}

impl DownloadState {
    /// Whether `self -> next` is allowed.
    pub fn can_transition_to(&self, next: DownloadState) -> bool {
        use DownloadState::*;
        matches!(
            (*self, next),
            (Idle, Fetching)
                | (Fetching, Converting)
                | (Fetching, Saving)
                | (Converting, Saving)
                | (Saving, Idle)
                | (Fetching | Converting | Saving, Error)
                | (Error, Idle)
        )
    }

    /// Whether a download is in flight.
    pub fn is_busy(&self) -> bool {
        !matches!(self, DownloadState::Idle)
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadState::Idle => "idle",
            DownloadState::Fetching => "fetching",
            DownloadState::Converting => "converting",
            DownloadState::Saving => "saving",
            DownloadState::Error => "error",
        }
    }
}

impl std::fmt::Display for DownloadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, checked state holder.
#[derive(Debug, Default)]
pub(crate) struct StateCell {
    state: Mutex<DownloadState>,
}

impl StateCell {
    pub(crate) fn get(&self) -> DownloadState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Move from idle to fetching, or fail with `Busy`.
    pub(crate) fn begin(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.is_busy() {
            return Err(Error::Busy);
        }
        *state = DownloadState::Fetching;
        Ok(())
    }

    /// Apply a transition and return the previous state.
    pub(crate) fn transition(&self, next: DownloadState) -> Result<DownloadState> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let prev = *state;
        if !prev.can_transition_to(next) {
            return Err(Error::Other(format!(
                "invalid download state transition {} -> {}",
                prev, next
            )));
        }
        *state = next;
        Ok(prev)
    }
}
