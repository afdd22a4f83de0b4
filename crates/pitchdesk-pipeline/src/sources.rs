//! The narrow seams the pipeline reads profiles from and writes history to.

use std::sync::Mutex;

use pitchdesk_core::{HistoryEntry, RightsholderProfile};
use pitchdesk_store::{HistoryLog, ProfileRepository};

use crate::error::PipelineError;

/// Supplies the profile a generation is personalised against.
pub trait ProfileProvider {
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the backing store cannot be read.
    fn active_profile(&self) -> Result<Option<RightsholderProfile>, PipelineError>;
}

/// Receives each completed generation.
pub trait HistorySink {
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the entry cannot be persisted.
    fn record(&self, entry: HistoryEntry) -> Result<(), PipelineError>;
}

impl ProfileProvider for ProfileRepository {
    fn active_profile(&self) -> Result<Option<RightsholderProfile>, PipelineError> {
        Ok(self.active().cloned())
    }
}

impl ProfileProvider for Mutex<ProfileRepository> {
    fn active_profile(&self) -> Result<Option<RightsholderProfile>, PipelineError> {
        let repo = self.lock().map_err(|_| PipelineError::LockPoisoned)?;
        Ok(repo.active().cloned())
    }
}

impl HistorySink for HistoryLog {
    fn record(&self, entry: HistoryEntry) -> Result<(), PipelineError> {
        Ok(self.append(entry)?)
    }
}
