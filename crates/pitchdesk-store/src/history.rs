use std::path::{Path, PathBuf};

use pitchdesk_core::{HistoryEntry, HISTORY_LIMIT};

use crate::{read_json_array, write_json_array, StoreError};

/// Append-only generation history, newest first, capped at [`HISTORY_LIMIT`].
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn list(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(read_json_array(&self.path)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn get(&self, id: &str) -> Result<Option<HistoryEntry>, StoreError> {
        Ok(self.list()?.into_iter().find(|e| e.id == id))
    }

    /// Put `entry` at the front and drop anything past the cap.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or written.
    pub fn append(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        let mut entries = self.list()?;
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
        write_json_array(&self.path, &entries)?;
        tracing::debug!(len = entries.len(), "history entry appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pitchdesk_core::EmailDraftSet;

    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            id: format!("email-{n}"),
            company: format!("Company {n}"),
            rightsholder: "Sporting Kansas City".to_string(),
            research: "summary".to_string(),
            drafts: EmailDraftSet::fallback("raw"),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn list_on_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = HistoryLog::new(dir.path().join("email_history.json"));
        assert!(log.list().expect("list").is_empty());
    }

    #[test]
    fn append_puts_newest_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = HistoryLog::new(dir.path().join("email_history.json"));
        log.append(entry(1)).expect("append");
        log.append(entry(2)).expect("append");
        let ids: Vec<String> = log.list().expect("list").into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["email-2", "email-1"]);
    }

    #[test]
    fn append_caps_history_at_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = HistoryLog::new(dir.path().join("email_history.json"));
        for n in 0..(HISTORY_LIMIT + 7) {
            log.append(entry(n)).expect("append");
        }
        let entries = log.list().expect("list");
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries[0].id, format!("email-{}", HISTORY_LIMIT + 6));
        assert_eq!(entries[HISTORY_LIMIT - 1].id, "email-7");
    }

    #[test]
    fn get_finds_entry_by_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = HistoryLog::new(dir.path().join("email_history.json"));
        log.append(entry(1)).expect("append");
        assert_eq!(
            log.get("email-1").expect("get").map(|e| e.company),
            Some("Company 1".to_string())
        );
        assert!(log.get("email-9").expect("get").is_none());
    }
}
