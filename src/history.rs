use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::types::HistoryRecord;

/// Key the chapter reader stores its progress blob under.
pub const HISTORY_KEY: &str = "comicHistory";

/// Read-only access to reading progress. Writes belong to the chapter reader.
pub trait HistorySource: Send + Sync {
    fn get_history(&self, comic_id: &str) -> Option<HistoryRecord>;
}

/// History blob kept as a JSON file, one file per store key.
#[derive(Debug, Clone)]
pub struct FileHistory {
    path: Option<PathBuf>,
}

impl FileHistory {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl HistorySource for FileHistory {
    fn get_history(&self, comic_id: &str) -> Option<HistoryRecord> {
        let path = self.path.as_ref()?;
        let blob = match std::fs::read_to_string(path) {
            Ok(blob) => blob,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read history: {}", e);
                return None;
            }
        };
        parse_history(&blob, comic_id)
    }
}

/// Extract one comic's record from a `{comicId: HistoryRecord}` blob.
/// Anything unreadable counts as no history.
pub fn parse_history(blob: &str, comic_id: &str) -> Option<HistoryRecord> {
    let entries: Option<HashMap<String, Value>> = match serde_json::from_str(blob) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("error loading history from local storage: {}", e);
            return None;
        }
    };

    let entry = entries?.remove(comic_id)?;
    if entry.is_null() {
        return None;
    }

    match serde_json::from_value(entry) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(comic_id, "ignoring malformed history entry: {}", e);
            None
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: HashMap<String, HistoryRecord>,
}

#[cfg(test)]
impl MemoryHistory {
    pub fn with(mut self, comic_id: &str, record: HistoryRecord) -> Self {
        self.entries.insert(comic_id.to_string(), record);
        self
    }
}

#[cfg(test)]
impl HistorySource for MemoryHistory {
    fn get_history(&self, comic_id: &str) -> Option<HistoryRecord> {
        self.entries.get(comic_id).cloned()
    }
}
