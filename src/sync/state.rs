//! Replication bookmarks.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stream::StreamKind;

/// Where a stream left off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Replication key field
    pub replication_key: String,
    /// Highest replication value emitted
    pub replication_key_value: DateTime<Utc>,
}

/// Bookmarks for every stream, keyed by stream name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Bookmark per stream name
    #[serde(default)]
    pub bookmarks: BTreeMap<String, Bookmark>,
}

impl State {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load state from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse state from JSON. Accepts a bare state or a wrapping `STATE` message.
    pub fn from_json(data: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(data)?;
        let state = match value.get("value") {
            Some(inner) if value.get("type").and_then(|t| t.as_str()) == Some("STATE") => {
                inner.clone()
            }
            _ => value,
        };

        let state: State = serde_json::from_value(state)?;
        for (stream, bookmark) in &state.bookmarks {
            let kind: StreamKind = stream.parse()?;
            if bookmark.replication_key != kind.replication_key() {
                return Err(Error::InvalidState(format!(
                    "{} bookmarks `{}` but replicates on `{}`",
                    stream,
                    bookmark.replication_key,
                    kind.replication_key()
                )));
            }
        }
        Ok(state)
    }

    /// Bookmarked replication value for a stream.
    pub fn bookmark(&self, kind: StreamKind) -> Option<DateTime<Utc>> {
        self.bookmarks
            .get(kind.name())
            .map(|bookmark| bookmark.replication_key_value)
    }

    /// Move a stream's bookmark forward. Older values are ignored.
    pub fn advance(&mut self, kind: StreamKind, value: DateTime<Utc>) {
        let bookmark = self
            .bookmarks
            .entry(kind.name().to_string())
            .or_insert_with(|| Bookmark {
                replication_key: kind.replication_key().to_string(),
                replication_key_value: value,
            });
        if value > bookmark.replication_key_value {
            bookmark.replication_key_value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_advance_keeps_maximum() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let mut state = State::new();
        state.advance(StreamKind::Spaces, late);
        state.advance(StreamKind::Spaces, early);

        assert_eq!(state.bookmark(StreamKind::Spaces), Some(late));
        assert_eq!(state.bookmark(StreamKind::Users), None);
        assert_eq!(state.bookmarks["sane_spaces"].replication_key, "updated");
    }

    #[test]
    fn test_from_json_accepts_state_message() {
        let data = r#"{"type": "STATE", "value": {"bookmarks": {"sane_users": {
            "replication_key": "created",
            "replication_key_value": "2024-03-01T00:00:00Z"
        }}}}"#;
        let state = State::from_json(data).unwrap();
        assert_eq!(
            state.bookmark(StreamKind::Users),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_from_json_rejects_wrong_key() {
        let data = r#"{"bookmarks": {"sane_users": {
            "replication_key": "updated",
            "replication_key_value": "2024-03-01T00:00:00Z"
        }}}"#;
        assert!(matches!(
            State::from_json(data),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(
            State::from_json(r#"{"bookmarks": {"nope": {"replication_key": "x", "replication_key_value": "2024-03-01T00:00:00Z"}}}"#),
            Err(Error::UnknownStream(_))
        ));
    }
}
