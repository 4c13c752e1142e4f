//! Singer protocol messages.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::State;
use crate::error::Result;
use crate::stream::StreamKind;

/// One line of tap output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Declares a stream's schema before its records.
    Schema {
        stream: String,
        schema: Value,
        key_properties: Vec<String>,
        bookmark_properties: Vec<String>,
    },

    /// One record of a stream.
    Record {
        stream: String,
        record: Value,
        time_extracted: DateTime<Utc>,
    },

    /// Bookmarks to resume from.
    State { value: State },
}

impl Message {
    /// Schema message for a stream.
    pub fn schema(kind: StreamKind) -> Self {
        Message::Schema {
            stream: kind.name().to_string(),
            schema: kind.schema(),
            key_properties: kind
                .key_properties()
                .iter()
                .map(|key| key.to_string())
                .collect(),
            bookmark_properties: vec![kind.replication_key().to_string()],
        }
    }

    /// Record message for a stream.
    pub fn record<R: Serialize>(
        kind: StreamKind,
        record: &R,
        time_extracted: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Message::Record {
            stream: kind.name().to_string(),
            record: serde_json::to_value(record)?,
            time_extracted,
        })
    }

    /// Write the message as a single JSON line.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_message_shape() {
        let mut out = Vec::new();
        Message::schema(StreamKind::Users).write_to(&mut out).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with('\n'));
        let value: Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["type"], "SCHEMA");
        assert_eq!(value["stream"], "sane_users");
        assert_eq!(value["key_properties"], json!(["id"]));
        assert_eq!(value["bookmark_properties"], json!(["created"]));
    }

    #[test]
    fn test_record_message_shape() {
        let message =
            Message::record(StreamKind::Spaces, &json!({"id": "s1"}), Utc::now()).unwrap();
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "RECORD");
        assert_eq!(value["record"]["id"], "s1");
        assert!(value["time_extracted"].is_string());
    }
}
