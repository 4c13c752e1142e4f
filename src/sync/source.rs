//! Row sources.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::stream::StreamKind;

/// Supplies query rows for each stream.
///
/// Rows are returned as JSON so the source stays independent of the stream
/// row types.
pub trait RecordSource {
    /// All rows for a stream.
    fn fetch(&mut self, kind: StreamKind) -> Result<Vec<Value>>;
}

/// A source backed by a JSON dump keyed by stream name.
///
/// ```json
/// {"sane_users": [...], "sane_spaces": [...], "sane_space_nodes": [...]}
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonSource {
    streams: HashMap<StreamKind, Vec<Value>>,
}

impl JsonSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dump from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dump from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Load a dump from decoded JSON. Unknown stream names are rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidSource(
                "source dump must be an object keyed by stream name".to_string(),
            ));
        };

        let mut source = Self::new();
        for (name, rows) in map {
            let kind: StreamKind = name.parse()?;
            let rows = match rows {
                Value::Array(rows) => rows,
                Value::Null => Vec::new(),
                _ => {
                    return Err(Error::InvalidSource(format!(
                        "rows for {} must be an array",
                        name
                    )))
                }
            };
            source.streams.insert(kind, rows);
        }
        Ok(source)
    }

    /// Add rows for a stream.
    pub fn with_rows(mut self, kind: StreamKind, rows: Vec<Value>) -> Self {
        self.streams.entry(kind).or_default().extend(rows);
        self
    }
}

impl RecordSource for JsonSource {
    fn fetch(&mut self, kind: StreamKind) -> Result<Vec<Value>> {
        Ok(self.streams.remove(&kind).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let mut source = JsonSource::from_value(json!({
            "sane_users": [{"id": "u1"}],
            "sane_spaces": null
        }))
        .unwrap();

        assert_eq!(source.fetch(StreamKind::Users).unwrap().len(), 1);
        assert!(source.fetch(StreamKind::Spaces).unwrap().is_empty());
        assert!(source.fetch(StreamKind::SpaceNodes).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_unknown_stream() {
        assert!(matches!(
            JsonSource::from_value(json!({"sane_things": []})),
            Err(Error::UnknownStream(_))
        ));
        assert!(JsonSource::from_value(json!([])).is_err());
    }
}
